/*
 * Copyright 2026 The tinyfs authors
 *
 * This file is part of tinyfs.
 *
 * tinyfs is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * tinyfs is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
 * A PARTICULAR PURPOSE. See the GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * tinyfs. If not, see <https://www.gnu.org/licenses/>.
 */

//! Read and write an inode by index, validated against the inode bitmap.

use crate::block::BlockDevice;
use crate::error::{FsError, Result};
use crate::layout::{Inode, Superblock, BLOCK_SIZE};

fn check_allocated(dev: &mut BlockDevice, sb: &Superblock, index: u32) -> Result<()> {
    if index >= sb.total_inodes {
        return Err(FsError::OutOfRange {
            index,
            limit: sb.total_inodes,
        });
    }

    let bitmap_block = sb.inode_bitmap_start + index / (BLOCK_SIZE as u32 * 8);
    let bit = (index % (BLOCK_SIZE as u32 * 8)) as usize;

    let mut buf = [0u8; BLOCK_SIZE];
    dev.read_block(bitmap_block, &mut buf)?;
    if buf[bit / 8] & (1 << (bit % 8)) == 0 {
        return Err(FsError::Unallocated { index });
    }
    Ok(())
}

fn table_location(sb: &Superblock, index: u32) -> (u32, usize) {
    let per_block = BLOCK_SIZE as u32 / Inode::ENCODED_SIZE as u32;
    let block = sb.inode_table_start + index / per_block;
    let offset = (index % per_block) as usize * Inode::ENCODED_SIZE;
    (block, offset)
}

/// Reads inode `index`. Fails if `index` is out of range or its bitmap bit
/// is clear.
pub fn read_inode(dev: &mut BlockDevice, sb: &Superblock, index: u32) -> Result<Inode> {
    check_allocated(dev, sb, index)?;
    let (block, offset) = table_location(sb, index);

    let mut buf = [0u8; BLOCK_SIZE];
    dev.read_block(block, &mut buf)?;
    Ok(Inode::decode(&buf[offset..offset + Inode::ENCODED_SIZE]))
}

/// Writes `inode` to slot `index`. Fails under the same conditions as
/// [`read_inode`].
pub fn write_inode(dev: &mut BlockDevice, sb: &Superblock, index: u32, inode: &Inode) -> Result<()> {
    check_allocated(dev, sb, index)?;
    let (block, offset) = table_location(sb, index);

    let mut buf = [0u8; BLOCK_SIZE];
    dev.read_block(block, &mut buf)?;
    inode.encode(&mut buf[offset..offset + Inode::ENCODED_SIZE]);
    dev.write_block(block, &buf)
}
