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

//! Scan-and-set bitmap allocators for inodes and data blocks.
//!
//! Both allocators share the same first-fit scan: walk the region's bitmap
//! blocks in order, bits LSB-first within each byte, and take the first clear
//! bit below the region's logical limit. There is no free list and no
//! remembered scan position, so allocation always favors the front of the
//! region. That is a deliberate, testable property (spec.md §4.4), not an
//! oversight to optimize away.

use crate::block::BlockDevice;
use crate::error::{FsError, Result};
use crate::inode::write_inode;
use crate::layout::{Inode, Superblock, BLOCK_SIZE};

/// Scans a bitmap region for the first clear bit below `limit`.
///
/// Returns the bitmap block it was found in, the bit's offset within that
/// block, and the bit's global index.
fn find_free_bit(
    dev: &mut BlockDevice,
    start_block: u32,
    block_count: u32,
    limit: u32,
) -> Result<Option<(u32, usize, u32)>> {
    let mut buf = [0u8; BLOCK_SIZE];
    for block in start_block..start_block + block_count {
        dev.read_block(block, &mut buf)?;
        for bit in 0..BLOCK_SIZE * 8 {
            let global = (block - start_block) * (BLOCK_SIZE as u32 * 8) + bit as u32;
            if global >= limit {
                break;
            }
            if buf[bit / 8] & (1 << (bit % 8)) == 0 {
                return Ok(Some((block, bit, global)));
            }
        }
    }
    Ok(None)
}

fn set_bit(dev: &mut BlockDevice, block: u32, bit: usize) -> Result<()> {
    let mut buf = [0u8; BLOCK_SIZE];
    dev.read_block(block, &mut buf)?;
    buf[bit / 8] |= 1 << (bit % 8);
    dev.write_block(block, &buf)
}

fn clear_bit(dev: &mut BlockDevice, block: u32, bit: usize) -> Result<()> {
    let mut buf = [0u8; BLOCK_SIZE];
    dev.read_block(block, &mut buf)?;
    buf[bit / 8] &= !(1 << (bit % 8));
    dev.write_block(block, &buf)
}

/// Allocates a free inode index, zero-initializes its table entry, sets its
/// `ref_count` to 1, and marks its bitmap bit set.
pub fn allocate_inode(dev: &mut BlockDevice, sb: &Superblock) -> Result<u32> {
    let (block, bit, index) = find_free_bit(
        dev,
        sb.inode_bitmap_start,
        sb.inode_bitmap_count,
        sb.total_inodes,
    )?
    .ok_or(FsError::NoFreeInode)?;
    set_bit(dev, block, bit)?;

    let inode = Inode {
        ref_count: 1,
        ..Default::default()
    };
    write_inode(dev, sb, index, &inode)?;

    Ok(index)
}

/// Allocates a free data block index and marks its bitmap bit set. The
/// caller is responsible for zeroing its contents before use.
pub fn allocate_data_block(dev: &mut BlockDevice, sb: &Superblock) -> Result<u32> {
    let (block, bit, index) = find_free_bit(
        dev,
        sb.data_bitmap_start,
        sb.data_bitmap_count,
        sb.total_blocks,
    )?
    .ok_or(FsError::NoFreeDataBlock)?;
    set_bit(dev, block, bit)?;
    Ok(index)
}

/// Clears the inode bitmap bit for `index`.
pub fn free_inode(dev: &mut BlockDevice, sb: &Superblock, index: u32) -> Result<()> {
    let block = sb.inode_bitmap_start + index / (BLOCK_SIZE as u32 * 8);
    let bit = (index % (BLOCK_SIZE as u32 * 8)) as usize;
    clear_bit(dev, block, bit)
}

/// Clears the data bitmap bit for `index`.
pub fn free_data_block(dev: &mut BlockDevice, sb: &Superblock, index: u32) -> Result<()> {
    let block = sb.data_bitmap_start + index / (BLOCK_SIZE as u32 * 8);
    let bit = (index % (BLOCK_SIZE as u32 * 8)) as usize;
    clear_bit(dev, block, bit)
}

/// Tests whether the inode bitmap bit for `index` is set.
pub fn is_inode_allocated(dev: &mut BlockDevice, sb: &Superblock, index: u32) -> Result<bool> {
    let block = sb.inode_bitmap_start + index / (BLOCK_SIZE as u32 * 8);
    let bit = (index % (BLOCK_SIZE as u32 * 8)) as usize;
    let mut buf = [0u8; BLOCK_SIZE];
    dev.read_block(block, &mut buf)?;
    Ok(buf[bit / 8] & (1 << (bit % 8)) != 0)
}
