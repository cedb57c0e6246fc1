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

//! Initializes a freshly zeroed image into a mountable filesystem.

use std::path::Path;

use crate::block::BlockDevice;
use crate::error::Result;
use crate::layout::{
    DirEntry, Inode, Superblock, BLOCK_SIZE, FIRST_DATA_BLOCK, INODE_BITMAP_START,
    INODE_TABLE_START, MODE_DIRECTORY,
};

/// Formats the image at `path` as a fresh, empty filesystem.
///
/// Steps, all via [`BlockDevice`]: zero every block, write the superblock,
/// zero the inode bitmap, mark blocks 0..=`FIRST_DATA_BLOCK` allocated in the
/// data bitmap, mark inode 0 allocated, write the root inode, and write the
/// root directory's first data block with `.` and `..`.
pub fn mkfs<P: AsRef<Path>>(path: P) -> Result<()> {
    let mut dev = BlockDevice::open(path)?;
    dev.zero_format()?;

    let sb = Superblock::new();
    let mut buf = [0u8; BLOCK_SIZE];
    sb.encode(&mut buf);
    dev.write_block(0, &buf)?;

    let zero = [0u8; BLOCK_SIZE];
    for block in sb.inode_bitmap_start..sb.inode_bitmap_start + sb.inode_bitmap_count {
        dev.write_block(block, &zero)?;
    }

    // First data-bitmap block: set bits 0..=FIRST_DATA_BLOCK (metadata plus
    // the root directory's initial block); the rest of the bitmap stays
    // clear.
    let mut bitmap = [0u8; BLOCK_SIZE];
    for i in 0..=FIRST_DATA_BLOCK {
        bitmap[i as usize / 8] |= 1 << (i % 8);
    }
    dev.write_block(sb.data_bitmap_start, &bitmap)?;
    for block in sb.data_bitmap_start + 1..sb.data_bitmap_start + sb.data_bitmap_count {
        dev.write_block(block, &zero)?;
    }

    // Root inode is bit 0 of the inode bitmap.
    let mut inode_bitmap = [0u8; BLOCK_SIZE];
    inode_bitmap[0] |= 1;
    dev.write_block(INODE_BITMAP_START, &inode_bitmap)?;

    let root_inode = Inode {
        mode: MODE_DIRECTORY,
        size: 2 * DirEntry::ENCODED_SIZE as u32,
        direct_blocks: {
            let mut d = [0u32; 12];
            d[0] = FIRST_DATA_BLOCK;
            d
        },
        ref_count: 2,
        ..Default::default()
    };
    let mut inode_block = [0u8; BLOCK_SIZE];
    root_inode.encode(&mut inode_block[0..Inode::ENCODED_SIZE]);
    dev.write_block(INODE_TABLE_START, &inode_block)?;

    let mut dir_block = [0u8; BLOCK_SIZE];
    let dot = DirEntry::new(0, b".");
    dot.encode(&mut dir_block[0..DirEntry::ENCODED_SIZE]);
    let dotdot = DirEntry::new(0, b"..");
    dotdot.encode(&mut dir_block[DirEntry::ENCODED_SIZE..2 * DirEntry::ENCODED_SIZE]);
    dev.write_block(FIRST_DATA_BLOCK, &dir_block)?;

    Ok(())
}
