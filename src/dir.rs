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

//! Linear search, insert, and remove of entries in the root directory.
//!
//! The root inode's twelve direct blocks form a flat array of 768 slots,
//! scanned in block order. A slot's inode index of 0 marks it free — which,
//! as a side effect of how `mkfs` writes `.` and `..` (both pointing back at
//! inode 0, the root itself), also makes those two entries invisible to
//! every scan here. That mirrors the reference behavior this crate is
//! ported from and is why `list` does not need to special-case the names
//! "." and ".." at all: they are never found by an `inode != 0` scan in the
//! first place.

use crate::alloc::{allocate_data_block, allocate_inode, free_data_block, free_inode};
use crate::block::BlockDevice;
use crate::error::{FsError, Result};
use crate::inode::{read_inode, write_inode};
use crate::layout::{
    DirEntry, Inode, Superblock, BLOCK_SIZE, DIRECT_POINTERS, DIRENTS_PER_BLOCK, MAX_NAME_LEN,
    MODE_DIRECTORY, MODE_REGULAR, ROOT_INODE,
};

/// Location of a found directory entry: the data block it lives in and the
/// byte offset of its slot within that block.
struct Location {
    block: u32,
    slot: usize,
}

fn find(dev: &mut BlockDevice, root: &Inode, name: &[u8]) -> Result<Option<(Location, DirEntry)>> {
    let mut buf = [0u8; BLOCK_SIZE];
    for &block in root.direct_blocks.iter() {
        if block == 0 {
            continue;
        }
        dev.read_block(block, &mut buf)?;
        for slot in 0..DIRENTS_PER_BLOCK as usize {
            let off = slot * DirEntry::ENCODED_SIZE;
            let entry = DirEntry::decode(&buf[off..off + DirEntry::ENCODED_SIZE]);
            if entry.matches(name) {
                return Ok(Some((Location { block, slot }, entry)));
            }
        }
    }
    Ok(None)
}

/// Looks up `name` in the root directory, returning its inode index if
/// present.
pub fn lookup(dev: &mut BlockDevice, sb: &Superblock, name: &[u8]) -> Result<Option<u32>> {
    let root = read_inode(dev, sb, ROOT_INODE)?;
    Ok(find(dev, &root, name)?.map(|(_, entry)| entry.inode))
}

/// Creates a new regular-file entry named `name` in the root directory.
///
/// Returns `Ok(false)` for the user-recoverable cases of spec.md §7: an
/// empty or over-long name, or a name already present. Any other failure
/// (no free inode, no free data block, root full) is a hard `Err`.
pub fn insert(dev: &mut BlockDevice, sb: &Superblock, name: &[u8]) -> Result<bool> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Ok(false);
    }

    let mut root = read_inode(dev, sb, ROOT_INODE)?;
    if root.mode != MODE_DIRECTORY {
        return Err(FsError::NotADirectory);
    }

    if find(dev, &root, name)?.is_some() {
        return Ok(false);
    }

    // Allocate the inode before touching the directory, so capacity
    // exhaustion is detected before any directory state changes.
    let new_inode_index = allocate_inode(dev, sb)?;
    let new_inode = Inode {
        mode: MODE_REGULAR,
        ref_count: 1,
        ..Default::default()
    };
    write_inode(dev, sb, new_inode_index, &new_inode)?;

    let mut buf = [0u8; BLOCK_SIZE];
    let mut inserted = false;

    for direct_index in 0..DIRECT_POINTERS {
        if root.direct_blocks[direct_index] == 0 {
            let new_block = allocate_data_block(dev, sb)?;
            root.direct_blocks[direct_index] = new_block;
            let zero = [0u8; BLOCK_SIZE];
            dev.write_block(new_block, &zero)?;
        }

        let block = root.direct_blocks[direct_index];
        dev.read_block(block, &mut buf)?;

        for slot in 0..DIRENTS_PER_BLOCK as usize {
            let off = slot * DirEntry::ENCODED_SIZE;
            let entry = DirEntry::decode(&buf[off..off + DirEntry::ENCODED_SIZE]);
            if entry.is_empty_slot() {
                let new_entry = DirEntry::new(new_inode_index, name);
                new_entry.encode(&mut buf[off..off + DirEntry::ENCODED_SIZE]);
                dev.write_block(block, &buf)?;
                root.size += DirEntry::ENCODED_SIZE as u32;
                inserted = true;
                break;
            }
        }

        if inserted {
            break;
        }
    }

    if !inserted {
        return Err(FsError::RootFull);
    }

    write_inode(dev, sb, ROOT_INODE, &root)?;
    Ok(true)
}

/// Removes `name` from the root directory, freeing its inode and every
/// data block it owned. Returns `Ok(false)` if `name` is not present.
pub fn remove(dev: &mut BlockDevice, sb: &Superblock, name: &[u8]) -> Result<bool> {
    let mut root = read_inode(dev, sb, ROOT_INODE)?;

    let Some((loc, entry)) = find(dev, &root, name)? else {
        return Ok(false);
    };

    let file_inode = read_inode(dev, sb, entry.inode)?;
    for &block in &file_inode.direct_blocks {
        if block != 0 {
            free_data_block(dev, sb, block)?;
        }
    }
    free_inode(dev, sb, entry.inode)?;

    let mut buf = [0u8; BLOCK_SIZE];
    dev.read_block(loc.block, &mut buf)?;
    let off = loc.slot * DirEntry::ENCODED_SIZE;
    DirEntry::empty().encode(&mut buf[off..off + DirEntry::ENCODED_SIZE]);
    dev.write_block(loc.block, &buf)?;

    root.size -= DirEntry::ENCODED_SIZE as u32;
    write_inode(dev, sb, ROOT_INODE, &root)?;

    Ok(true)
}

/// Lists every non-empty entry's name, in block/slot order, skipping the
/// sentinel `.`/`..` entries (which a bare `inode != 0` scan never surfaces
/// in the first place, see the module docs).
pub fn list(dev: &mut BlockDevice, sb: &Superblock) -> Result<Vec<Vec<u8>>> {
    let root = read_inode(dev, sb, ROOT_INODE)?;
    let mut names = Vec::new();
    let mut buf = [0u8; BLOCK_SIZE];

    for &block in &root.direct_blocks {
        if block == 0 {
            continue;
        }
        dev.read_block(block, &mut buf)?;
        for slot in 0..DIRENTS_PER_BLOCK as usize {
            let off = slot * DirEntry::ENCODED_SIZE;
            let entry = DirEntry::decode(&buf[off..off + DirEntry::ENCODED_SIZE]);
            if !entry.is_empty_slot() {
                let name = entry.name[..entry.name_len as usize].to_vec();
                if name != b"." && name != b".." {
                    names.push(name);
                }
            }
        }
    }

    Ok(names)
}
