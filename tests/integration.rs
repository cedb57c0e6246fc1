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

//! End-to-end scenarios S1-S6 of spec.md §8, run against real temp-file
//! backed images. No dev-dependencies: temp images are created the same way
//! the unit tests scattered through `src/` do, with `std::env::temp_dir()`
//! plus a process-id suffix.

use std::path::PathBuf;

use tinyfs::format::mkfs;
use tinyfs::layout::{DIRECT_POINTERS, BLOCK_SIZE};
use tinyfs::FileSystem;

fn temp_image(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "tinyfs-integration-{name}-{}.img",
        std::process::id()
    ));
    path
}

fn fresh(name: &str) -> (FileSystem, PathBuf) {
    let path = temp_image(name);
    mkfs(&path).unwrap();
    let mut fs = FileSystem::new(&path);
    fs.mount().unwrap();
    (fs, path)
}

/// S1: format then mount then list sees no files, and the root inode's
/// recorded size matches exactly the "." and ".." entries written by mkfs.
#[test]
fn s1_format_then_list() {
    let (mut fs, path) = fresh("s1");
    assert!(fs.list().unwrap().is_empty());

    let mut dev = tinyfs::block::BlockDevice::open(&path).unwrap();
    let mut buf = [0u8; BLOCK_SIZE];
    dev.read_block(0, &mut buf).unwrap();
    let sb = tinyfs::layout::Superblock::decode(&buf);
    let root = tinyfs::inode::read_inode(&mut dev, &sb, tinyfs::layout::ROOT_INODE).unwrap();
    assert_eq!(root.size, 128);

    std::fs::remove_file(path).ok();
}

/// S2: create, write, close, reopen, read to EOF.
#[test]
fn s2_create_write_read() {
    let (mut fs, path) = fresh("s2");

    assert!(fs.create(b"hello").unwrap());
    let fd = fs.open(b"hello").unwrap();
    assert_eq!(fd, 0);
    assert_eq!(fs.write(fd, b"abc").unwrap(), 3);
    assert!(fs.close(fd).unwrap());

    let fd2 = fs.open(b"hello").unwrap();
    assert_eq!(fd2, 0);
    let mut buf = [0u8; 10];
    assert_eq!(fs.read(fd2, &mut buf).unwrap(), 3);
    assert_eq!(&buf[..3], b"abc");
    assert_eq!(fs.read(fd2, &mut buf).unwrap(), 0);

    std::fs::remove_file(path).ok();
}

/// S3: a second create of the same name is rejected and ls still reports
/// exactly the one live entry.
#[test]
fn s3_duplicate() {
    let (mut fs, path) = fresh("s3");
    assert!(fs.create(b"hello").unwrap());
    let fd = fs.open(b"hello").unwrap();
    fs.write(fd, b"abc").unwrap();
    fs.close(fd).unwrap();

    assert!(!fs.create(b"hello").unwrap());
    assert_eq!(fs.list().unwrap(), vec![b"hello".to_vec()]);

    std::fs::remove_file(path).ok();
}

/// S4: a write spanning two direct blocks round-trips and the file occupies
/// direct_blocks[0] and direct_blocks[1].
#[test]
fn s4_boundary_write() {
    let (mut fs, path) = fresh("s4");
    assert!(fs.create(b"big").unwrap());
    let fd = fs.open(b"big").unwrap();

    let data = vec![0x41u8; BLOCK_SIZE + 1];
    assert_eq!(fs.write(fd, &data).unwrap() as usize, data.len());
    fs.close(fd).unwrap();

    let fd2 = fs.open(b"big").unwrap();
    let mut buf = vec![0u8; data.len()];
    assert_eq!(fs.read(fd2, &mut buf).unwrap() as usize, data.len());
    assert!(buf.iter().all(|&b| b == 0x41));

    std::fs::remove_file(path).ok();
}

/// S5: a write past the 12-direct-block ceiling short-writes and a
/// subsequent read returns exactly the bytes that were actually written.
#[test]
fn s5_over_ceiling() {
    let (mut fs, path) = fresh("s5");
    assert!(fs.create(b"huge").unwrap());
    let fd = fs.open(b"huge").unwrap();

    let ceiling = DIRECT_POINTERS * BLOCK_SIZE;
    let data = vec![0x5au8; ceiling + 5];
    assert_eq!(fs.write(fd, &data).unwrap() as usize, ceiling);
    fs.close(fd).unwrap();

    let fd2 = fs.open(b"huge").unwrap();
    let mut buf = vec![0u8; ceiling];
    assert_eq!(fs.read(fd2, &mut buf).unwrap() as usize, ceiling);
    assert!(buf.iter().all(|&b| b == 0x5a));

    std::fs::remove_file(path).ok();
}

/// S6: a file with an open descriptor cannot be deleted; after closing, it
/// can, and a subsequent open fails.
#[test]
fn s6_delete_in_use() {
    let (mut fs, path) = fresh("s6");
    assert!(fs.create(b"x").unwrap());
    let fd = fs.open(b"x").unwrap();

    assert!(!fs.delete(b"x").unwrap());
    assert!(fs.close(fd).unwrap());
    assert!(fs.delete(b"x").unwrap());
    assert_eq!(fs.open(b"x").unwrap(), -1);

    std::fs::remove_file(path).ok();
}

/// Invariant 6: delete restores bitmap population counts to what they were
/// immediately after mkfs.
#[test]
fn delete_restores_bitmap_population() {
    let (mut fs, path) = fresh("inv6");

    let count_set_bits = |path: &PathBuf| -> (u32, u32) {
        let mut dev = tinyfs::block::BlockDevice::open(path).unwrap();
        let mut buf = [0u8; BLOCK_SIZE];
        dev.read_block(0, &mut buf).unwrap();
        let sb = tinyfs::layout::Superblock::decode(&buf);

        let mut count_region = |start: u32, count: u32, limit: u32| -> u32 {
            let mut total = 0u32;
            let mut bits_seen = 0u32;
            let mut block_buf = [0u8; BLOCK_SIZE];
            'blocks: for b in start..start + count {
                dev.read_block(b, &mut block_buf).unwrap();
                for bit in 0..BLOCK_SIZE * 8 {
                    if bits_seen >= limit {
                        break 'blocks;
                    }
                    bits_seen += 1;
                    if block_buf[bit / 8] & (1 << (bit % 8)) != 0 {
                        total += 1;
                    }
                }
            }
            total
        };

        let inodes = count_region(sb.inode_bitmap_start, sb.inode_bitmap_count, sb.total_inodes);
        let blocks = count_region(sb.data_bitmap_start, sb.data_bitmap_count, sb.total_blocks);
        (inodes, blocks)
    };

    let baseline = count_set_bits(&path);

    assert!(fs.create(b"n").unwrap());
    let fd = fs.open(b"n").unwrap();
    fs.write(fd, &vec![1u8; BLOCK_SIZE + 1]).unwrap();
    fs.close(fd).unwrap();
    assert!(fs.delete(b"n").unwrap());

    let after = count_set_bits(&path);
    assert_eq!(baseline, after);

    std::fs::remove_file(path).ok();
}

/// Invariant 3: every live file's non-zero direct block pointers are
/// distinct across all live inodes (no two files share a block).
#[test]
fn no_two_files_share_a_block() {
    let (mut fs, path) = fresh("inv3");

    for name in [b"a".as_slice(), b"b".as_slice(), b"c".as_slice()] {
        assert!(fs.create(name).unwrap());
        let fd = fs.open(name).unwrap();
        fs.write(fd, &vec![0u8; BLOCK_SIZE / 2]).unwrap();
        fs.close(fd).unwrap();
    }

    let mut dev = tinyfs::block::BlockDevice::open(&path).unwrap();
    let mut buf = [0u8; BLOCK_SIZE];
    dev.read_block(0, &mut buf).unwrap();
    let sb = tinyfs::layout::Superblock::decode(&buf);

    let mut seen = std::collections::HashSet::new();
    for name in [b"a".as_slice(), b"b".as_slice(), b"c".as_slice()] {
        let idx = tinyfs::dir::lookup(&mut dev, &sb, name).unwrap().unwrap();
        let inode = tinyfs::inode::read_inode(&mut dev, &sb, idx).unwrap();
        for &block in &inode.direct_blocks {
            if block != 0 {
                assert!(seen.insert(block), "block {block} reused across files");
            }
        }
    }

    std::fs::remove_file(path).ok();
}
