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

//! The user-facing façade tying the block device, allocators, inode I/O,
//! directory operations, and the open-file table together.

use std::path::{Path, PathBuf};

use crate::block::BlockDevice;
use crate::dir;
use crate::error::{FsError, Result};
use crate::file::FdTable;
use crate::layout::Superblock;

/// A mounted (or not-yet-mounted) instance of the filesystem.
///
/// Mirrors spec.md §5: single-threaded, synchronous, no internal locking.
/// Every operation but [`FileSystem::mount`] fails with [`FsError::NotMounted`]
/// until a successful mount.
pub struct FileSystem {
    path: PathBuf,
    device: Option<BlockDevice>,
    superblock: Option<Superblock>,
    mounted: bool,
    fd_table: FdTable,
}

impl FileSystem {
    /// Creates an unmounted handle bound to the backing-store path `path`.
    /// No I/O happens until [`FileSystem::mount`] is called.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            device: None,
            superblock: None,
            mounted: false,
            fd_table: FdTable::new(),
        }
    }

    /// Opens the backing store, validates the superblock's magic number, and
    /// caches it. Fails if already mounted or if the magic does not match.
    pub fn mount(&mut self) -> Result<()> {
        if self.mounted {
            return Err(FsError::AlreadyMounted);
        }

        let mut device = BlockDevice::open(&self.path)?;
        let mut buf = [0u8; crate::layout::BLOCK_SIZE];
        device.read_block(0, &mut buf)?;
        let superblock = Superblock::decode(&buf);
        if superblock.magic != crate::layout::MAGIC {
            return Err(FsError::InvalidMagic);
        }

        self.device = Some(device);
        self.superblock = Some(superblock);
        self.mounted = true;
        Ok(())
    }

    /// Marks the instance unmounted. The underlying device stays open (and
    /// closes only when `self` is dropped) since every write is already
    /// flushed as it happens — spec.md §5 requires no extra sync step here.
    pub fn unmount(&mut self) -> Result<()> {
        if !self.mounted {
            return Err(FsError::NotMounted);
        }
        self.mounted = false;
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn parts(&mut self) -> Result<(&mut BlockDevice, &Superblock)> {
        if !self.mounted {
            return Err(FsError::NotMounted);
        }
        Ok((
            self.device.as_mut().expect("mounted implies a device"),
            self.superblock.as_ref().expect("mounted implies a superblock"),
        ))
    }

    /// Creates an empty regular file named `name` in the root directory.
    /// Returns `Ok(false)` for an empty/over-long/duplicate name.
    pub fn create(&mut self, name: &[u8]) -> Result<bool> {
        let (device, sb) = self.parts()?;
        dir::insert(device, sb, name)
    }

    /// Opens `name`, returning its descriptor, or `-1` if not found or no
    /// descriptor is free.
    pub fn open(&mut self, name: &[u8]) -> Result<i64> {
        if !self.mounted {
            return Err(FsError::NotMounted);
        }
        let device = self.device.as_mut().expect("mounted implies a device");
        let sb = self.superblock.as_ref().expect("mounted implies a superblock");
        self.fd_table.open(device, sb, name)
    }

    /// Closes `fd`. Idempotent: a second close on the same descriptor
    /// returns `false`.
    pub fn close(&mut self, fd: i64) -> Result<bool> {
        if !self.mounted {
            return Err(FsError::NotMounted);
        }
        Ok(self.fd_table.close(fd))
    }

    /// Reads up to `buf.len()` bytes from `fd` at its current offset.
    /// Returns `Ok(-1)` for an out-of-range/free descriptor or a
    /// non-regular-file inode, `Ok(0)` at EOF, otherwise the byte count read.
    pub fn read(&mut self, fd: i64, buf: &mut [u8]) -> Result<i64> {
        if !self.mounted {
            return Err(FsError::NotMounted);
        }
        let device = self.device.as_mut().expect("mounted implies a device");
        let sb = self.superblock.as_ref().expect("mounted implies a superblock");
        match self.fd_table.read(device, sb, fd, buf)? {
            Some(n) => Ok(n as i64),
            None => Ok(-1),
        }
    }

    /// Writes `buf` to `fd` at its current offset, returning the number of
    /// bytes actually written (possibly short, at the 12-block ceiling).
    /// Returns `Ok(-1)` for an out-of-range/free descriptor or a
    /// non-regular-file inode.
    pub fn write(&mut self, fd: i64, buf: &[u8]) -> Result<i64> {
        if !self.mounted {
            return Err(FsError::NotMounted);
        }
        let device = self.device.as_mut().expect("mounted implies a device");
        let sb = self.superblock.as_ref().expect("mounted implies a superblock");
        match self.fd_table.write(device, sb, fd, buf)? {
            Some(n) => Ok(n as i64),
            None => Ok(-1),
        }
    }

    /// Deletes `name`, freeing its inode and data blocks. Refuses (returning
    /// `Ok(false)`) if any descriptor currently has it open, or if it is not
    /// found.
    pub fn delete(&mut self, name: &[u8]) -> Result<bool> {
        let (device, sb) = self.parts()?;
        let Some(inode_index) = dir::lookup(device, sb, name)? else {
            return Ok(false);
        };
        if self.fd_table.is_inode_open(inode_index) {
            return Ok(false);
        }
        let (device, sb) = self.parts()?;
        dir::remove(device, sb, name)
    }

    /// Lists every non-dot entry name in the root directory, in block/slot
    /// order.
    pub fn list(&mut self) -> Result<Vec<Vec<u8>>> {
        let (device, sb) = self.parts()?;
        dir::list(device, sb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::mkfs;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("tinyfs-test-fs-{name}-{}.img", std::process::id()));
        path
    }

    #[test]
    fn operations_before_mount_fail() {
        let path = temp_path("premount");
        mkfs(&path).unwrap();
        let mut fs = FileSystem::new(&path);
        assert!(matches!(fs.create(b"x"), Err(FsError::NotMounted)));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn double_mount_fails() {
        let path = temp_path("double-mount");
        mkfs(&path).unwrap();
        let mut fs = FileSystem::new(&path);
        fs.mount().unwrap();
        assert!(matches!(fs.mount(), Err(FsError::AlreadyMounted)));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn mount_rejects_bad_magic() {
        let path = temp_path("bad-magic");
        {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&path)
                .unwrap();
            file.set_len(crate::layout::TOTAL_BLOCKS as u64 * crate::layout::BLOCK_SIZE as u64)
                .unwrap();
        }
        let mut fs = FileSystem::new(&path);
        assert!(matches!(fs.mount(), Err(FsError::InvalidMagic)));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn scenario_create_write_read() {
        let path = temp_path("s2");
        mkfs(&path).unwrap();
        let mut fs = FileSystem::new(&path);
        fs.mount().unwrap();

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

    #[test]
    fn scenario_duplicate_create() {
        let path = temp_path("s3");
        mkfs(&path).unwrap();
        let mut fs = FileSystem::new(&path);
        fs.mount().unwrap();

        assert!(fs.create(b"hello").unwrap());
        assert!(!fs.create(b"hello").unwrap());
        assert_eq!(fs.list().unwrap(), vec![b"hello".to_vec()]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn scenario_delete_in_use() {
        let path = temp_path("s6");
        mkfs(&path).unwrap();
        let mut fs = FileSystem::new(&path);
        fs.mount().unwrap();

        assert!(fs.create(b"x").unwrap());
        let fd = fs.open(b"x").unwrap();
        assert!(!fs.delete(b"x").unwrap());
        assert!(fs.close(fd).unwrap());
        assert!(fs.delete(b"x").unwrap());
        assert_eq!(fs.open(b"x").unwrap(), -1);
        std::fs::remove_file(path).ok();
    }
}
