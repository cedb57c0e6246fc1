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

//! Fixed-size block I/O over the backing store file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{FsError, Result};
use crate::layout::{BLOCK_SIZE, TOTAL_BLOCKS};

/// A fixed `BLOCK_SIZE`-byte window over the backing store.
///
/// All I/O is block-aligned; there is no partial-block access at this layer.
/// The backing file is opened read-write and held for the device's lifetime.
pub struct BlockDevice {
    file: File,
}

impl BlockDevice {
    /// Opens `path` read-write as the backing store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self { file })
    }

    /// Reads block `n` into `buf`, which must be exactly `BLOCK_SIZE` bytes.
    pub fn read_block(&mut self, n: u32, buf: &mut [u8; BLOCK_SIZE]) -> Result<()> {
        self.check_block(n)?;
        self.file.seek(SeekFrom::Start(Self::offset(n)))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    /// Writes `buf` to block `n`, then flushes so the write is durable.
    pub fn write_block(&mut self, n: u32, buf: &[u8; BLOCK_SIZE]) -> Result<()> {
        self.check_block(n)?;
        self.file.seek(SeekFrom::Start(Self::offset(n)))?;
        self.file.write_all(buf)?;
        self.file.flush()?;
        Ok(())
    }

    /// Overwrites every block of the image with zeros.
    pub fn zero_format(&mut self) -> Result<()> {
        let zero = [0u8; BLOCK_SIZE];
        self.file.seek(SeekFrom::Start(0))?;
        for _ in 0..TOTAL_BLOCKS {
            self.file.write_all(&zero)?;
        }
        self.file.flush()?;
        Ok(())
    }

    fn check_block(&self, n: u32) -> Result<()> {
        if n >= TOTAL_BLOCKS {
            return Err(FsError::OutOfRange {
                index: n,
                limit: TOTAL_BLOCKS,
            });
        }
        Ok(())
    }

    fn offset(n: u32) -> u64 {
        n as u64 * BLOCK_SIZE as u64
    }
}
