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

//! Error type shared across the filesystem's components.
//!
//! Only precondition violations, capacity exhaustion, and image corruption are
//! represented here. Conditions a caller is expected to handle in the normal
//! course of business (duplicate name, file not found, bad descriptor, EOF,
//! short write) are returned as plain `Ok` values instead, per the rest of
//! this crate's API.

use std::fmt;
use std::io;

/// Failure of a filesystem operation.
#[derive(Debug)]
pub enum FsError {
    /// An operation other than `mount` was attempted before mounting.
    NotMounted,
    /// `mount` was called on an instance that is already mounted.
    AlreadyMounted,
    /// The superblock's magic number did not match on mount.
    InvalidMagic,
    /// An inode or block index fell outside its region.
    OutOfRange {
        index: u32,
        limit: u32,
    },
    /// An inode index was read or written but its bitmap bit is clear.
    Unallocated {
        index: u32,
    },
    /// An operation that requires the root directory was used on a non-directory inode.
    NotADirectory,
    /// An operation that requires a regular file was used on a non-file inode.
    NotARegularFile,
    /// The inode bitmap has no clear bit left.
    NoFreeInode,
    /// The data bitmap has no clear bit left.
    NoFreeDataBlock,
    /// The root directory's 768 slots are all occupied.
    RootFull,
    Io(io::Error),
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMounted => write!(f, "filesystem is not mounted"),
            Self::AlreadyMounted => write!(f, "filesystem is already mounted"),
            Self::InvalidMagic => write!(f, "invalid superblock magic number"),
            Self::OutOfRange { index, limit } => {
                write!(f, "index {index} out of range (limit {limit})")
            }
            Self::Unallocated { index } => write!(f, "inode {index} is unallocated"),
            Self::NotADirectory => write!(f, "inode is not a directory"),
            Self::NotARegularFile => write!(f, "inode is not a regular file"),
            Self::NoFreeInode => write!(f, "no free inode"),
            Self::NoFreeDataBlock => write!(f, "no free data block"),
            Self::RootFull => write!(f, "root directory is full"),
            Self::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FsError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
