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

//! A user-space virtual filesystem layered over a single fixed-size image
//! file.
//!
//! Classic Unix on-disk layout: superblock, inode bitmap, data bitmap,
//! inode table, data region. A single root directory holds regular files;
//! there are no subdirectories, no indirect blocks, no journaling, and no
//! concurrent access.
//!
//! [`FileSystem`] is the entry point: [`format::mkfs`] initializes a backing
//! image, [`FileSystem::mount`] validates and opens it, and the rest of the
//! façade (`create`/`open`/`read`/`write`/`close`/`delete`/`list`) drives the
//! lower layers (block I/O, bitmap allocators, inode I/O, directory
//! operations) documented in their own modules.

pub mod alloc;
pub mod block;
pub mod dir;
pub mod error;
pub mod file;
pub mod format;
pub mod fs;
pub mod inode;
pub mod layout;

pub use error::{FsError, Result};
pub use fs::FileSystem;
