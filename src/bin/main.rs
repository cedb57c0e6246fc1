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

//! Interactive shell driving a single [`tinyfs::FileSystem`] instance.
//!
//! This is the external collaborator of spec.md §6: it owns argument/line
//! parsing and the image-file path, and reports every outcome to stdout, but
//! holds none of the filesystem's own state. The verb table and exact
//! success/failure strings mirror the original CLI this crate is descended
//! from (`original_source/cli/cli.cpp`).

use std::env;
use std::io::{self, BufRead, Write};

use tinyfs::{FileSystem, Result};

const READ_CHUNK: usize = 512;

fn print_help() {
    println!("Commands:");
    println!("  mkfs");
    println!("  mount");
    println!("  create <filename>");
    println!("  write <filename> <text>");
    println!("  cat <filename>");
    println!("  delete <filename>");
    println!("  ls");
    println!("  exit");
}

/// Runs one dispatched command, returning `false` only for `exit`.
fn dispatch(fs: &mut Option<FileSystem>, disk_path: &str, line: &str) -> Result<bool> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim_start();

    match command {
        "" => {}
        "help" => print_help(),
        "mkfs" => {
            tinyfs::format::mkfs(disk_path)?;
            println!("Disk formatted.");
        }
        "mount" => {
            if fs.is_some() {
                println!("Already mounted.");
            } else {
                let mut instance = FileSystem::new(disk_path);
                instance.mount()?;
                *fs = Some(instance);
                println!("Filesystem mounted.");
            }
        }
        "create" => {
            let Some(instance) = fs.as_mut() else {
                println!("Not mounted.");
                return Ok(true);
            };
            let name = rest.split_whitespace().next().unwrap_or("");
            if name.is_empty() {
                println!("Filename required.");
                return Ok(true);
            }
            if instance.create(name.as_bytes())? {
                println!("File created.");
            } else {
                println!("Create failed.");
            }
        }
        "write" => {
            let Some(instance) = fs.as_mut() else {
                println!("Not mounted.");
                return Ok(true);
            };
            let mut fields = rest.splitn(2, char::is_whitespace);
            let name = fields.next().unwrap_or("");
            let text = fields.next().unwrap_or("").trim_start();
            if name.is_empty() || text.is_empty() {
                println!("Usage: write <filename> <text>");
                return Ok(true);
            }

            let fd = instance.open(name.as_bytes())?;
            if fd < 0 {
                println!("File not found.");
                return Ok(true);
            }
            let written = instance.write(fd, text.as_bytes())?;
            instance.close(fd)?;

            if written >= 0 {
                println!("Wrote {written} bytes.");
            } else {
                println!("Write failed.");
            }
        }
        "cat" => {
            let Some(instance) = fs.as_mut() else {
                println!("Not mounted.");
                return Ok(true);
            };
            let name = rest.split_whitespace().next().unwrap_or("");
            if name.is_empty() {
                println!("Filename required.");
                return Ok(true);
            }

            let fd = instance.open(name.as_bytes())?;
            if fd < 0 {
                println!("File not found.");
                return Ok(true);
            }

            let mut buf = [0u8; READ_CHUNK];
            let stdout = io::stdout();
            let mut out = stdout.lock();
            loop {
                let n = instance.read(fd, &mut buf)?;
                if n <= 0 {
                    break;
                }
                out.write_all(&buf[..n as usize])?;
            }
            println!();
            instance.close(fd)?;
        }
        "delete" => {
            let Some(instance) = fs.as_mut() else {
                println!("Not mounted.");
                return Ok(true);
            };
            let name = rest.split_whitespace().next().unwrap_or("");
            if instance.delete(name.as_bytes())? {
                println!("Deleted.");
            } else {
                println!("Delete failed.");
            }
        }
        "ls" => {
            let Some(instance) = fs.as_mut() else {
                println!("Not mounted.");
                return Ok(true);
            };
            for name in instance.list()? {
                println!("{}", String::from_utf8_lossy(&name));
            }
        }
        "exit" => {
            println!("Exiting...");
            return Ok(false);
        }
        _ => println!("Unknown command."),
    }
    Ok(true)
}

fn main() {
    let disk_path = env::args().nth(1).unwrap_or_else(|| "vdisk.img".to_owned());
    let mut fs: Option<FileSystem> = None;

    println!("Mini VFS CLI");
    println!("Type 'help' for commands.");

    let stdin = io::stdin();
    loop {
        print!("vfs> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                println!("Error: {e}");
                continue;
            }
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        match dispatch(&mut fs, &disk_path, line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("Error: {e}"),
        }
    }
}
