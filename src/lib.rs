//! ECS150FS: a simple FAT-based on-disk file system.
//!
//! Files live in a single flat root directory inside a fixed-size image
//! file. Content is stored in fixed-size blocks linked by a File Allocation
//! Table: a superblock describes the image's geometry, the table tracks
//! which blocks belong to which file's chain, and a 128-entry root
//! directory maps names to chains.
//!
//! ```no_run
//! use ecs150fs::FileSystem;
//!
//! let mut fs = FileSystem::mount("disk.img")?;
//! fs.create("hello")?;
//! let fd = fs.open("hello")?;
//! fs.write(fd, b"hello, world")?;
//! fs.close(fd)?;
//! fs.umount()?;
//! # Ok::<(), ecs150fs::Error>(())
//! ```

pub mod block;
pub mod dir;
pub mod error;
pub mod fat;
mod fs;
pub mod io;
pub mod openfile;
pub mod superblock;

pub use block::{BlockDevice, BLOCK_SIZE};
pub use error::{Error, Result};
pub use fs::FileSystem;
pub use openfile::Descriptor;
