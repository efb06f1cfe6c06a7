//! The crate's single error type, covering every failure kind described in
//! the on-disk format and public API.

use std::io;

use thiserror::Error;

/// Every way a `FileSystem` operation can fail.
///
/// `DiskFull` deliberately has no variant here: per the write() contract, a
/// disk that runs out of space during a write is reported as a short byte
/// count, not an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no file system is currently mounted")]
    NotMounted,

    #[error("a file system is already mounted")]
    AlreadyMounted,

    #[error("block device I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("superblock signature does not match ECS150FS")]
    BadSignature,

    #[error("superblock geometry is inconsistent with the device")]
    BadGeometry,

    #[error("invalid file name")]
    InvalidName,

    #[error("a file with that name already exists")]
    NameExists,

    #[error("no file with that name exists")]
    NotFound,

    #[error("root directory is full")]
    DirFull,

    #[error("too many files are open")]
    TooManyOpen,

    #[error("file descriptor is invalid or not open")]
    BadDescriptor,

    #[error("seek offset is beyond the end of the file")]
    SeekOutOfRange,

    #[error("file is busy")]
    Busy,
}

pub type Result<T> = std::result::Result<T, Error>;
