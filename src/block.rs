//! The block device: a thin wrapper over a host file providing fixed-size
//! block read/write and a block count.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::error;

use crate::error::{Error, Result};

/// Size of a disk block in bytes.
pub const BLOCK_SIZE: usize = 4096;

/// An open virtual disk image, backed by a regular host file.
///
/// The image's size must be an exact multiple of [`BLOCK_SIZE`].
pub struct BlockDevice {
    file: File,
    count: u64,
}

impl BlockDevice {
    /// Open virtual disk file `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let len = file.metadata()?.len();
        if len % BLOCK_SIZE as u64 != 0 {
            error!(
                "disk image size {} is not a multiple of block size {}",
                len, BLOCK_SIZE
            );
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "disk image size is not a multiple of the block size",
            )));
        }
        Ok(BlockDevice {
            file,
            count: len / BLOCK_SIZE as u64,
        })
    }

    /// Number of blocks in the currently open disk.
    pub fn count(&self) -> u64 {
        self.count
    }

    fn check_bounds(&self, block: u64) -> Result<()> {
        if block >= self.count {
            error!("block index out of bounds ({}/{})", block, self.count);
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "block index out of bounds",
            )));
        }
        Ok(())
    }

    /// Read block `block` (`BLOCK_SIZE` bytes) into `buf`.
    pub fn read_block(&mut self, block: u64, buf: &mut [u8; BLOCK_SIZE]) -> Result<()> {
        self.check_bounds(block)?;
        self.file.seek(SeekFrom::Start(block * BLOCK_SIZE as u64))?;
        self.file.read_exact(buf)?;
        Ok(())
    }

    /// Write `buf` (`BLOCK_SIZE` bytes) to block `block`.
    pub fn write_block(&mut self, block: u64, buf: &[u8; BLOCK_SIZE]) -> Result<()> {
        self.check_bounds(block)?;
        self.file.seek(SeekFrom::Start(block * BLOCK_SIZE as u64))?;
        self.file.write_all(buf)?;
        Ok(())
    }
}
