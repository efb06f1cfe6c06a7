//! `FileSystem`: the value that owns a mounted image's block device,
//! superblock, FAT, root directory, and open-file table, and exposes the
//! public mount/create/open/read/write/close/umount operations.
//!
//! A `FileSystem` is an ordinary value returned by `mount`, with no hidden
//! global state, so more than one can be mounted at a time within a single
//! process.

use std::io::Write as IoWrite;
use std::path::Path;

use log::debug;

use crate::block::BlockDevice;
use crate::dir::RootDirectory;
use crate::error::{Error, Result};
use crate::fat::Fat;
use crate::io;
use crate::openfile::{Descriptor, OpenFileTable};
use crate::superblock::SuperBlock;

/// A mounted ECS150FS image.
pub struct FileSystem {
    device: BlockDevice,
    superblock: SuperBlock,
    fat: Fat,
    root: RootDirectory,
    open_files: OpenFileTable,
}

impl FileSystem {
    /// Mount the image at `path`.
    pub fn mount<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut device = BlockDevice::open(path)?;
        let superblock = SuperBlock::load(&mut device)?;
        let fat = Fat::load(&mut device, superblock.num_fat_blocks(), superblock.num_data_blocks())?;
        let root = RootDirectory::load(&mut device, superblock.root_index())?;
        debug!(
            "mounted: {} blocks, {} fat blocks, root at {}, {} data blocks",
            superblock.num_blocks(),
            superblock.num_fat_blocks(),
            superblock.root_index(),
            superblock.num_data_blocks()
        );
        Ok(FileSystem {
            device,
            superblock,
            fat,
            root,
            open_files: OpenFileTable::new(),
        })
    }

    /// Unmount, flushing the superblock, FAT, and root directory back to
    /// the image. Fails if any descriptor is still open, leaving the
    /// `FileSystem` usable so the caller can close them and retry.
    pub fn umount(&mut self) -> Result<()> {
        if self.open_files.any_open() {
            return Err(Error::Busy);
        }
        self.flush()?;
        debug!("unmounted");
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.superblock.flush(&mut self.device)?;
        self.fat.flush(&mut self.device)?;
        self.root.flush(&mut self.device, self.superblock.root_index())?;
        Ok(())
    }

    /// Print geometry and free-space information.
    pub fn info<W: IoWrite>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "FS Info:")?;
        writeln!(w, "total_blk_count={}", self.superblock.num_blocks())?;
        writeln!(w, "fat_blk_count={}", self.superblock.num_fat_blocks())?;
        writeln!(w, "rdir_blk={}", self.superblock.root_index())?;
        writeln!(w, "data_blk={}", self.superblock.data_index())?;
        writeln!(w, "data_blk_count={}", self.superblock.num_data_blocks())?;
        writeln!(
            w,
            "fat_free_ratio={}/{}",
            self.fat.free_count(),
            self.superblock.num_data_blocks()
        )?;
        writeln!(
            w,
            "rdir_free_ratio={}/{}",
            crate::dir::FILE_MAX_COUNT - self.root.iter().count(),
            crate::dir::FILE_MAX_COUNT
        )?;
        Ok(())
    }

    /// List every file in the root directory.
    pub fn ls<W: IoWrite>(&self, w: &mut W) -> Result<()> {
        writeln!(w, "FS Ls:")?;
        for entry in self.root.iter() {
            writeln!(
                w,
                "file: {}, size: {}, data_blk: {}",
                entry.name().unwrap_or(""),
                entry.size(),
                entry.first_block()
            )?;
        }
        Ok(())
    }

    /// Create a new, empty file named `name`.
    pub fn create(&mut self, name: &str) -> Result<()> {
        self.root.create(name, &mut self.fat)?;
        Ok(())
    }

    /// Delete the file named `name`.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.root.delete(name, &self.open_files, &mut self.fat)
    }

    /// Open `name`, returning a descriptor for subsequent read/write/seek.
    pub fn open(&mut self, name: &str) -> Result<Descriptor> {
        let index = self.root.lookup(name).ok_or(Error::NotFound)?;
        self.open_files.open(index)
    }

    /// Close a descriptor.
    pub fn close(&mut self, fd: Descriptor) -> Result<()> {
        self.open_files.close(fd)
    }

    /// Current size of the file behind `fd`.
    pub fn stat(&self, fd: Descriptor) -> Result<u32> {
        let index = self.open_files.root_entry_index(fd)?;
        Ok(self.root.entry(index).size())
    }

    /// Reposition `fd`'s offset. Fails if `offset` is past the file's end.
    pub fn lseek(&mut self, fd: Descriptor, offset: u64) -> Result<()> {
        let index = self.open_files.root_entry_index(fd)?;
        if offset > self.root.entry(index).size() as u64 {
            return Err(Error::SeekOutOfRange);
        }
        self.open_files.set_offset(fd, offset)
    }

    /// Read up to `buf.len()` bytes from `fd` at its current offset,
    /// advancing the offset by the number of bytes actually read.
    pub fn read(&mut self, fd: Descriptor, buf: &mut [u8]) -> Result<usize> {
        let index = self.open_files.root_entry_index(fd)?;
        let entry = *self.root.entry(index);
        let offset = self.open_files.offset(fd)?;

        let n = io::read(
            &mut self.device,
            &self.fat,
            self.superblock.data_index(),
            entry.first_block(),
            entry.size() as u64,
            offset,
            buf,
        )?;
        self.open_files.set_offset(fd, offset + n as u64)?;
        Ok(n)
    }

    /// Write `buf` to `fd` at its current offset, extending the file and
    /// its FAT chain as needed, advancing the offset by the number of bytes
    /// actually written.
    pub fn write(&mut self, fd: Descriptor, buf: &[u8]) -> Result<usize> {
        let index = self.open_files.root_entry_index(fd)?;
        let entry = *self.root.entry(index);
        let offset = self.open_files.offset(fd)?;

        let (n, end_offset) = io::write(
            &mut self.device,
            &mut self.fat,
            self.superblock.data_index(),
            entry.first_block(),
            offset,
            buf,
        )?;
        self.root.set_size_at_least(index, end_offset as u32);
        self.open_files.set_offset(fd, end_offset)?;
        Ok(n)
    }
}
