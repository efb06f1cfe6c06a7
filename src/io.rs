//! The I/O engine: translates descriptor-relative byte ranges into a
//! sequence of block reads/writes along a file's FAT chain, allocating new
//! blocks on write when needed, using a bounce buffer for partial-block
//! access.
//!
//! `count` is clamped to the remaining file size up front, so a read can
//! never walk past the chain's logical end.

use log::{trace, warn};

use crate::block::{BlockDevice, BLOCK_SIZE};
use crate::error::Result;
use crate::fat::{Fat, Walk};

fn disk_block(data_index: u16, fat_index: u16) -> u64 {
    data_index as u64 + fat_index as u64
}

/// Read up to `buf.len()` bytes starting at `offset` from a file whose
/// current size is `size` and whose FAT chain starts at `first_block`.
///
/// Returns the number of bytes actually copied into `buf`.
pub fn read(
    device: &mut BlockDevice,
    fat: &Fat,
    data_index: u16,
    first_block: u16,
    size: u64,
    offset: u64,
    buf: &mut [u8],
) -> Result<usize> {
    if buf.is_empty() {
        return Ok(0);
    }

    let remaining_in_file = size.saturating_sub(offset);
    let effective_count = (buf.len() as u64).min(remaining_in_file) as usize;
    if effective_count == 0 {
        return Ok(0);
    }

    let mut block = match fat.walk(first_block, offset)? {
        Walk::Block(b) => b,
        Walk::ChainEnded => return Ok(0),
    };

    let mut remaining = effective_count;
    let mut buf_off = 0usize;
    let mut cur_offset = offset;
    let mut first_iter = true;

    while remaining > 0 {
        let left = if first_iter {
            (cur_offset % BLOCK_SIZE as u64) as usize
        } else {
            0
        };
        let right = if remaining + left < BLOCK_SIZE {
            BLOCK_SIZE - left - remaining
        } else {
            0
        };

        let mut bounce = [0u8; BLOCK_SIZE];
        device.read_block(disk_block(data_index, block), &mut bounce)?;

        let to_copy = BLOCK_SIZE - left - right;
        buf[buf_off..buf_off + to_copy].copy_from_slice(&bounce[left..left + to_copy]);
        trace!("read {} bytes from block {} (left={left}, right={right})", to_copy, block);

        buf_off += to_copy;
        cur_offset += to_copy as u64;
        remaining -= to_copy;
        first_iter = false;

        if remaining > 0 {
            block = match fat.walk(block, BLOCK_SIZE as u64)? {
                Walk::Block(b) => b,
                Walk::ChainEnded => break,
            };
        }
    }

    Ok(buf_off)
}

/// Write `buf` starting at `offset` into a file whose FAT chain starts at
/// `first_block`, extending the chain as needed.
///
/// Returns the number of bytes actually written and the offset reached
/// (`offset + bytes_written`); the caller is responsible for updating the
/// entry's size to `max(old_size, offset_reached)`.
pub fn write(
    device: &mut BlockDevice,
    fat: &mut Fat,
    data_index: u16,
    first_block: u16,
    offset: u64,
    buf: &[u8],
) -> Result<(usize, u64)> {
    if buf.is_empty() {
        return Ok((0, offset));
    }

    let mut block_opt = match fat.walk(first_block, offset)? {
        Walk::Block(b) => Some(b),
        Walk::ChainEnded => None,
    };

    let mut remaining = buf.len();
    let mut buf_off = 0usize;
    let mut cur_offset = offset;
    let mut first_iter = true;

    while remaining > 0 {
        let block = match block_opt {
            Some(b) => b,
            None => match fat.extend(first_block)? {
                Some(b) => b,
                None => {
                    warn!("disk full after writing {} of {} bytes", buf_off, buf.len());
                    break;
                }
            },
        };

        let left = if first_iter {
            (cur_offset % BLOCK_SIZE as u64) as usize
        } else {
            0
        };
        let right = if remaining + left < BLOCK_SIZE {
            BLOCK_SIZE - left - remaining
        } else {
            0
        };

        let mut bounce = [0u8; BLOCK_SIZE];
        if left != 0 || right != 0 {
            device.read_block(disk_block(data_index, block), &mut bounce)?;
        }

        let to_write = BLOCK_SIZE - left - right;
        bounce[left..left + to_write].copy_from_slice(&buf[buf_off..buf_off + to_write]);
        device.write_block(disk_block(data_index, block), &bounce)?;
        trace!("wrote {} bytes to block {} (left={left}, right={right})", to_write, block);

        buf_off += to_write;
        cur_offset += to_write as u64;
        remaining -= to_write;
        first_iter = false;

        if remaining > 0 {
            block_opt = match fat.walk(block, BLOCK_SIZE as u64)? {
                Walk::Block(b) => Some(b),
                Walk::ChainEnded => None,
            };
        }
    }

    Ok((buf_off, cur_offset))
}
