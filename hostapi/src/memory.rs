//! Bounds-checked access to guest linear memory.
//!
//! These functions operate on the raw byte slice of a guest memory and are
//! the only place an untrusted `(addr, len)` pair becomes a host-visible
//! view. Out-of-bounds requests return a [`HostError`] and never touch
//! memory.

use std::ops::Range;

use crate::error::HostError;
use crate::types::{GuestAddress, WORD_SIZE};

/// Validate `[addr, addr+len)` against a memory of `mem_len` bytes and
/// return it as a host index range.
pub fn check_range(mem_len: usize, addr: GuestAddress, len: u32) -> Result<Range<usize>, HostError> {
    let start = addr as usize;
    let end = start
        .checked_add(len as usize)
        .ok_or_else(|| HostError::out_of_bounds(addr, len as u64, mem_len))?;
    if end > mem_len {
        return Err(HostError::out_of_bounds(addr, len as u64, mem_len));
    }
    Ok(start..end)
}

/// Borrow `len` bytes at `addr`.
pub fn bytes(mem: &[u8], addr: GuestAddress, len: u32) -> Result<&[u8], HostError> {
    let range = check_range(mem.len(), addr, len)?;
    Ok(&mem[range])
}

/// Mutably borrow `len` bytes at `addr`.
pub fn bytes_mut(mem: &mut [u8], addr: GuestAddress, len: u32) -> Result<&mut [u8], HostError> {
    let range = check_range(mem.len(), addr, len)?;
    Ok(&mut mem[range])
}

/// Copy `data` into guest memory at `addr`.
pub fn write_bytes(mem: &mut [u8], addr: GuestAddress, data: &[u8]) -> Result<(), HostError> {
    let len = u32::try_from(data.len())
        .map_err(|_| HostError::out_of_bounds(addr, data.len() as u64, mem.len()))?;
    bytes_mut(mem, addr, len)?.copy_from_slice(data);
    Ok(())
}

/// Read the NUL-terminated string starting at `addr`.
///
/// Bytes that are not valid UTF-8 are replaced, so a garbled name simply
/// fails to match any registered identifier.
pub fn c_string(mem: &[u8], addr: GuestAddress) -> Result<String, HostError> {
    let start = addr as usize;
    if start >= mem.len() {
        return Err(HostError::out_of_bounds(addr, 1, mem.len()));
    }
    let tail = &mem[start..];
    let nul = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(HostError::UnterminatedString(addr))?;
    Ok(String::from_utf8_lossy(&tail[..nul]).into_owned())
}

/// Read a little-endian `u32` at `addr`.
pub fn read_u32(mem: &[u8], addr: GuestAddress) -> Result<u32, HostError> {
    let word = bytes(mem, addr, WORD_SIZE)?;
    Ok(u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
}

/// Write a little-endian `u32` at `addr`.
pub fn write_u32(mem: &mut [u8], addr: GuestAddress, value: u32) -> Result<(), HostError> {
    write_bytes(mem, addr, &value.to_le_bytes())
}
