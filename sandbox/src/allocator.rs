//! Guest allocator gateway.
//!
//! Builtins that return variable-length results ask the guest to allocate
//! the buffer through its own exported allocator, so the guest keeps full
//! ownership of its heap layout. The protocol is two-phase: request a size,
//! receive an address, then re-validate that address against the current
//! memory bounds before writing, since the guest call may have grown memory.

use wasmtime::{Caller, Trap};

use xvm_hostapi::{GuestAddress, HostError};

use crate::host_state::HostState;
use crate::memory::GuestMemory;

/// Ask the guest allocator for `size` bytes and return the block's address.
///
/// The block is not zeroed. Callers must fully populate it before exposing
/// its length to the guest.
pub fn allocate(
    caller: &mut Caller<'_, HostState>,
    memory: &GuestMemory,
    size: u32,
) -> Result<GuestAddress, HostError> {
    let export = caller.data().allocator_export.clone();
    let malloc = caller
        .get_export(&export)
        .and_then(|e| e.into_func())
        .and_then(|f| f.typed::<u32, u32>(&*caller).ok())
        .ok_or_else(|| HostError::AllocatorMissing(export.clone()))?;

    let addr = malloc
        .call(&mut *caller, size)
        .map_err(|e| match e.downcast_ref::<Trap>() {
            Some(Trap::OutOfFuel) => HostError::FuelExhausted,
            _ => HostError::AllocationFailed {
                size,
                reason: format!("{e:#}"),
            },
        })?;

    if addr == 0 && size > 0 {
        return Err(HostError::AllocationFailed {
            size,
            reason: "allocator returned null".into(),
        });
    }

    // The allocator may have grown memory; validate against the new size.
    memory.bytes(&*caller, addr, size)?;
    Ok(addr)
}

/// Allocate a guest block sized for `data` and copy `data` into it.
pub fn allocate_and_write(
    caller: &mut Caller<'_, HostState>,
    memory: &GuestMemory,
    data: &[u8],
) -> Result<GuestAddress, HostError> {
    let size = u32::try_from(data.len()).map_err(|_| HostError::AllocationFailed {
        size: u32::MAX,
        reason: format!("result of {} bytes exceeds guest address space", data.len()),
    })?;
    let addr = allocate(caller, memory, size)?;
    memory.write(&mut *caller, addr, data)?;
    Ok(addr)
}
