//! Builtin host functions callable by guests.
//!
//! Each builtin takes five `i32` arguments (guest addresses and lengths) and
//! returns an `i32` status. Each one:
//! 1. Locates the guest memory through [`GuestMemory`]
//! 2. Decodes the NUL-terminated algorithm/codec name and resolves it
//! 3. Borrows the input view and does the work
//! 4. Writes results back through the façade (allocating via the guest for
//!    variable-length output)
//!
//! Failure policy: an unknown name, a bad pointer, or an allocator failure
//! traps the guest call. Malformed input to a known codec is data, not a
//! contract violation, and returns [`Status::MalformedInput`].

use wasmtime::Caller;

use xvm_hostapi::types::{DECODE_SYMBOL, ENCODE_SYMBOL, HASH_SYMBOL, WORD_SIZE};
use xvm_hostapi::{Codec, GuestAddress, HashAlgorithm, HostError, Status};

use crate::allocator;
use crate::host_state::HostState;
use crate::memory::GuestMemory;

/// Signature shared by every builtin.
pub type HostFn = fn(Caller<'_, HostState>, u32, u32, u32, u32, u32) -> anyhow::Result<u32>;

/// Convert a builtin outcome into what Wasmtime expects: a status for the
/// guest, or an error that traps the call.
fn complete(symbol: &str, result: Result<Status, HostError>) -> anyhow::Result<u32> {
    match result {
        Ok(status) => Ok(status.as_u32()),
        Err(err) => {
            tracing::debug!(import = symbol, error = %err, "builtin trapped");
            Err(err.into())
        }
    }
}

// ── Hashing ──

/// `env._xvm_hash(name, input, input_len, output, output_len) -> status`
pub fn xvm_hash(
    mut caller: Caller<'_, HostState>,
    name_addr: u32,
    input_addr: u32,
    input_len: u32,
    output_addr: u32,
    output_len: u32,
) -> anyhow::Result<u32> {
    tracing::trace!(import = HASH_SYMBOL, input_len, output_len, "builtin call");
    let result = hash(
        &mut caller,
        name_addr,
        input_addr,
        input_len,
        output_addr,
        output_len,
    );
    complete(HASH_SYMBOL, result)
}

fn hash(
    caller: &mut Caller<'_, HostState>,
    name_addr: GuestAddress,
    input_addr: GuestAddress,
    input_len: u32,
    output_addr: GuestAddress,
    output_len: u32,
) -> Result<Status, HostError> {
    let memory = GuestMemory::from_caller(caller)?;
    let algorithm: HashAlgorithm = memory.c_string(&*caller, name_addr)?.parse()?;

    // The whole declared output region must be addressable.
    memory.bytes(&*caller, output_addr, output_len)?;
    if (output_len as usize) < algorithm.digest_size() {
        return Err(HostError::OutputTooSmall {
            needed: algorithm.digest_size(),
            available: output_len,
        });
    }

    let digest = algorithm.digest(memory.bytes(&*caller, input_addr, input_len)?);
    memory.write(&mut *caller, output_addr, &digest)?;
    Ok(Status::Ok)
}

// ── Codecs ──

/// `env._xvm_encode(name, input, input_len, out_ptr_ptr, out_len_ptr) -> status`
pub fn xvm_encode(
    mut caller: Caller<'_, HostState>,
    name_addr: u32,
    input_addr: u32,
    input_len: u32,
    out_ptr_addr: u32,
    out_len_addr: u32,
) -> anyhow::Result<u32> {
    tracing::trace!(import = ENCODE_SYMBOL, input_len, "builtin call");
    let result = transcode(
        &mut caller,
        Direction::Encode,
        name_addr,
        input_addr,
        input_len,
        out_ptr_addr,
        out_len_addr,
    );
    complete(ENCODE_SYMBOL, result)
}

/// `env._xvm_decode(name, input, input_len, out_ptr_ptr, out_len_ptr) -> status`
///
/// Returns `1` without writing the out-parameters if the input is malformed.
pub fn xvm_decode(
    mut caller: Caller<'_, HostState>,
    name_addr: u32,
    input_addr: u32,
    input_len: u32,
    out_ptr_addr: u32,
    out_len_addr: u32,
) -> anyhow::Result<u32> {
    tracing::trace!(import = DECODE_SYMBOL, input_len, "builtin call");
    let result = transcode(
        &mut caller,
        Direction::Decode,
        name_addr,
        input_addr,
        input_len,
        out_ptr_addr,
        out_len_addr,
    );
    complete(DECODE_SYMBOL, result)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encode,
    Decode,
}

fn transcode(
    caller: &mut Caller<'_, HostState>,
    direction: Direction,
    name_addr: GuestAddress,
    input_addr: GuestAddress,
    input_len: u32,
    out_ptr_addr: GuestAddress,
    out_len_addr: GuestAddress,
) -> Result<Status, HostError> {
    let memory = GuestMemory::from_caller(caller)?;
    let codec: Codec = memory.c_string(&*caller, name_addr)?.parse()?;

    let output = {
        let input = memory.bytes(&*caller, input_addr, input_len)?;
        match direction {
            Direction::Encode => codec.encode(input),
            Direction::Decode => match codec.decode(input) {
                Ok(out) => out,
                Err(err) => {
                    tracing::trace!(codec = codec.name(), error = %err, "malformed codec input");
                    return Ok(Status::MalformedInput);
                }
            },
        }
    };

    // Check both out-parameter slots up front so a bad slot traps before
    // anything is allocated or written.
    memory.bytes(&*caller, out_ptr_addr, WORD_SIZE)?;
    memory.bytes(&*caller, out_len_addr, WORD_SIZE)?;

    let addr = allocator::allocate_and_write(caller, &memory, &output)?;
    memory.write_u32(&mut *caller, out_ptr_addr, addr)?;
    memory.write_u32(&mut *caller, out_len_addr, output.len() as u32)?;
    Ok(Status::Ok)
}
