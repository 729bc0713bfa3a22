//! Host-side error types for the XVM builtins.
//!
//! `HostError` covers every failure that must abort the current guest call
//! with a trap: unknown algorithm or codec names, bad guest pointers, and
//! allocator failures. It is never turned into a guest-visible status code.
//!
//! `CodecError` is the only recoverable failure. Builtins map it to
//! [`Status::MalformedInput`](crate::Status::MalformedInput) so the guest can
//! branch on bad input deterministically.

use crate::types::GuestAddress;

/// A host-detected violation that traps the current guest call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The guest named a hash algorithm that is not registered.
    #[error("hash {0} not found")]
    UnknownHash(String),

    /// The guest named a codec that is not registered.
    #[error("codec {0} not found")]
    UnknownCodec(String),

    /// `[addr, addr+len)` falls outside guest linear memory.
    #[error("guest range [{addr}, {addr}+{len}) out of bounds (memory size {size})")]
    OutOfBounds {
        addr: GuestAddress,
        len: u64,
        size: usize,
    },

    /// No NUL terminator between `addr` and the end of guest memory.
    #[error("unterminated string at guest address {0}")]
    UnterminatedString(GuestAddress),

    /// The output region cannot hold the full digest.
    #[error("output buffer too small: need {needed} bytes, got {available}")]
    OutputTooSmall { needed: usize, available: u32 },

    /// The guest does not export a linear memory named `memory`.
    #[error("guest does not export memory")]
    MissingMemory,

    /// The guest allocator export is absent or has the wrong signature.
    #[error("guest allocator `{0}` not available")]
    AllocatorMissing(String),

    /// The guest allocator refused or failed the request.
    #[error("guest allocation of {size} bytes failed: {reason}")]
    AllocationFailed { size: u32, reason: String },

    /// Guest code re-entered from a builtin ran out of fuel.
    #[error("fuel exhausted in guest code called from a builtin")]
    FuelExhausted,
}

impl HostError {
    /// Build an out-of-bounds error for a range request.
    pub fn out_of_bounds(addr: GuestAddress, len: u64, size: usize) -> Self {
        Self::OutOfBounds { addr, len, size }
    }

    /// Returns true for errors caused by the guest naming an unsupported
    /// algorithm or codec.
    pub fn is_unknown_name(&self) -> bool {
        matches!(self, Self::UnknownHash(_) | Self::UnknownCodec(_))
    }

    /// Returns true for errors caused by a pointer or length outside guest
    /// memory.
    pub fn is_bounds(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds { .. }
                | Self::UnterminatedString(_)
                | Self::OutputTooSmall { .. }
                | Self::MissingMemory
        )
    }
}

/// Malformed input to a known codec.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),
}
