//! Guest ABI types and constants.
//!
//! Every builtin takes five `i32` arguments and returns an `i32` status.
//! Addresses and lengths are unsigned offsets into guest linear memory.

/// Unsigned offset into guest linear memory. Never a host pointer.
pub type GuestAddress = u32;

/// Import module every builtin is registered under.
pub const IMPORT_MODULE: &str = "env";

/// Symbol of the hashing builtin.
pub const HASH_SYMBOL: &str = "_xvm_hash";

/// Symbol of the encoding builtin.
pub const ENCODE_SYMBOL: &str = "_xvm_encode";

/// Symbol of the decoding builtin.
pub const DECODE_SYMBOL: &str = "_xvm_decode";

/// Number of `i32` parameters every builtin takes.
pub const BUILTIN_PARAMS: usize = 5;

/// Size of an out-parameter word written back to the guest.
pub const WORD_SIZE: u32 = 4;

/// Guest export used to allocate result buffers (emscripten convention).
pub const DEFAULT_ALLOCATOR_EXPORT: &str = "_malloc";

/// Status codes returned to the guest.
///
/// Only data-dependent failures are reported this way. Everything else
/// traps (see [`HostError`](crate::HostError)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Status {
    Ok = 0,
    MalformedInput = 1,
}

impl Status {
    /// Return the raw representation handed to the guest.
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_values() {
        assert_eq!(Status::Ok.as_u32(), 0);
        assert_eq!(Status::MalformedInput.as_u32(), 1);
    }
}
