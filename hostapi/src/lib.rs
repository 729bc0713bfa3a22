//! `xvm-hostapi`: engine-independent core of the XVM builtin host functions.
//!
//! This crate holds everything the builtins need that does not depend on
//! the WASM engine:
//!
//! - `HostError`: trap taxonomy for host calls
//! - `CodecError`: recoverable malformed-input errors
//! - `Status` and the guest ABI constants (import names, word size)
//! - `HashAlgorithm`: closed hash function family
//! - `Codec`: closed codec family
//! - `memory`: bounds-checked slice access to guest linear memory
//!
//! The Wasmtime side lives in `xvm-sandbox`.

pub mod error;
pub mod types;
pub mod memory;
pub mod hash;
pub mod codec;

// Re-export commonly used types at the crate root.
pub use error::{CodecError, HostError};
pub use types::{GuestAddress, Status};
pub use hash::HashAlgorithm;
pub use codec::Codec;
