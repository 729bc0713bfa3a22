//! `xvm-sandbox`: Wasmtime-based builtin resolver and host function bridge.
//!
//! Guests cannot hash or transcode bytes themselves; they import a fixed set
//! of builtins from the `env` module. This crate:
//!
//! - **Resolves** import names against a static, immutable builtin table
//! - **Implements** the builtins (`_xvm_hash`, `_xvm_encode`, `_xvm_decode`)
//! - **Marshals** guest memory through a bounds-checked façade
//! - **Allocates** result buffers through the guest's own allocator
//! - **Validates** guest modules before linking (no WASI, no unknown imports)
//! - **Runs** guests in fuel-metered, memory-limited Wasmtime stores
//!
//! The primary entry points are [`BuiltinResolver`] and [`Sandbox`].

pub mod error;
pub mod config;
pub mod host_state;
pub mod memory;
pub mod allocator;
pub mod builtins;
pub mod resolver;
pub mod validation;
pub mod runtime;

pub use error::SandboxError;
pub use config::SandboxConfig;
pub use host_state::HostState;
pub use memory::GuestMemory;
pub use resolver::{Builtin, BuiltinResolver};
pub use runtime::{GuestInstance, Sandbox};
