//! Sandbox error types.

use xvm_hostapi::HostError;

/// Top-level error type for the sandbox crate.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Wasmtime engine, compilation, linking, or instantiation error.
    #[error("wasmtime error: {0}")]
    Wasmtime(#[from] anyhow::Error),

    /// Module validation failed (missing exports, bad imports, etc.).
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The guest declares an import the builtin resolver does not know.
    #[error("unresolved import: {module}.{name}")]
    UnresolvedImport { module: String, name: String },

    /// A builtin trapped the guest call.
    #[error("host trap: {0}")]
    HostTrap(HostError),

    /// Memory operation failed outside a builtin call.
    #[error("memory error: {0}")]
    MemoryError(String),

    /// Fuel exhausted during execution.
    #[error("fuel exhausted (instruction limit)")]
    FuelExhausted,

    /// WASM guest trapped for a reason other than a builtin.
    #[error("guest trapped: {0}")]
    GuestTrapped(String),
}

impl From<HostError> for SandboxError {
    fn from(err: HostError) -> Self {
        Self::HostTrap(err)
    }
}
