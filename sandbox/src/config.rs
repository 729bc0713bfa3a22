//! Sandbox configuration.
//!
//! Limits apply per guest instance; every instance gets a fresh store
//! built from the same `SandboxConfig`.

use xvm_hostapi::types::DEFAULT_ALLOCATOR_EXPORT;

/// Size of one WASM page in bytes.
pub const WASM_PAGE_SIZE: usize = 65536;

/// Configuration for the WASM sandbox.
///
/// Controls memory limits, instruction fuel, and the guest allocator the
/// encode/decode builtins call into.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Upper bound on guest linear memory, in 64 KiB pages. Applies to
    /// growth triggered by the guest allocator during a builtin call too.
    pub max_memory_pages: u32,

    /// Fuel granted to each instance. Builtins run on the host and consume
    /// none, but the guest code around them does.
    pub fuel_limit: u64,

    /// Name of the guest export that allocates result buffers.
    pub allocator_export: String,
}

impl SandboxConfig {
    /// Maximum linear memory in bytes.
    pub fn max_memory_bytes(&self) -> usize {
        (self.max_memory_pages as usize).saturating_mul(WASM_PAGE_SIZE)
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            // 16 MiB
            max_memory_pages: 256,
            fuel_limit: 100_000_000,
            allocator_export: DEFAULT_ALLOCATOR_EXPORT.to_string(),
        }
    }
}
