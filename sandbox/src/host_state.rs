//! Per-instance state held in the Wasmtime Store.
//!
//! `HostState` lives inside `Store<HostState>` for one guest instance. It
//! is never shared between stores; everything builtins share lives in the
//! static resolver table instead.

use wasmtime::{StoreLimits, StoreLimitsBuilder};

use crate::config::SandboxConfig;

/// Per-instance mutable state held in the Wasmtime `Store`.
pub struct HostState {
    /// Guest export the allocator gateway calls to obtain result buffers.
    pub allocator_export: String,
    /// Resource limits for this instance's memories and tables.
    pub limits: StoreLimits,
}

impl HostState {
    /// Create the store data for a fresh guest instance.
    pub fn new(config: &SandboxConfig) -> Self {
        let limits = StoreLimitsBuilder::new()
            .memory_size(config.max_memory_bytes())
            .instances(1)
            .build();
        Self {
            allocator_export: config.allocator_export.clone(),
            limits,
        }
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::new(&SandboxConfig::default())
    }
}
