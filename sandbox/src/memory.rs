//! Guest memory façade over a Wasmtime linear memory.
//!
//! `GuestMemory` is the only way builtins turn guest-supplied integers into
//! byte views. Every accessor validates against the memory's *current* size,
//! so a view taken before a guest re-entry (which may grow memory) must be
//! re-requested afterwards. The borrow checker enforces this: views borrow
//! the store, and calling back into the guest needs it mutably.

use wasmtime::{AsContext, Caller, Memory, StoreContext, StoreContextMut};

use xvm_hostapi::{memory, GuestAddress, HostError};

use crate::host_state::HostState;

/// Name of the linear memory export every guest must provide.
pub const MEMORY_EXPORT: &str = "memory";

/// Bounds-checked accessor for a guest's exported linear memory.
#[derive(Debug, Clone, Copy)]
pub struct GuestMemory {
    memory: Memory,
}

impl GuestMemory {
    pub fn new(memory: Memory) -> Self {
        Self { memory }
    }

    /// Locate the calling guest's `memory` export.
    pub fn from_caller(caller: &mut Caller<'_, HostState>) -> Result<Self, HostError> {
        caller
            .get_export(MEMORY_EXPORT)
            .and_then(|export| export.into_memory())
            .map(Self::new)
            .ok_or(HostError::MissingMemory)
    }

    /// Current size in bytes.
    pub fn size(&self, store: impl AsContext) -> usize {
        self.memory.data_size(store)
    }

    /// Borrow `[addr, addr+len)`.
    pub fn bytes<'a, T: 'a>(
        &self,
        store: impl Into<StoreContext<'a, T>>,
        addr: GuestAddress,
        len: u32,
    ) -> Result<&'a [u8], HostError> {
        memory::bytes(self.memory.data(store), addr, len)
    }

    /// Mutably borrow `[addr, addr+len)`.
    pub fn bytes_mut<'a, T: 'a>(
        &self,
        store: impl Into<StoreContextMut<'a, T>>,
        addr: GuestAddress,
        len: u32,
    ) -> Result<&'a mut [u8], HostError> {
        memory::bytes_mut(self.memory.data_mut(store), addr, len)
    }

    /// Copy `data` into guest memory at `addr`.
    pub fn write<'a, T: 'a>(
        &self,
        store: impl Into<StoreContextMut<'a, T>>,
        addr: GuestAddress,
        data: &[u8],
    ) -> Result<(), HostError> {
        memory::write_bytes(self.memory.data_mut(store), addr, data)
    }

    /// Decode the NUL-terminated string at `addr`.
    pub fn c_string<'a, T: 'a>(
        &self,
        store: impl Into<StoreContext<'a, T>>,
        addr: GuestAddress,
    ) -> Result<String, HostError> {
        memory::c_string(self.memory.data(store), addr)
    }

    pub fn read_u32<'a, T: 'a>(
        &self,
        store: impl Into<StoreContext<'a, T>>,
        addr: GuestAddress,
    ) -> Result<u32, HostError> {
        memory::read_u32(self.memory.data(store), addr)
    }

    pub fn write_u32<'a, T: 'a>(
        &self,
        store: impl Into<StoreContextMut<'a, T>>,
        addr: GuestAddress,
        value: u32,
    ) -> Result<(), HostError> {
        memory::write_u32(self.memory.data_mut(store), addr, value)
    }
}
