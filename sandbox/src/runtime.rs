//! Sandbox runtime: Wasmtime engine, module loading, and guest calls.
//!
//! `Sandbox` compiles and validates a guest module once and links the
//! builtins its imports resolve to. Each [`Sandbox::instantiate`] call
//! creates a fresh, isolated `GuestInstance` with its own store, fuel, and
//! memory limits. A `Sandbox` can be shared across threads.

use std::path::Path;

use wasmtime::{Config, Engine, Instance, Linker, Module, Store, Trap, Val};

use xvm_hostapi::{GuestAddress, HostError};

use crate::config::SandboxConfig;
use crate::error::SandboxError;
use crate::host_state::HostState;
use crate::memory::{GuestMemory, MEMORY_EXPORT};
use crate::resolver::BuiltinResolver;
use crate::validation::validate_module;

/// A compiled, validated, and linked guest module.
pub struct Sandbox {
    engine: Engine,
    module: Module,
    linker: Linker<HostState>,
    config: SandboxConfig,
}

impl Sandbox {
    /// Create a new sandbox from WASM bytecode (or WAT text).
    ///
    /// Validates the module's imports and exports before accepting.
    pub fn new(wasm_bytes: &[u8], config: SandboxConfig) -> Result<Self, SandboxError> {
        let engine = create_engine()?;
        let module = Module::new(&engine, wasm_bytes)?;
        Self::with_module(engine, module, config)
    }

    /// Load from a `.wasm` or `.wat` file path.
    pub fn from_file(path: &Path, config: SandboxConfig) -> Result<Self, SandboxError> {
        let engine = create_engine()?;
        let module = Module::from_file(&engine, path)?;
        Self::with_module(engine, module, config)
    }

    fn with_module(
        engine: Engine,
        module: Module,
        config: SandboxConfig,
    ) -> Result<Self, SandboxError> {
        validate_module(&module, &config.allocator_export)?;
        let mut linker = Linker::new(&engine);
        BuiltinResolver::new().link_module(&mut linker, &module)?;
        Ok(Self {
            engine,
            module,
            linker,
            config,
        })
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Create a fresh guest instance.
    pub fn instantiate(&self) -> Result<GuestInstance, SandboxError> {
        let mut store = Store::new(&self.engine, HostState::new(&self.config));
        store.limiter(|state| &mut state.limits);
        store.set_fuel(self.config.fuel_limit)?;

        let instance = handle_trap(self.linker.instantiate(&mut store, &self.module))?;
        let memory = instance
            .get_memory(&mut store, MEMORY_EXPORT)
            .map(GuestMemory::new)
            .ok_or_else(|| SandboxError::MemoryError("no memory export".into()))?;

        Ok(GuestInstance {
            store,
            instance,
            memory,
        })
    }
}

/// One running guest instance: its store, exports, and memory.
pub struct GuestInstance {
    store: Store<HostState>,
    instance: Instance,
    memory: GuestMemory,
}

impl GuestInstance {
    /// Call an exported guest function that takes and returns `i32`s.
    ///
    /// Returns the first result, or `0` for functions without results.
    pub fn call(&mut self, export: &str, args: &[u32]) -> Result<u32, SandboxError> {
        let func = self
            .instance
            .get_func(&mut self.store, export)
            .ok_or_else(|| SandboxError::GuestTrapped(format!("no exported function '{}'", export)))?;

        let params: Vec<Val> = args.iter().map(|&a| Val::I32(a as i32)).collect();
        let result_count = func.ty(&self.store).results().len();
        let mut results = vec![Val::I32(0); result_count];

        handle_trap(func.call(&mut self.store, &params, &mut results))?;

        match results.first() {
            Some(Val::I32(v)) => Ok(*v as u32),
            Some(other) => Err(SandboxError::GuestTrapped(format!(
                "export '{}' returned non-i32 value {:?}",
                export, other
            ))),
            None => Ok(0),
        }
    }

    /// Copy `data` into guest memory at `addr`.
    pub fn write(&mut self, addr: GuestAddress, data: &[u8]) -> Result<(), SandboxError> {
        Ok(self.memory.write(&mut self.store, addr, data)?)
    }

    /// Copy `len` bytes out of guest memory at `addr`.
    pub fn read(&self, addr: GuestAddress, len: u32) -> Result<Vec<u8>, SandboxError> {
        Ok(self.memory.bytes(&self.store, addr, len)?.to_vec())
    }

    pub fn read_u32(&self, addr: GuestAddress) -> Result<u32, SandboxError> {
        Ok(self.memory.read_u32(&self.store, addr)?)
    }

    /// Current linear memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.memory.size(&self.store)
    }

    /// Fuel left in this instance.
    pub fn fuel_remaining(&self) -> Result<u64, SandboxError> {
        Ok(self.store.get_fuel()?)
    }
}

/// Create a Wasmtime engine with deterministic configuration.
fn create_engine() -> Result<Engine, SandboxError> {
    let mut wasm_config = Config::new();

    // Fuel metering bounds guest loops
    wasm_config.consume_fuel(true);

    // Determinism enforcement
    wasm_config.wasm_threads(false);
    wasm_config.wasm_simd(false);
    wasm_config.wasm_relaxed_simd(false);
    wasm_config.wasm_multi_memory(false);
    wasm_config.cranelift_nan_canonicalization(true);

    Ok(Engine::new(&wasm_config)?)
}

/// Handle a guest call result, classifying traps.
///
/// Fuel exhaustion, including inside the guest allocator → `SandboxError::FuelExhausted`
/// Builtin violation → `SandboxError::HostTrap`
/// Other traps → `SandboxError::GuestTrapped`
fn handle_trap<R>(result: Result<R, anyhow::Error>) -> Result<R, SandboxError> {
    match result {
        Ok(val) => Ok(val),
        Err(e) => {
            match e.downcast_ref::<HostError>() {
                Some(HostError::FuelExhausted) => return Err(SandboxError::FuelExhausted),
                Some(host) => return Err(SandboxError::HostTrap(host.clone())),
                None => {}
            }
            if matches!(e.downcast_ref::<Trap>(), Some(Trap::OutOfFuel)) {
                return Err(SandboxError::FuelExhausted);
            }
            Err(SandboxError::GuestTrapped(format!("{:#}", e)))
        }
    }
}
