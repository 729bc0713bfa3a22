//! Builtin resolver: the closed table mapping import names to host functions.
//!
//! The table is a `static` built at compile time and never mutated, so any
//! number of guest instances can resolve and link against it concurrently
//! without synchronization. Lookups are pure reads and do not allocate.

use std::collections::BTreeSet;
use std::fmt;

use wasmtime::{Linker, Module};

use xvm_hostapi::types::{DECODE_SYMBOL, ENCODE_SYMBOL, HASH_SYMBOL, IMPORT_MODULE};

use crate::builtins::{self, HostFn};
use crate::error::SandboxError;
use crate::host_state::HostState;

/// A host function registered under an import module and symbol.
pub struct Builtin {
    pub module: &'static str,
    pub symbol: &'static str,
    pub func: HostFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("module", &self.module)
            .field("symbol", &self.symbol)
            .finish_non_exhaustive()
    }
}

impl Builtin {
    /// `"<module>.<symbol>"`, the form accepted by [`BuiltinResolver::resolve`].
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.symbol)
    }

    fn matches(&self, module: &str, symbol: &str) -> bool {
        self.module == module && self.symbol == symbol
    }
}

static BUILTINS: &[Builtin] = &[
    Builtin {
        module: IMPORT_MODULE,
        symbol: HASH_SYMBOL,
        func: builtins::xvm_hash,
    },
    Builtin {
        module: IMPORT_MODULE,
        symbol: ENCODE_SYMBOL,
        func: builtins::xvm_encode,
    },
    Builtin {
        module: IMPORT_MODULE,
        symbol: DECODE_SYMBOL,
        func: builtins::xvm_decode,
    },
];

/// Handle over the static builtin table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinResolver;

impl BuiltinResolver {
    pub const fn new() -> Self {
        Self
    }

    /// Every registered builtin, in registration order.
    pub fn builtins(&self) -> &'static [Builtin] {
        BUILTINS
    }

    /// Qualified names of every registered builtin.
    pub fn names(&self) -> impl Iterator<Item = String> {
        BUILTINS.iter().map(Builtin::qualified_name)
    }

    /// Resolve a qualified name such as `env._xvm_hash`. Case-sensitive.
    pub fn resolve(&self, qualified: &str) -> Option<&'static Builtin> {
        let (module, symbol) = qualified.split_once('.')?;
        self.resolve_import(module, symbol)
    }

    /// Resolve an import by module and symbol.
    pub fn resolve_import(&self, module: &str, symbol: &str) -> Option<&'static Builtin> {
        BUILTINS.iter().find(|b| b.matches(module, symbol))
    }

    /// Register every function `module` imports with `linker`.
    ///
    /// Fails with [`SandboxError::UnresolvedImport`] on the first import
    /// that is not a builtin.
    pub fn link_module(
        &self,
        linker: &mut Linker<HostState>,
        module: &Module,
    ) -> Result<(), SandboxError> {
        let mut linked = BTreeSet::new();
        for import in module.imports() {
            let builtin = self
                .resolve_import(import.module(), import.name())
                .ok_or_else(|| SandboxError::UnresolvedImport {
                    module: import.module().to_string(),
                    name: import.name().to_string(),
                })?;
            if linked.insert((builtin.module, builtin.symbol)) {
                linker.func_wrap(builtin.module, builtin.symbol, builtin.func)?;
            }
        }
        tracing::debug!(imports = linked.len(), "linked builtin imports");
        Ok(())
    }
}
