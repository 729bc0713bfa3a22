//! WASM module validation: builtin ABI compatibility checks.
//!
//! Validates that a compiled guest module can be linked against the
//! builtin table before it is accepted by the sandbox. Checks:
//!
//! 1. Memory export present
//! 2. Every import is a function the builtin resolver knows (no WASI)
//! 3. Every import has the builtin signature: five i32 params, one i32 result
//! 4. Modules importing encode/decode export the configured allocator
//!    as `(i32) -> i32`

use wasmtime::{ExternType, FuncType, Module, ValType};

use xvm_hostapi::types::{BUILTIN_PARAMS, DECODE_SYMBOL, ENCODE_SYMBOL};

use crate::error::SandboxError;
use crate::memory::MEMORY_EXPORT;
use crate::resolver::BuiltinResolver;

/// Check if a ValType is i32.
fn is_i32(vt: &ValType) -> bool {
    matches!(vt, ValType::I32)
}

/// Check that `ty` takes `params` i32s and returns `results` i32s.
fn has_i32_signature(ty: &FuncType, params: usize, results: usize) -> bool {
    let p: Vec<ValType> = ty.params().collect();
    let r: Vec<ValType> = ty.results().collect();
    p.len() == params && p.iter().all(is_i32) && r.len() == results && r.iter().all(is_i32)
}

/// Validate that a guest module meets the builtin ABI requirements.
pub fn validate_module(module: &Module, allocator_export: &str) -> Result<(), SandboxError> {
    validate_memory(module)?;
    let needs_allocator = validate_imports(module)?;
    if needs_allocator {
        validate_allocator(module, allocator_export)?;
    }
    Ok(())
}

fn validate_memory(module: &Module) -> Result<(), SandboxError> {
    let has_memory = module
        .exports()
        .any(|e| e.name() == MEMORY_EXPORT && matches!(e.ty(), ExternType::Memory(_)));
    if !has_memory {
        return Err(SandboxError::ValidationError(format!(
            "module must export '{}'",
            MEMORY_EXPORT
        )));
    }
    Ok(())
}

/// Check every import against the builtin table.
///
/// Returns whether the module imports a builtin that allocates guest memory.
fn validate_imports(module: &Module) -> Result<bool, SandboxError> {
    let resolver = BuiltinResolver::new();
    let mut needs_allocator = false;

    for import in module.imports() {
        let module_name = import.module();

        // Reject WASI imports
        if module_name.starts_with("wasi") {
            return Err(SandboxError::ValidationError(format!(
                "WASI import not allowed: {}::{}",
                module_name,
                import.name()
            )));
        }

        let func_ty = match import.ty() {
            ExternType::Func(ft) => ft,
            _ => {
                return Err(SandboxError::ValidationError(format!(
                    "non-function import not allowed: {}::{}",
                    module_name,
                    import.name()
                )));
            }
        };

        let builtin = resolver
            .resolve_import(module_name, import.name())
            .ok_or_else(|| {
                SandboxError::ValidationError(format!(
                    "import is not a registered builtin: {}::{}",
                    module_name,
                    import.name()
                ))
            })?;

        if !has_i32_signature(&func_ty, BUILTIN_PARAMS, 1) {
            return Err(SandboxError::ValidationError(format!(
                "import '{}' has wrong signature: expected {} i32 params and 1 i32 result",
                builtin.qualified_name(),
                BUILTIN_PARAMS
            )));
        }

        if builtin.symbol == ENCODE_SYMBOL || builtin.symbol == DECODE_SYMBOL {
            needs_allocator = true;
        }
    }

    Ok(needs_allocator)
}

fn validate_allocator(module: &Module, allocator_export: &str) -> Result<(), SandboxError> {
    let export = module
        .exports()
        .find(|e| e.name() == allocator_export)
        .ok_or_else(|| {
            SandboxError::ValidationError(format!(
                "module imports a codec builtin but does not export allocator '{}'",
                allocator_export
            ))
        })?;

    match export.ty() {
        ExternType::Func(ft) if has_i32_signature(&ft, 1, 1) => Ok(()),
        _ => Err(SandboxError::ValidationError(format!(
            "allocator export '{}' must be a function (i32) -> i32",
            allocator_export
        ))),
    }
}
