//! Shared test helpers for integration tests.
//!
//! Provides WAT guest modules that forward to the builtins, a fixed memory
//! layout for arguments, and helpers that stage inputs, call a builtin, and
//! read results back.

#![allow(dead_code)]

use xvm_sandbox::{GuestInstance, Sandbox, SandboxConfig, SandboxError};

// ── Guest memory layout ──

/// NUL-terminated algorithm/codec name.
pub const NAME_ADDR: u32 = 0;
/// Out-parameter slot receiving the result pointer.
pub const OUT_PTR_ADDR: u32 = 64;
/// Out-parameter slot receiving the result length.
pub const OUT_LEN_ADDR: u32 = 68;
/// Fixed-size hash output region.
pub const OUTPUT_ADDR: u32 = 128;
/// Input bytes.
pub const INPUT_ADDR: u32 = 1024;
/// First address handed out by the bump allocator.
pub const HEAP_BASE: u32 = 16384;
/// Initial memory size of every test guest (4 pages).
pub const MEMORY_BYTES: u32 = 4 * 65536;

/// Value written into the out-parameter slots before a codec call so tests
/// can tell whether the builtin wrote them.
pub const SENTINEL: u32 = 0xAAAA_AAAA;

// ── Guest modules ──

/// Bump allocator over a mutable global, 8-byte aligned.
pub const BUMP_MALLOC: &str = r#"
    (func (export "_malloc") (param $size i32) (result i32)
        (local $ptr i32)
        global.get $heap
        local.set $ptr
        global.get $heap
        local.get $size
        i32.add
        i32.const 7
        i32.add
        i32.const -8
        i32.and
        global.set $heap
        local.get $ptr)
"#;

/// Allocator that refuses every request.
pub const NULL_MALLOC: &str = r#"
    (func (export "_malloc") (param $size i32) (result i32)
        i32.const 0)
"#;

/// Allocator that traps.
pub const TRAPPING_MALLOC: &str = r#"
    (func (export "_malloc") (param $size i32) (result i32)
        unreachable)
"#;

/// Allocator that never returns.
pub const SPINNING_MALLOC: &str = r#"
    (func (export "_malloc") (param $size i32) (result i32)
        (loop $l (br $l))
        i32.const 0)
"#;

/// Allocator that returns an address past the end of memory.
pub const WILD_MALLOC: &str = r#"
    (func (export "_malloc") (param $size i32) (result i32)
        i32.const -16)
"#;

/// Allocator that grows memory by one page per call and hands out the new
/// page. Any view taken before the call is stale afterwards.
pub const GROWING_MALLOC: &str = r#"
    (func (export "_malloc") (param $size i32) (result i32)
        i32.const 1
        memory.grow
        i32.const 65536
        i32.mul)
"#;

/// Build a guest that imports all three builtins, re-exports them as
/// `hash`/`encode`/`decode`, and uses `allocator` as its `_malloc`.
pub fn guest_wat(allocator: &str) -> String {
    format!(
        r#"
        (module
            (import "env" "_xvm_hash" (func $hash (param i32 i32 i32 i32 i32) (result i32)))
            (import "env" "_xvm_encode" (func $encode (param i32 i32 i32 i32 i32) (result i32)))
            (import "env" "_xvm_decode" (func $decode (param i32 i32 i32 i32 i32) (result i32)))
            (memory (export "memory") 4)
            (global $heap (mut i32) (i32.const {heap}))
            (func (export "heap_top") (result i32) global.get $heap)
            (func (export "hash") (param i32 i32 i32 i32 i32) (result i32)
                local.get 0 local.get 1 local.get 2 local.get 3 local.get 4
                call $hash)
            (func (export "encode") (param i32 i32 i32 i32 i32) (result i32)
                local.get 0 local.get 1 local.get 2 local.get 3 local.get 4
                call $encode)
            (func (export "decode") (param i32 i32 i32 i32 i32) (result i32)
                local.get 0 local.get 1 local.get 2 local.get 3 local.get 4
                call $decode)
            {allocator}
        )
        "#,
        heap = HEAP_BASE,
        allocator = allocator,
    )
}

// ── Sandbox loaders ──

/// Sandbox over the standard guest with a bump allocator.
pub fn load_sandbox() -> Sandbox {
    load_sandbox_with(BUMP_MALLOC)
}

/// Sandbox over the standard guest with a custom allocator.
pub fn load_sandbox_with(allocator: &str) -> Sandbox {
    Sandbox::new(guest_wat(allocator).as_bytes(), SandboxConfig::default())
        .expect("failed to load sandbox")
}

/// Fresh instance of the standard guest.
pub fn guest() -> GuestInstance {
    load_sandbox().instantiate().expect("failed to instantiate guest")
}

// ── Builtin call helpers ──

/// Write `name` as a NUL-terminated string at [`NAME_ADDR`].
pub fn write_name(guest: &mut GuestInstance, name: &str) {
    let mut bytes = name.as_bytes().to_vec();
    bytes.push(0);
    guest.write(NAME_ADDR, &bytes).unwrap();
}

/// Call the hashing builtin over `input`, with an output region of
/// `output_len` bytes at [`OUTPUT_ADDR`].
pub fn call_hash(
    guest: &mut GuestInstance,
    name: &str,
    input: &[u8],
    output_len: u32,
) -> Result<u32, SandboxError> {
    write_name(guest, name);
    guest.write(INPUT_ADDR, input).unwrap();
    guest.call(
        "hash",
        &[NAME_ADDR, INPUT_ADDR, input.len() as u32, OUTPUT_ADDR, output_len],
    )
}

/// Hash `input` and return the digest bytes.
pub fn hash(guest: &mut GuestInstance, name: &str, input: &[u8]) -> Vec<u8> {
    let status = call_hash(guest, name, input, 32).unwrap();
    assert_eq!(status, 0);
    guest.read(OUTPUT_ADDR, 32).unwrap()
}

/// Call `encode` or `decode` over `input`. The out-parameter slots are
/// primed with [`SENTINEL`] first.
pub fn call_codec(
    guest: &mut GuestInstance,
    export: &str,
    name: &str,
    input: &[u8],
) -> Result<u32, SandboxError> {
    write_name(guest, name);
    guest.write(INPUT_ADDR, input).unwrap();
    guest.write(OUT_PTR_ADDR, &SENTINEL.to_le_bytes()).unwrap();
    guest.write(OUT_LEN_ADDR, &SENTINEL.to_le_bytes()).unwrap();
    guest.call(
        export,
        &[NAME_ADDR, INPUT_ADDR, input.len() as u32, OUT_PTR_ADDR, OUT_LEN_ADDR],
    )
}

/// Read the buffer published through the out-parameter slots.
pub fn codec_output(guest: &GuestInstance) -> Vec<u8> {
    let ptr = guest.read_u32(OUT_PTR_ADDR).unwrap();
    let len = guest.read_u32(OUT_LEN_ADDR).unwrap();
    guest.read(ptr, len).unwrap()
}

/// Encode `input` with `name`, asserting success, and return the output.
pub fn encode(guest: &mut GuestInstance, name: &str, input: &[u8]) -> Vec<u8> {
    let status = call_codec(guest, "encode", name, input).unwrap();
    assert_eq!(status, 0);
    codec_output(guest)
}

/// Whether the out-parameter slots still hold [`SENTINEL`].
pub fn out_params_untouched(guest: &GuestInstance) -> bool {
    guest.read_u32(OUT_PTR_ADDR).unwrap() == SENTINEL
        && guest.read_u32(OUT_LEN_ADDR).unwrap() == SENTINEL
}
