//! Determinism tests: verify that identical inputs always produce identical
//! outputs, across calls, instances, and sandboxes.
//!
//! Builtin outputs can feed replicated execution: every node must compute
//! the same bytes for the same guest call.

mod common;

use common::*;

// ── Test: repeated hashing in one instance ──

#[test]
fn test_hash_repeated_identical_output() {
    let mut guest = guest();
    let input = b"deterministic builtin";

    let first = hash(&mut guest, "sha256", input);
    for run in 1..5 {
        let digest = hash(&mut guest, "sha256", input);
        assert_eq!(first, digest, "run {} digest mismatch", run);
        assert_eq!(digest.len(), 32);
    }
}

// ── Test: fresh instances and sandboxes agree ──

#[test]
fn test_hash_identical_across_sandboxes() {
    let input = b"cross-instance";
    let digests: Vec<Vec<u8>> = (0..3)
        .map(|_| {
            let mut guest = load_sandbox().instantiate().unwrap();
            hash(&mut guest, "sha256", input)
        })
        .collect();
    assert!(digests.windows(2).all(|w| w[0] == w[1]));
}

// ── Test: codec output independent of allocation address ──

#[test]
fn test_encode_independent_of_heap_position() {
    let mut guest = guest();
    let a = encode(&mut guest, "hex", b"same input");
    // Shift the bump pointer with an unrelated allocation.
    encode(&mut guest, "hex", &[0u8; 100]);
    let b = encode(&mut guest, "hex", b"same input");
    assert_eq!(a, b);
}

// ── Test: status codes are stable ──

#[test]
fn test_malformed_status_stable() {
    let mut guest = guest();
    for _ in 0..5 {
        assert_eq!(call_codec(&mut guest, "decode", "hex", b"xyz").unwrap(), 1);
    }
}
