//! Hash function family.
//!
//! Guests select an algorithm by name. The set of names is closed; adding an
//! algorithm means adding a variant here, the call contract stays the same.

use std::str::FromStr;

use sha2::Digest;

use crate::error::HostError;

/// A hash algorithm callable through the hashing builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
}

impl HashAlgorithm {
    /// Every registered algorithm.
    pub const ALL: &'static [HashAlgorithm] = &[HashAlgorithm::Sha256];

    /// Name the guest uses to select this algorithm.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }

    /// Fixed digest length in bytes.
    pub fn digest_size(self) -> usize {
        match self {
            Self::Sha256 => 32,
        }
    }

    /// Compute the digest of `input` in one pass.
    pub fn digest(self, input: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => sha2::Sha256::digest(input).to_vec(),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = HostError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.name() == name)
            .ok_or_else(|| HostError::UnknownHash(name.to_string()))
    }
}
