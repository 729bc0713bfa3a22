//! Codec function family.
//!
//! Encoding is total: every byte sequence has an encoding. Decoding is
//! partial and reports malformed input as a [`CodecError`], which builtins
//! surface to the guest as a status code instead of a trap.

use std::str::FromStr;

use crate::error::{CodecError, HostError};

/// A codec callable through the encode/decode builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Lowercase hexadecimal. Decoding accepts either case.
    Hex,
}

impl Codec {
    /// Every registered codec.
    pub const ALL: &'static [Codec] = &[Codec::Hex];

    /// Name the guest uses to select this codec.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
        }
    }

    pub fn encode(self, input: &[u8]) -> Vec<u8> {
        match self {
            Self::Hex => hex::encode(input).into_bytes(),
        }
    }

    pub fn decode(self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Hex => Ok(hex::decode(input)?),
        }
    }
}

impl FromStr for Codec {
    type Err = HostError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|codec| codec.name() == name)
            .ok_or_else(|| HostError::UnknownCodec(name.to_string()))
    }
}
