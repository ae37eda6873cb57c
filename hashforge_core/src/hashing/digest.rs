//! Owned digest output

use crate::error::{Result, ValidationError};
use crate::formatting::DigestFormatter;
use crate::security::SecureBuffer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A finished digest, copied out of the engine
///
/// The bytes live in a [`SecureBuffer`], so a dropped digest leaves no copy
/// behind. Comparison against another digest is constant-time.
#[derive(Clone, PartialEq, Eq)]
pub struct Digest {
    bytes: SecureBuffer,
}

impl Digest {
    /// Copy raw digest bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: SecureBuffer::copy_from(bytes),
        }
    }

    /// Parse a hex string (either case)
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| ValidationError::malformed_digest(text, e))?;
        Ok(Self {
            bytes: SecureBuffer::from_bytes(bytes),
        })
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Encode with the given formatter
    pub fn encode(&self, formatter: &dyn DigestFormatter) -> Vec<u8> {
        formatter.encode(self.as_bytes())
    }

    /// Constant-time comparison against raw bytes
    pub fn ct_eq(&self, other: &[u8]) -> bool {
        self.bytes.constant_time_eq(other)
    }

    /// Compare against a hex string without early exit on mismatch
    pub fn matches_hex(&self, expected: &str) -> bool {
        match hex::decode(expected.trim()) {
            Ok(bytes) => self.ct_eq(&bytes),
            Err(_) => false,
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Digest::from_hex(&text).map_err(serde::de::Error::custom)
    }
}
