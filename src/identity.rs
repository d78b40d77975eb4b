//! Account identities for owners, callers and transfer targets.
//!
//! An identity is 20 opaque bytes supplied by the hosting environment. The
//! gate never verifies signatures; it only compares identities.
//!
//! # Text form
//!
//! `0x`-prefixed lowercase hex (40 digits). Parsing accepts the prefix as
//! optional and either case.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identity length in bytes.
pub const IDENTITY_LEN: usize = 20;

/// A 20-byte account identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity([u8; IDENTITY_LEN]);

/// Errors parsing an identity from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityParseError {
    #[error("Invalid identity hex: {0}")]
    InvalidHex(String),

    #[error("Invalid identity length: expected {expected} bytes, got {0}", expected = IDENTITY_LEN)]
    InvalidLength(usize),
}

impl Identity {
    /// The null identity. Never a valid owner.
    pub const ZERO: Identity = Identity([0u8; IDENTITY_LEN]);

    /// Create from raw bytes.
    pub const fn new(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice, rejecting anything but 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentityParseError> {
        let arr: [u8; IDENTITY_LEN] = bytes
            .try_into()
            .map_err(|_| IdentityParseError::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Derive a deterministic identity from a human label.
    ///
    /// Takes the first 20 bytes of SHA-256 over the label. Handy for fixtures
    /// and sample configs where readable names beat raw hex.
    pub fn from_label(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"approval-gate-identity-v1");
        hasher.update(label.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; IDENTITY_LEN];
        bytes.copy_from_slice(&digest[..IDENTITY_LEN]);
        Self(bytes)
    }

    /// Get bytes.
    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    /// True for the null identity.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; IDENTITY_LEN]
    }

    /// First four bytes as hex, for compact log and display output.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self)
    }
}

impl FromStr for Identity {
    type Err = IdentityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes =
            hex::decode(digits).map_err(|e| IdentityParseError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl From<[u8; IDENTITY_LEN]> for Identity {
    fn from(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }
}
