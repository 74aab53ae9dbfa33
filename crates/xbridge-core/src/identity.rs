//! # Identity Primitives
//!
//! Newtype wrappers for every identifier that crosses the bridge. These keep
//! a bucket id from being passed where a chain id is expected, and they own
//! the exact textual and byte forms used on the wire and in logs.
//!
//! ## Precision Invariant
//!
//! `BucketId` is the cross-chain correlation key. It is backed by an
//! arbitrary-precision unsigned integer and is only ever converted to and
//! from its minimal big-endian magnitude, so a value survives any number of
//! encode/decode cycles without truncation. The magnitude is bounded by
//! [`MAX_BUCKET_ID_BYTES`], the width of the ledger's unsigned integer.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PrimitiveError;

/// Maximum byte length of a bucket id magnitude (256-bit).
pub const MAX_BUCKET_ID_BYTES: usize = 32;

/// Byte length of an account address.
pub const ADDRESS_LENGTH: usize = 20;

// ─── BucketId ────────────────────────────────────────────────────────

/// Ledger-assigned bucket identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketId(BigUint);

impl BucketId {
    /// Build an id from a big-endian magnitude. Leading zero bytes are
    /// accepted here and dropped; the wire decoder is stricter.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, PrimitiveError> {
        Self::from_biguint(BigUint::from_bytes_be(bytes))
    }

    /// Build an id from an arbitrary-precision integer.
    pub fn from_biguint(value: BigUint) -> Result<Self, PrimitiveError> {
        let width = significant_bytes(&value);
        if width > MAX_BUCKET_ID_BYTES {
            return Err(PrimitiveError::BucketIdTooLarge {
                bytes: width,
                max: MAX_BUCKET_ID_BYTES,
            });
        }
        Ok(Self(value))
    }

    /// Minimal big-endian magnitude. Zero is the empty slice.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        if self.is_zero() {
            Vec::new()
        } else {
            self.0.to_bytes_be()
        }
    }

    /// Whether this id is zero. The ledger never assigns id zero.
    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::default()
    }
}

fn significant_bytes(value: &BigUint) -> usize {
    (value.bits() as usize + 7) / 8
}

impl From<u64> for BucketId {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BucketId {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PrimitiveError::InvalidBucketId(s.to_string()));
        }
        let value = trimmed
            .parse::<BigUint>()
            .map_err(|_| PrimitiveError::InvalidBucketId(s.to_string()))?;
        Self::from_biguint(value)
    }
}

// Decimal strings keep ids above 2^53 intact in JSON consumers.
impl Serialize for BucketId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BucketId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Address ─────────────────────────────────────────────────────────

/// A 20-byte account address (creator, operator, storage provider, payer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address, used on the wire for "not set".
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build an address from a slice that must be exactly 20 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PrimitiveError> {
        let raw: [u8; ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| PrimitiveError::InvalidAddress(hex::encode(bytes)))?;
        Ok(Self(raw))
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes =
            hex::decode(digits).map_err(|_| PrimitiveError::InvalidAddress(s.to_string()))?;
        Self::from_slice(&bytes).map_err(|_| PrimitiveError::InvalidAddress(s.to_string()))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Chain and channel identifiers ───────────────────────────────────

/// Identifier of a peer chain on the cross-chain bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u16);

/// Numbered channel on the cross-chain bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u8);

/// The channel bucket lifecycle packages travel on.
pub const BUCKET_CHANNEL_ID: ChannelId = ChannelId(4);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain:{}", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel:{}", self.0)
    }
}
