//! # Error Types
//!
//! Errors raised while constructing domain primitives or canonical bytes.
//! Codec, handler and configuration errors live next to the code that
//! raises them and wrap these where needed.

use thiserror::Error;

/// A primitive value could not be constructed or parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Address text or bytes are not a 20-byte address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Bucket id text is not a non-negative decimal integer.
    #[error("invalid bucket id: {0:?}")]
    InvalidBucketId(String),

    /// Bucket id magnitude exceeds the ledger's integer width.
    #[error("bucket id is {bytes} bytes wide, maximum is {max}")]
    BucketIdTooLarge {
        /// Significant bytes in the rejected value.
        bytes: usize,
        /// Maximum accepted width.
        max: usize,
    },

    /// Text does not name a variant of a closed enumeration.
    #[error("unknown {kind}: {value:?}")]
    UnknownVariant {
        /// Which enumeration was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Floats have ambiguous canonical forms and are never signed.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
