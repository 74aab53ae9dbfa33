//! Codec errors.
//!
//! `DecodeError` covers a single inner package. `EnvelopeError` covers the
//! outer wrapper and the registry lookup, and wraps `DecodeError` with the
//! operation and direction it was raised for.

use thiserror::Error;
use xbridge_core::{ChannelId, OperationKind, PackageDirection, ProtocolVersion};

/// An inner package could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended inside a field.
    #[error("truncated input reading {field}: need {needed} bytes, {remaining} left")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// Input continues after the last field.
    #[error("{count} trailing bytes after package")]
    TrailingBytes { count: usize },

    /// The container marker does not belong to the active protocol version.
    #[error("container marker 0x{found:02x} does not match {expected} container")]
    ContainerMismatch {
        expected: ProtocolVersion,
        found: u8,
    },

    /// An integer magnitude carries a leading zero byte.
    #[error("non-canonical integer in {field}")]
    NonCanonicalInteger { field: &'static str },

    /// An integer magnitude is wider than the ledger's integer domain.
    #[error("integer in {field} is {bytes} bytes wide")]
    IntegerTooLarge { field: &'static str, bytes: usize },

    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    /// Status byte is neither success nor failure.
    #[error("invalid status byte {value}")]
    InvalidStatus { value: u8 },

    #[error("invalid presence flag {flag} for {field}")]
    InvalidOptionFlag { field: &'static str, flag: u8 },
}

/// A package could not be encoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A variable-length field does not fit its `u32` length prefix.
    #[error("{field} is {len} bytes, longer than a length prefix can carry")]
    FieldTooLong { field: &'static str, len: usize },

    /// A versioned package was asked to be written into another version's
    /// container.
    #[error("{package} package cannot be written into a {container} container")]
    VersionMismatch {
        package: ProtocolVersion,
        container: ProtocolVersion,
    },
}

/// The outer envelope could not be resolved into a typed package.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("empty envelope")]
    Empty,

    #[error("unknown operation tag {0}")]
    UnknownOperation(u8),

    /// No decoder is registered for this combination.
    #[error("no decoder registered for {operation} {direction} on {channel}")]
    Unregistered {
        channel: ChannelId,
        operation: OperationKind,
        direction: PackageDirection,
    },

    /// The inner package failed to decode.
    #[error("cannot decode {operation} {direction} package: {source}")]
    Package {
        operation: OperationKind,
        direction: PackageDirection,
        #[source]
        source: DecodeError,
    },
}
