//! # Error Types
//!
//! Two classes with different consequences:
//!
//! - [`ProtocolViolation`] is fatal. The envelope or package could not be
//!   understood, and the caller must abort the enclosing unit of work.
//!   It is returned as the `Err` arm of every router entry point.
//!
//! - [`BucketAppError`] is recoverable. It travels inside
//!   [`ExecuteResult`](crate::ExecuteResult) next to the reply payload and
//!   never reaches the wire; the peer chain only sees the Ack status.

use thiserror::Error;
use xbridge_codec::{DecodeError, EncodeError, EnvelopeError};
use xbridge_core::{
    Address, BucketId, CanonicalizationError, ChainId, OperationKind, PackageDirection, SourceType,
};

/// A package failed `ValidateBasic`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("creator address is zero")]
    ZeroCreator,

    #[error("primary storage provider address is zero")]
    ZeroPrimarySp,

    #[error("operator address is zero")]
    ZeroOperator,

    /// The bucket name breaks a naming rule.
    #[error("invalid bucket name {name:?}: {reason}")]
    InvalidBucketName { name: String, reason: &'static str },

    /// Visibility is unknown or unspecified.
    #[error("invalid visibility {0}")]
    InvalidVisibility(u32),

    #[error("primary storage provider approval signature is empty")]
    EmptyApprovalSignature,
}

/// Failure reported by the ledger collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("bucket {name:?} already exists")]
    BucketAlreadyExists { name: String },

    #[error("bucket {name:?} not found")]
    BucketNotFound { name: String },

    /// Only the owner may delete a bucket.
    #[error("{operator} is not the owner of bucket {name:?}")]
    NotOwner { operator: Address, name: String },

    /// A cross-chain delete came through a chain that does not own the
    /// bucket.
    #[error("bucket source type is {actual}, request came as {requested}")]
    SourceTypeMismatch {
        actual: SourceType,
        requested: SourceType,
    },

    #[error("no source type registered for {0}")]
    UnknownChain(ChainId),

    /// The ledger ran out of bucket ids.
    #[error("bucket id space exhausted")]
    IdsExhausted,

    #[error("event rejected: {0}")]
    Event(String),
}

/// Recoverable handler error, reported alongside the reply.
#[derive(Error, Debug)]
pub enum BucketAppError {
    #[error("no such bucket: {id}")]
    NoSuchBucket { id: BucketId },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The approval message could not be canonicalized.
    #[error("approval message: {0}")]
    Approval(#[from] CanonicalizationError),
}

/// Fatal error: the current invocation must be aborted.
#[derive(Error, Debug)]
pub enum ProtocolViolation {
    /// Empty envelope, unknown operation tag, or unregistered combination.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(EnvelopeError),

    /// The inner package could not be decoded.
    #[error("cannot decode {operation} {direction} package: {source}")]
    Decode {
        operation: OperationKind,
        direction: PackageDirection,
        #[source]
        source: DecodeError,
    },

    /// The decoder produced a package of another direction.
    #[error("unexpected {operation} package for {expected} entry point")]
    UnexpectedPackage {
        operation: OperationKind,
        expected: PackageDirection,
    },

    /// A reply package could not be encoded.
    #[error("cannot encode {operation} reply: {source}")]
    Encode {
        operation: OperationKind,
        #[source]
        source: EncodeError,
    },
}

impl From<EnvelopeError> for ProtocolViolation {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Package {
                operation,
                direction,
                source,
            } => Self::Decode {
                operation,
                direction,
                source,
            },
            other => Self::MalformedEnvelope(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_errors_become_decode_violations() {
        let err = ProtocolViolation::from(EnvelopeError::Package {
            operation: OperationKind::Mirror,
            direction: PackageDirection::Ack,
            source: DecodeError::InvalidStatus { value: 9 },
        });
        assert!(matches!(
            err,
            ProtocolViolation::Decode {
                operation: OperationKind::Mirror,
                ..
            }
        ));
    }

    #[test]
    fn other_envelope_errors_are_malformed() {
        let err = ProtocolViolation::from(EnvelopeError::UnknownOperation(7));
        assert!(matches!(
            err,
            ProtocolViolation::MalformedEnvelope(EnvelopeError::UnknownOperation(7))
        ));
        assert_eq!(err.to_string(), "malformed envelope: unknown operation tag 7");
    }
}
