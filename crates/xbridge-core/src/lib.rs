//! # xbridge-core — Foundational Types for the Bucket Bridge
//!
//! Every other crate in the workspace depends on `xbridge-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `BucketId`, `Address`, `ChainId`
//!    and `ChannelId` cannot be confused with one another or with bare
//!    integers.
//!
//! 2. **Lossless bucket ids.** `BucketId` is arbitrary precision, bounded at
//!    256 bits, and only ever converted through its minimal big-endian form.
//!
//! 3. **Closed protocol vocabulary.** Operations, directions, statuses,
//!    source types and protocol versions are exhaustive enums with explicit
//!    wire discriminants.
//!
//! 4. **`CanonicalBytes` for signed messages.** Approval messages handed to
//!    the ledger are built through RFC 8785 canonicalization only.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `xbridge-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod domain;
pub mod error;
pub mod identity;

pub use canonical::CanonicalBytes;
pub use config::{BridgeConfig, ChainRegistry, ChainRoute, ConfigError, UpgradeSchedule};
pub use domain::{
    AckStatus, OperationKind, PackageDirection, ProtocolVersion, SourceType, Visibility,
};
pub use error::{CanonicalizationError, PrimitiveError};
pub use identity::{
    Address, BucketId, ChainId, ChannelId, ADDRESS_LENGTH, BUCKET_CHANNEL_ID, MAX_BUCKET_ID_BYTES,
};
