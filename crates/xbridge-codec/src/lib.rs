//! # xbridge-codec — Bucket Bridge Wire Codec
//!
//! Pure, deterministic encoding and decoding of bucket bridge packages.
//!
//! - [`wire`]: primitive readers and writers.
//! - [`package`]: typed Syn/Ack packages and their V1/V2 layouts.
//! - [`envelope`]: the `[operation tag][inner]` wrapper.
//! - [`registry`]: the explicit per-version decoder table.
//!
//! The protocol version is always an argument. Nothing in this crate reads
//! global state, so both sides of the upgrade boundary can be exercised in
//! the same process.

pub mod envelope;
pub mod error;
pub mod package;
pub mod registry;
pub mod wire;

pub use envelope::Envelope;
pub use error::{DecodeError, EncodeError, EnvelopeError};
pub use package::{
    AckPackage, CreateBucketAck, CreateBucketSyn, CreateBucketSynV1, CreateBucketSynV2,
    DeleteBucketAck, DeleteBucketSyn, MirrorBucketAck, MirrorBucketSyn, Package, SynPackage,
    WireFormat,
};
pub use registry::{DecodeFn, DecoderRegistry};
