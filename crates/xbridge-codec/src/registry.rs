//! # Decoder Registry
//!
//! Explicit `channel → operation → direction → decoder` table for one
//! protocol version. An envelope is only decoded if its combination was
//! registered; anything else is a malformed envelope.
//!
//! FailAck entries point at the Syn decoder because a FailAck returns the
//! original request.

use std::collections::BTreeMap;

use xbridge_core::{ChannelId, OperationKind, PackageDirection, ProtocolVersion, BUCKET_CHANNEL_ID};

use crate::envelope::Envelope;
use crate::error::{DecodeError, EnvelopeError};
use crate::package::{AckPackage, Package, SynPackage};

/// Decoder for one registered combination.
pub type DecodeFn = fn(OperationKind, &[u8], ProtocolVersion) -> Result<Package, DecodeError>;

type Route = (ChannelId, OperationKind, PackageDirection);

/// Registered decoders for a single protocol version.
#[derive(Debug, Clone)]
pub struct DecoderRegistry {
    version: ProtocolVersion,
    decoders: BTreeMap<Route, DecodeFn>,
}

impl DecoderRegistry {
    pub fn empty(version: ProtocolVersion) -> Self {
        Self {
            version,
            decoders: BTreeMap::new(),
        }
    }

    /// Registry with every bucket operation on `channel`.
    pub fn bucket(channel: ChannelId, version: ProtocolVersion) -> Self {
        let mut registry = Self::empty(version);
        for operation in OperationKind::ALL {
            registry.register(channel, operation, PackageDirection::Syn, decode_syn);
            registry.register(channel, operation, PackageDirection::Ack, decode_ack);
            registry.register(channel, operation, PackageDirection::FailAck, decode_fail_ack);
        }
        registry
    }

    /// Registry with every bucket operation on the default bucket channel.
    pub fn bucket_default(version: ProtocolVersion) -> Self {
        Self::bucket(BUCKET_CHANNEL_ID, version)
    }

    pub fn register(
        &mut self,
        channel: ChannelId,
        operation: OperationKind,
        direction: PackageDirection,
        decoder: DecodeFn,
    ) {
        self.decoders.insert((channel, operation, direction), decoder);
    }

    pub fn is_registered(
        &self,
        channel: ChannelId,
        operation: OperationKind,
        direction: PackageDirection,
    ) -> bool {
        self.decoders.contains_key(&(channel, operation, direction))
    }

    /// Decode a raw envelope that arrived on `channel` in `direction`.
    pub fn decode(
        &self,
        channel: ChannelId,
        direction: PackageDirection,
        envelope: &[u8],
    ) -> Result<Package, EnvelopeError> {
        let (operation, inner) = Envelope::split(envelope)?;
        let decoder = self
            .decoders
            .get(&(channel, operation, direction))
            .ok_or(EnvelopeError::Unregistered {
                channel,
                operation,
                direction,
            })?;
        decoder(operation, inner, self.version).map_err(|source| EnvelopeError::Package {
            operation,
            direction,
            source,
        })
    }
}

fn decode_syn(
    operation: OperationKind,
    bytes: &[u8],
    version: ProtocolVersion,
) -> Result<Package, DecodeError> {
    SynPackage::decode(operation, bytes, version).map(Package::Syn)
}

// Acks ignore the registry version and always use the legacy container.
fn decode_ack(
    operation: OperationKind,
    bytes: &[u8],
    _version: ProtocolVersion,
) -> Result<Package, DecodeError> {
    AckPackage::decode(operation, bytes).map(Package::Ack)
}

fn decode_fail_ack(
    operation: OperationKind,
    bytes: &[u8],
    version: ProtocolVersion,
) -> Result<Package, DecodeError> {
    SynPackage::decode(operation, bytes, version).map(Package::FailAck)
}
