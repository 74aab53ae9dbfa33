//! # Dispatch Router
//!
//! The three entry points the transport calls, one per package direction.
//! Each one decodes the envelope, matches the typed package to exactly one
//! handler, and wraps any reply back into an envelope.
//!
//! ## Version selection
//!
//! Syn and FailAck packages are decoded with the registry of the protocol
//! version in [`AppContext`]. Ack packages always use the V1 registry.
//!
//! ## Failure classes
//!
//! Anything that prevents understanding the package is a
//! [`ProtocolViolation`] and is returned as `Err`; the caller must abort the
//! enclosing unit of work. Business failures come back as
//! `Ok(ExecuteResult)` with `error` set.

use xbridge_codec::{AckPackage, DecoderRegistry, Envelope, Package, SynPackage};
use xbridge_core::{
    ChainId, ChannelId, OperationKind, PackageDirection, ProtocolVersion, BUCKET_CHANNEL_ID,
};

use crate::create::{handle_create_ack, handle_create_fail_ack, handle_create_syn};
use crate::delete::{handle_delete_ack, handle_delete_fail_ack, handle_delete_syn};
use crate::error::{BucketAppError, ProtocolViolation};
use crate::ledger::BucketLedger;
use crate::mirror::{handle_mirror_ack, handle_mirror_fail_ack, handle_mirror_syn};
use crate::outcome::HandlerResult;

/// Per-invocation context supplied by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppContext {
    /// The peer chain the package came from.
    pub src_chain_id: ChainId,
    /// Protocol version active at the executing height.
    pub protocol: ProtocolVersion,
}

impl AppContext {
    pub fn new(src_chain_id: ChainId, protocol: ProtocolVersion) -> Self {
        Self {
            src_chain_id,
            protocol,
        }
    }
}

/// Result of one entry point call.
#[derive(Debug, Default)]
pub struct ExecuteResult {
    /// Reply envelope. Empty when there is nothing to send back.
    pub payload: Vec<u8>,
    /// Recoverable error, logged locally and never put on the wire.
    pub error: Option<BucketAppError>,
}

impl ExecuteResult {
    pub fn has_reply(&self) -> bool {
        !self.payload.is_empty()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The bucket cross-chain application.
#[derive(Debug, Clone)]
pub struct BucketApp {
    channel: ChannelId,
    v1: DecoderRegistry,
    v2: DecoderRegistry,
}

impl Default for BucketApp {
    fn default() -> Self {
        Self::new(BUCKET_CHANNEL_ID)
    }
}

impl BucketApp {
    /// Application listening on `channel`.
    pub fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            v1: DecoderRegistry::bucket(channel, ProtocolVersion::V1),
            v2: DecoderRegistry::bucket(channel, ProtocolVersion::V2),
        }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Execute a request package.
    pub fn handle_syn<L: BucketLedger + ?Sized>(
        &self,
        ctx: &AppContext,
        ledger: &mut L,
        payload: &[u8],
    ) -> Result<ExecuteResult, ProtocolViolation> {
        let direction = PackageDirection::Syn;
        let syn = match self.decode(direction, ctx.protocol, payload)? {
            Package::Syn(syn) => syn,
            other => return Err(unexpected(direction, &other)),
        };
        let operation = syn.operation();
        let outcome = match &syn {
            SynPackage::Mirror(p) => handle_mirror_syn(ctx, p),
            SynPackage::Create(p) => handle_create_syn(ctx, ledger, p),
            SynPackage::Delete(p) => handle_delete_syn(ctx, ledger, p),
        };
        finish(operation, outcome)
    }

    /// Reconcile an acknowledgement of a request this chain sent.
    pub fn handle_ack<L: BucketLedger + ?Sized>(
        &self,
        ctx: &AppContext,
        ledger: &mut L,
        payload: &[u8],
    ) -> Result<ExecuteResult, ProtocolViolation> {
        let direction = PackageDirection::Ack;
        let ack = match self.decode(direction, ProtocolVersion::V1, payload)? {
            Package::Ack(ack) => ack,
            other => return Err(unexpected(direction, &other)),
        };
        let operation = ack.operation();
        let outcome = match &ack {
            AckPackage::Mirror(p) => handle_mirror_ack(ctx, ledger, p),
            AckPackage::Create(p) => handle_create_ack(p),
            AckPackage::Delete(p) => handle_delete_ack(p),
        };
        finish(operation, outcome)
    }

    /// Roll back a request this chain sent that failed on the peer.
    pub fn handle_fail_ack<L: BucketLedger + ?Sized>(
        &self,
        ctx: &AppContext,
        ledger: &mut L,
        payload: &[u8],
    ) -> Result<ExecuteResult, ProtocolViolation> {
        let direction = PackageDirection::FailAck;
        let syn = match self.decode(direction, ctx.protocol, payload)? {
            Package::FailAck(syn) => syn,
            other => return Err(unexpected(direction, &other)),
        };
        let operation = syn.operation();
        let outcome = match &syn {
            SynPackage::Mirror(p) => handle_mirror_fail_ack(ctx, ledger, p),
            SynPackage::Create(p) => handle_create_fail_ack(p),
            SynPackage::Delete(p) => handle_delete_fail_ack(p),
        };
        finish(operation, outcome)
    }

    /// Entry point selected by direction.
    pub fn handle<L: BucketLedger + ?Sized>(
        &self,
        direction: PackageDirection,
        ctx: &AppContext,
        ledger: &mut L,
        payload: &[u8],
    ) -> Result<ExecuteResult, ProtocolViolation> {
        match direction {
            PackageDirection::Syn => self.handle_syn(ctx, ledger, payload),
            PackageDirection::Ack => self.handle_ack(ctx, ledger, payload),
            PackageDirection::FailAck => self.handle_fail_ack(ctx, ledger, payload),
        }
    }

    fn registry(&self, version: ProtocolVersion) -> &DecoderRegistry {
        match version {
            ProtocolVersion::V1 => &self.v1,
            ProtocolVersion::V2 => &self.v2,
        }
    }

    fn decode(
        &self,
        direction: PackageDirection,
        version: ProtocolVersion,
        payload: &[u8],
    ) -> Result<Package, ProtocolViolation> {
        self.registry(version)
            .decode(self.channel, direction, payload)
            .map_err(|e| {
                tracing::error!(
                    payload = %hex::encode(payload),
                    %direction,
                    %version,
                    error = %e,
                    "deserialize bucket cross chain package error"
                );
                ProtocolViolation::from(e)
            })
    }
}

fn unexpected(expected: PackageDirection, package: &Package) -> ProtocolViolation {
    tracing::error!(
        %expected,
        operation = %package.operation(),
        "unknown cross chain package type"
    );
    ProtocolViolation::UnexpectedPackage {
        operation: package.operation(),
        expected,
    }
}

fn finish(
    operation: OperationKind,
    outcome: HandlerResult,
) -> Result<ExecuteResult, ProtocolViolation> {
    let payload = match outcome.reply {
        Some(ack) => {
            let inner = ack
                .encode()
                .map_err(|source| ProtocolViolation::Encode { operation, source })?;
            Envelope::new(operation, inner).encode()
        }
        None => Vec::new(),
    };
    Ok(ExecuteResult {
        payload,
        error: outcome.error,
    })
}
