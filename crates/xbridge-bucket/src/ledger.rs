//! # Ledger Collaborator
//!
//! The authoritative bucket store is not owned by this crate. Handlers talk
//! to it through [`BucketLedger`], a narrow synchronous interface covering
//! exactly what the bridge needs: lookup and overwrite by id, the create and
//! delete write paths, chain → source type resolution, and an event sink.
//!
//! The trait is object safe and deliberately open, so a node can plug in its
//! own store and tests can plug in stubs. [`InMemoryLedger`](crate::InMemoryLedger)
//! is the deterministic reference implementation.

use serde::Serialize;
use xbridge_core::{Address, BucketId, CanonicalBytes, ChainId, SourceType, Visibility};

use crate::error::LedgerError;
use crate::event::BucketEvent;

/// A bucket record as held by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketInfo {
    pub id: BucketId,
    pub owner: Address,
    pub bucket_name: String,
    pub source_type: SourceType,
    pub visibility: Visibility,
    pub primary_sp_address: Address,
    pub payment_address: Address,
    pub charged_read_quota: u64,
    /// Only set for buckets created from a V2 request.
    pub global_virtual_group_family_id: Option<u32>,
}

/// Storage-provider approval attached to a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub expired_height: u64,
    pub global_virtual_group_family_id: Option<u32>,
    pub sig: Vec<u8>,
}

/// Everything except creator, name and primary SP needed to create a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBucketOptions {
    pub visibility: Visibility,
    pub source_type: SourceType,
    pub charged_read_quota: u64,
    /// Zero means the creator pays.
    pub payment_address: Address,
    pub primary_sp_approval: Approval,
    /// The bytes the approval signature is checked against.
    pub approval_msg_bytes: CanonicalBytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteBucketOptions {
    pub source_type: SourceType,
}

/// Bucket store and runtime services used by the handlers.
pub trait BucketLedger {
    /// Look up a bucket by id.
    fn bucket_by_id(&self, id: &BucketId) -> Option<BucketInfo>;

    /// Overwrite a bucket record. Fails if the record's name belongs to
    /// another bucket.
    fn set_bucket(&mut self, bucket: BucketInfo) -> Result<(), LedgerError>;

    /// Create a bucket and return its newly assigned id.
    fn create_bucket(
        &mut self,
        creator: &Address,
        bucket_name: &str,
        primary_sp_address: &Address,
        options: CreateBucketOptions,
    ) -> Result<BucketId, LedgerError>;

    /// Delete a bucket by name on behalf of `operator`.
    fn delete_bucket(
        &mut self,
        operator: &Address,
        bucket_name: &str,
        options: DeleteBucketOptions,
    ) -> Result<(), LedgerError>;

    /// Source type stamped on buckets created or mirrored through `chain_id`.
    fn source_type_for_chain(&self, chain_id: ChainId) -> Result<SourceType, LedgerError>;

    /// Record an event. A rejected event fails the handler.
    fn emit_event(&mut self, event: BucketEvent) -> Result<(), LedgerError>;
}
