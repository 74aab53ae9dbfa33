//! # In-Memory Ledger
//!
//! Deterministic [`BucketLedger`] backed by ordered maps. Used by tests and
//! by the CLI replay command.
//!
//! ## Rules
//!
//! - Ids are assigned sequentially, starting at 1 unless configured otherwise.
//! - Bucket names are unique, including across `set_bucket` overwrites.
//! - Only the owner may delete a bucket, and only through the chain that
//!   owns it (the requested source type must match the stored one).
//! - Events are kept in emission order.
//!
//! Nothing here depends on wall-clock time, randomness or hash-map order.

use std::collections::BTreeMap;

use xbridge_core::{Address, BucketId, ChainId, ChainRegistry, SourceType};

use crate::error::LedgerError;
use crate::event::BucketEvent;
use crate::ledger::{BucketInfo, BucketLedger, CreateBucketOptions, DeleteBucketOptions};

#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    chains: ChainRegistry,
    buckets: BTreeMap<BucketId, BucketInfo>,
    names: BTreeMap<String, BucketId>,
    next_id: u64,
    ids_exhausted: bool,
    events: Vec<BucketEvent>,
}

impl InMemoryLedger {
    pub fn new(chains: ChainRegistry) -> Self {
        Self {
            chains,
            next_id: 1,
            ..Self::default()
        }
    }

    /// Start id assignment at `next_id`.
    pub fn with_next_id(mut self, next_id: u64) -> Self {
        self.next_id = next_id;
        self.ids_exhausted = false;
        self
    }

    /// Seed an existing bucket, bypassing the create path. Replaces any
    /// bucket with the same id; a name held by a different id is rejected.
    pub fn insert_bucket(&mut self, bucket: BucketInfo) -> Result<(), LedgerError> {
        if let Some(holder) = self.names.get(&bucket.bucket_name) {
            if *holder != bucket.id {
                return Err(LedgerError::BucketAlreadyExists {
                    name: bucket.bucket_name,
                });
            }
        }
        if let Some(previous) = self.buckets.get(&bucket.id) {
            self.names.remove(&previous.bucket_name);
        }
        self.names.insert(bucket.bucket_name.clone(), bucket.id.clone());
        self.buckets.insert(bucket.id.clone(), bucket);
        Ok(())
    }

    pub fn bucket_by_name(&self, name: &str) -> Option<&BucketInfo> {
        self.names.get(name).and_then(|id| self.buckets.get(id))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Events in emission order.
    pub fn events(&self) -> &[BucketEvent] {
        &self.events
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<BucketEvent> {
        std::mem::take(&mut self.events)
    }

    fn allocate_id(&mut self) -> Result<BucketId, LedgerError> {
        if self.ids_exhausted {
            return Err(LedgerError::IdsExhausted);
        }
        let id = self.next_id;
        match id.checked_add(1) {
            Some(next) => self.next_id = next,
            None => self.ids_exhausted = true,
        }
        Ok(BucketId::from(id))
    }
}

impl BucketLedger for InMemoryLedger {
    fn bucket_by_id(&self, id: &BucketId) -> Option<BucketInfo> {
        self.buckets.get(id).cloned()
    }

    fn set_bucket(&mut self, bucket: BucketInfo) -> Result<(), LedgerError> {
        self.insert_bucket(bucket)
    }

    fn create_bucket(
        &mut self,
        creator: &Address,
        bucket_name: &str,
        primary_sp_address: &Address,
        options: CreateBucketOptions,
    ) -> Result<BucketId, LedgerError> {
        if self.names.contains_key(bucket_name) {
            return Err(LedgerError::BucketAlreadyExists {
                name: bucket_name.to_string(),
            });
        }
        let id = self.allocate_id()?;
        let payment_address = if options.payment_address.is_zero() {
            *creator
        } else {
            options.payment_address
        };
        let bucket = BucketInfo {
            id: id.clone(),
            owner: *creator,
            bucket_name: bucket_name.to_string(),
            source_type: options.source_type,
            visibility: options.visibility,
            primary_sp_address: *primary_sp_address,
            payment_address,
            charged_read_quota: options.charged_read_quota,
            global_virtual_group_family_id: options
                .primary_sp_approval
                .global_virtual_group_family_id,
        };
        self.insert_bucket(bucket)?;
        self.events.push(BucketEvent::CreateBucket {
            bucket_id: id.clone(),
            bucket_name: bucket_name.to_string(),
            owner: *creator,
            source_type: options.source_type,
        });
        Ok(id)
    }

    fn delete_bucket(
        &mut self,
        operator: &Address,
        bucket_name: &str,
        options: DeleteBucketOptions,
    ) -> Result<(), LedgerError> {
        let bucket = self
            .bucket_by_name(bucket_name)
            .ok_or_else(|| LedgerError::BucketNotFound {
                name: bucket_name.to_string(),
            })?;
        if bucket.owner != *operator {
            return Err(LedgerError::NotOwner {
                operator: *operator,
                name: bucket_name.to_string(),
            });
        }
        if bucket.source_type != options.source_type {
            return Err(LedgerError::SourceTypeMismatch {
                actual: bucket.source_type,
                requested: options.source_type,
            });
        }
        let id = bucket.id.clone();
        self.buckets.remove(&id);
        self.names.remove(bucket_name);
        self.events.push(BucketEvent::DeleteBucket {
            bucket_id: id,
            bucket_name: bucket_name.to_string(),
            operator: *operator,
        });
        Ok(())
    }

    fn source_type_for_chain(&self, chain_id: ChainId) -> Result<SourceType, LedgerError> {
        self.chains
            .source_type(chain_id)
            .ok_or(LedgerError::UnknownChain(chain_id))
    }

    fn emit_event(&mut self, event: BucketEvent) -> Result<(), LedgerError> {
        self.events.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Approval;
    use xbridge_core::{BridgeConfig, CanonicalBytes, Visibility};

    fn ledger() -> InMemoryLedger {
        InMemoryLedger::new(BridgeConfig::default().chain_registry().unwrap())
    }

    fn addr(b: u8) -> Address {
        Address::new([b; 20])
    }

    fn options(source_type: SourceType) -> CreateBucketOptions {
        CreateBucketOptions {
            visibility: Visibility::Private,
            source_type,
            charged_read_quota: 0,
            payment_address: Address::ZERO,
            primary_sp_approval: Approval {
                expired_height: 10,
                global_virtual_group_family_id: None,
                sig: vec![1],
            },
            approval_msg_bytes: CanonicalBytes::new(&serde_json::json!({})).unwrap(),
        }
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let mut l = ledger();
        let a = l
            .create_bucket(&addr(1), "aaa", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();
        let b = l
            .create_bucket(&addr(1), "bbb", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();
        assert_eq!(a, BucketId::from(1u64));
        assert_eq!(b, BucketId::from(2u64));
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn next_id_is_configurable() {
        let mut l = ledger().with_next_id(7);
        let id = l
            .create_bucket(&addr(1), "alpha", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();
        assert_eq!(id, BucketId::from(7u64));
    }

    #[test]
    fn zero_payment_address_means_creator_pays() {
        let mut l = ledger();
        let id = l
            .create_bucket(&addr(1), "alpha", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();
        assert_eq!(l.bucket_by_id(&id).unwrap().payment_address, addr(1));
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut l = ledger();
        l.create_bucket(&addr(1), "alpha", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();
        let err = l
            .create_bucket(&addr(2), "alpha", &addr(9), options(SourceType::BscCrossChain))
            .unwrap_err();
        assert!(matches!(err, LedgerError::BucketAlreadyExists { .. }));
        assert_eq!(l.events().len(), 1);
    }

    fn via(source_type: SourceType) -> DeleteBucketOptions {
        DeleteBucketOptions { source_type }
    }

    #[test]
    fn delete_requires_owner_and_matching_source() {
        let mut l = ledger();
        l.create_bucket(&addr(1), "alpha", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();

        let err = l
            .delete_bucket(&addr(2), "alpha", via(SourceType::BscCrossChain))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotOwner { .. }));

        let err = l
            .delete_bucket(&addr(1), "alpha", via(SourceType::OpCrossChain))
            .unwrap_err();
        assert!(matches!(err, LedgerError::SourceTypeMismatch { .. }));

        l.delete_bucket(&addr(1), "alpha", via(SourceType::BscCrossChain))
            .unwrap();
        assert!(l.is_empty());
        assert!(l.bucket_by_name("alpha").is_none());
    }

    #[test]
    fn delete_unknown_name() {
        let mut l = ledger();
        let err = l
            .delete_bucket(&addr(1), "ghost", via(SourceType::Origin))
            .unwrap_err();
        assert!(matches!(err, LedgerError::BucketNotFound { .. }));
    }

    #[test]
    fn chain_resolution_uses_registry() {
        let l = ledger();
        assert_eq!(l.source_type_for_chain(ChainId(56)), Ok(SourceType::BscCrossChain));
        assert_eq!(
            l.source_type_for_chain(ChainId(99)),
            Err(LedgerError::UnknownChain(ChainId(99)))
        );
    }

    #[test]
    fn set_bucket_renames_cleanly() {
        let mut l = ledger();
        let id = l
            .create_bucket(&addr(1), "alpha", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();
        let mut info = l.bucket_by_id(&id).unwrap();
        info.bucket_name = "beta".into();
        l.set_bucket(info).unwrap();
        assert!(l.bucket_by_name("alpha").is_none());
        assert_eq!(l.bucket_by_name("beta").unwrap().id, id);
    }

    #[test]
    fn set_bucket_rejects_name_held_by_other_id() {
        let mut l = ledger();
        let alpha = l
            .create_bucket(&addr(1), "alpha", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();
        let beta = l
            .create_bucket(&addr(1), "beta", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();

        let mut info = l.bucket_by_id(&beta).unwrap();
        info.bucket_name = "alpha".into();
        let err = l.set_bucket(info).unwrap_err();
        assert_eq!(
            err,
            LedgerError::BucketAlreadyExists {
                name: "alpha".into()
            }
        );
        assert_eq!(l.bucket_by_name("alpha").unwrap().id, alpha);
        assert_eq!(l.bucket_by_name("beta").unwrap().id, beta);
    }

    #[test]
    fn last_id_in_range_is_assigned_once() {
        let mut l = ledger().with_next_id(u64::MAX);
        let id = l
            .create_bucket(&addr(1), "alpha", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();
        assert_eq!(id, BucketId::from(u64::MAX));

        let err = l
            .create_bucket(&addr(1), "beta", &addr(9), options(SourceType::BscCrossChain))
            .unwrap_err();
        assert_eq!(err, LedgerError::IdsExhausted);
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn take_events_drains() {
        let mut l = ledger();
        l.create_bucket(&addr(1), "alpha", &addr(9), options(SourceType::BscCrossChain))
            .unwrap();
        assert_eq!(l.take_events().len(), 1);
        assert!(l.events().is_empty());
    }
}
