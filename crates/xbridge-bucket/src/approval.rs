//! Approval message bytes for create requests.
//!
//! The storage provider signs the create request minus its own signature.
//! The ledger checks the signature against these bytes, so every node must
//! produce them identically: they go through [`CanonicalBytes`] only.

use serde::Serialize;
use xbridge_codec::CreateBucketSyn;
use xbridge_core::{Address, CanonicalBytes, CanonicalizationError};

#[derive(Serialize)]
struct ApprovalMessage<'a> {
    creator: &'a Address,
    bucket_name: &'a str,
    visibility: u32,
    payment_address: &'a Address,
    primary_sp_address: &'a Address,
    primary_sp_approval: ApprovalTerms,
    charged_read_quota: u64,
}

#[derive(Serialize)]
struct ApprovalTerms {
    expired_height: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    global_virtual_group_family_id: Option<u32>,
}

/// Canonical bytes the primary SP approval signature covers.
pub fn approval_message_bytes(
    syn: &CreateBucketSyn,
) -> Result<CanonicalBytes, CanonicalizationError> {
    let base = syn.base();
    CanonicalBytes::new(&ApprovalMessage {
        creator: &base.creator,
        bucket_name: &base.bucket_name,
        visibility: base.visibility,
        payment_address: &base.payment_address,
        primary_sp_address: &base.primary_sp_address,
        primary_sp_approval: ApprovalTerms {
            expired_height: base.primary_sp_approval_expired_height,
            global_virtual_group_family_id: syn.global_virtual_group_family_id(),
        },
        charged_read_quota: base.charged_read_quota,
    })
}
