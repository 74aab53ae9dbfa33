//! # Create Handlers
//!
//! A create request is executed here in the Syn path and answered with a
//! synthesized Ack: `Success` with the assigned id, or `Fail` without one.
//! The Ack and FailAck directions are only logged.

use xbridge_codec::{AckPackage, CreateBucketAck, CreateBucketSyn};
use xbridge_core::AckStatus;

use crate::approval::approval_message_bytes;
use crate::error::BucketAppError;
use crate::ledger::{Approval, BucketLedger, CreateBucketOptions};
use crate::outcome::HandlerResult;
use crate::router::AppContext;
use crate::validate::{parse_visibility, ValidateBasic};

pub fn handle_create_syn<L: BucketLedger + ?Sized>(
    ctx: &AppContext,
    ledger: &mut L,
    syn: &CreateBucketSyn,
) -> HandlerResult {
    let base = syn.base();
    let reject = |error: BucketAppError| {
        HandlerResult::reject(
            AckPackage::Create(CreateBucketAck {
                status: AckStatus::Fail,
                bucket_id: None,
                creator: base.creator,
                extra_data: base.extra_data.clone(),
            }),
            error,
        )
    };

    let visibility = match syn
        .validate_basic()
        .and_then(|()| parse_visibility(base.visibility))
    {
        Ok(visibility) => visibility,
        Err(e) => return reject(e.into()),
    };

    tracing::info!(
        bucket_name = %base.bucket_name,
        version = %syn.version(),
        "process create bucket syn package"
    );

    // Unknown chains get no reply at all, only the error.
    let source_type = match ledger.source_type_for_chain(ctx.src_chain_id) {
        Ok(source_type) => source_type,
        Err(e) => return HandlerResult::error(e),
    };

    let approval_msg_bytes = match approval_message_bytes(syn) {
        Ok(bytes) => bytes,
        Err(e) => return reject(e.into()),
    };

    let options = CreateBucketOptions {
        visibility,
        source_type,
        charged_read_quota: base.charged_read_quota,
        payment_address: base.payment_address,
        primary_sp_approval: Approval {
            expired_height: base.primary_sp_approval_expired_height,
            global_virtual_group_family_id: syn.global_virtual_group_family_id(),
            sig: base.primary_sp_approval_signature.clone(),
        },
        approval_msg_bytes,
    };

    match ledger.create_bucket(
        &base.creator,
        &base.bucket_name,
        &base.primary_sp_address,
        options,
    ) {
        Ok(bucket_id) => HandlerResult::reply(AckPackage::Create(CreateBucketAck {
            status: AckStatus::Success,
            bucket_id: Some(bucket_id),
            creator: base.creator,
            extra_data: base.extra_data.clone(),
        })),
        Err(e) => reject(e.into()),
    }
}

pub fn handle_create_ack(ack: &CreateBucketAck) -> HandlerResult {
    tracing::error!(
        creator = %ack.creator,
        status = %ack.status,
        "received create bucket ack package"
    );
    HandlerResult::empty()
}

pub fn handle_create_fail_ack(syn: &CreateBucketSyn) -> HandlerResult {
    tracing::error!(
        bucket_name = %syn.base().bucket_name,
        version = %syn.version(),
        "received create bucket fail ack package"
    );
    HandlerResult::empty()
}
