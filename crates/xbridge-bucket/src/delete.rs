//! # Delete Handlers
//!
//! Mirrors the create flow: the Syn path deletes through the ledger and
//! answers with a `Success` or `Fail` Ack carrying the bucket id. The Ack and
//! FailAck directions are only logged.

use xbridge_codec::{AckPackage, DeleteBucketAck, DeleteBucketSyn};
use xbridge_core::AckStatus;

use crate::error::BucketAppError;
use crate::ledger::{BucketLedger, DeleteBucketOptions};
use crate::outcome::HandlerResult;
use crate::router::AppContext;
use crate::validate::ValidateBasic;

pub fn handle_delete_syn<L: BucketLedger + ?Sized>(
    ctx: &AppContext,
    ledger: &mut L,
    syn: &DeleteBucketSyn,
) -> HandlerResult {
    let reject = |error: BucketAppError| {
        HandlerResult::reject(
            AckPackage::Delete(DeleteBucketAck {
                status: AckStatus::Fail,
                bucket_id: syn.bucket_id.clone(),
                extra_data: syn.extra_data.clone(),
            }),
            error,
        )
    };

    if let Err(e) = syn.validate_basic() {
        return reject(e.into());
    }

    tracing::info!(bucket_id = %syn.bucket_id, "process delete bucket syn package");

    let Some(bucket) = ledger.bucket_by_id(&syn.bucket_id) else {
        tracing::error!(bucket_id = %syn.bucket_id, "bucket does not exist");
        return reject(BucketAppError::NoSuchBucket {
            id: syn.bucket_id.clone(),
        });
    };

    let source_type = match ledger.source_type_for_chain(ctx.src_chain_id) {
        Ok(source_type) => source_type,
        Err(e) => return HandlerResult::error(e),
    };

    match ledger.delete_bucket(
        &syn.operator,
        &bucket.bucket_name,
        DeleteBucketOptions { source_type },
    ) {
        Ok(()) => HandlerResult::reply(AckPackage::Delete(DeleteBucketAck {
            status: AckStatus::Success,
            bucket_id: bucket.id,
            extra_data: syn.extra_data.clone(),
        })),
        Err(e) => reject(e.into()),
    }
}

pub fn handle_delete_ack(ack: &DeleteBucketAck) -> HandlerResult {
    tracing::error!(
        bucket_id = %ack.bucket_id,
        status = %ack.status,
        "received delete bucket ack package"
    );
    HandlerResult::empty()
}

pub fn handle_delete_fail_ack(syn: &DeleteBucketSyn) -> HandlerResult {
    tracing::error!(bucket_id = %syn.bucket_id, "received delete bucket fail ack package");
    HandlerResult::empty()
}
