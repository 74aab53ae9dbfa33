//! # Mirror Handlers
//!
//! Mirroring is a notification flow: this chain sends the Syn, the peer
//! answers with an Ack or returns the Syn as a FailAck, and nothing is sent
//! back in either case.
//!
//! - Ack: on success the bucket takes the source type of the acking chain.
//!   A result event is emitted for every status.
//! - FailAck: the mirror is rolled back and the bucket is `Origin` again.
//! - Syn: never valid in this chain's role. Logged and ignored.

use xbridge_codec::{MirrorBucketAck, MirrorBucketSyn};
use xbridge_core::{AckStatus, SourceType};

use crate::error::BucketAppError;
use crate::event::BucketEvent;
use crate::ledger::{BucketInfo, BucketLedger};
use crate::outcome::HandlerResult;
use crate::router::AppContext;

pub fn handle_mirror_syn(ctx: &AppContext, syn: &MirrorBucketSyn) -> HandlerResult {
    tracing::error!(
        bucket_id = %syn.bucket_id,
        src_chain = %ctx.src_chain_id,
        "received mirror bucket syn package"
    );
    HandlerResult::empty()
}

pub fn handle_mirror_ack<L: BucketLedger + ?Sized>(
    ctx: &AppContext,
    ledger: &mut L,
    ack: &MirrorBucketAck,
) -> HandlerResult {
    let Some(mut bucket) = ledger.bucket_by_id(&ack.bucket_id) else {
        tracing::error!(bucket_id = %ack.bucket_id, "bucket does not exist");
        return HandlerResult::error(BucketAppError::NoSuchBucket {
            id: ack.bucket_id.clone(),
        });
    };

    if ack.status == AckStatus::Success {
        match ledger.source_type_for_chain(ctx.src_chain_id) {
            Ok(source_type) => bucket.source_type = source_type,
            Err(e) => return HandlerResult::error(e),
        }
        if let Err(e) = ledger.set_bucket(bucket.clone()) {
            return HandlerResult::error(e);
        }
    }

    emit_result(ctx, ledger, ack.status, bucket)
}

pub fn handle_mirror_fail_ack<L: BucketLedger + ?Sized>(
    ctx: &AppContext,
    ledger: &mut L,
    syn: &MirrorBucketSyn,
) -> HandlerResult {
    let Some(mut bucket) = ledger.bucket_by_id(&syn.bucket_id) else {
        tracing::error!(bucket_id = %syn.bucket_id, "bucket does not exist");
        return HandlerResult::error(BucketAppError::NoSuchBucket {
            id: syn.bucket_id.clone(),
        });
    };

    bucket.source_type = SourceType::Origin;
    if let Err(e) = ledger.set_bucket(bucket.clone()) {
        return HandlerResult::error(e);
    }

    emit_result(ctx, ledger, AckStatus::Fail, bucket)
}

fn emit_result<L: BucketLedger + ?Sized>(
    ctx: &AppContext,
    ledger: &mut L,
    status: AckStatus,
    bucket: BucketInfo,
) -> HandlerResult {
    let event = BucketEvent::MirrorBucketResult {
        status,
        bucket_name: bucket.bucket_name,
        bucket_id: bucket.id,
        dest_chain_id: ctx.src_chain_id,
    };
    match ledger.emit_event(event) {
        Ok(()) => HandlerResult::empty(),
        Err(e) => HandlerResult::error(e),
    }
}
