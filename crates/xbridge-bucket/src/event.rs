//! Typed events recorded by the ledger.

use serde::Serialize;
use xbridge_core::{AckStatus, Address, BucketId, ChainId, SourceType};

/// An event emitted while processing a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BucketEvent {
    /// Outcome of a mirror request, reported for both Ack and FailAck.
    MirrorBucketResult {
        status: AckStatus,
        bucket_name: String,
        bucket_id: BucketId,
        /// The chain the bucket was mirrored to.
        dest_chain_id: ChainId,
    },
    CreateBucket {
        bucket_id: BucketId,
        bucket_name: String,
        owner: Address,
        source_type: SourceType,
    },
    DeleteBucket {
        bucket_id: BucketId,
        bucket_name: String,
        operator: Address,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_result_json_shape() {
        let event = BucketEvent::MirrorBucketResult {
            status: AckStatus::Fail,
            bucket_name: "alpha".into(),
            bucket_id: BucketId::from(3u64),
            dest_chain_id: ChainId(56),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "mirror_bucket_result");
        assert_eq!(json["status"], "fail");
        assert_eq!(json["bucket_id"], "3");
        assert_eq!(json["dest_chain_id"], 56);
    }
}
