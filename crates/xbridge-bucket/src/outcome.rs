//! What a handler hands back to the router.

use xbridge_codec::AckPackage;

use crate::error::BucketAppError;

/// A handler's reply package, if any, and its recoverable error, if any.
#[derive(Debug, Default)]
pub struct HandlerResult {
    pub reply: Option<AckPackage>,
    pub error: Option<BucketAppError>,
}

impl HandlerResult {
    /// No reply, no error.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn reply(ack: AckPackage) -> Self {
        Self {
            reply: Some(ack),
            error: None,
        }
    }

    /// An error with no reply.
    pub fn error(error: impl Into<BucketAppError>) -> Self {
        Self {
            reply: None,
            error: Some(error.into()),
        }
    }

    /// A failure reply together with the local error that caused it.
    pub fn reject(ack: AckPackage, error: impl Into<BucketAppError>) -> Self {
        Self {
            reply: Some(ack),
            error: Some(error.into()),
        }
    }
}
