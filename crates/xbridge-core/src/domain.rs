//! # Bridge Protocol Vocabulary
//!
//! Closed enumerations shared by the codec and the handlers. Every `match`
//! on these types is exhaustive, so adding an operation or a direction
//! forces every dispatch site to handle it at compile time.
//!
//! Wire discriminants are explicit and stable. `from_u8`/`from_u32` are the
//! only decoding paths and reject unknown values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrimitiveError;

/// Which bucket action a package concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum OperationKind {
    /// Mirror an existing bucket onto a peer chain.
    Mirror = 1,
    /// Create a bucket on behalf of a peer-chain account.
    Create = 2,
    /// Delete a bucket on behalf of a peer-chain account.
    Delete = 3,
}

impl OperationKind {
    /// All operations, in tag order.
    pub const ALL: [OperationKind; 3] = [Self::Mirror, Self::Create, Self::Delete];

    /// The one-byte envelope tag.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Decode an envelope tag.
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Mirror),
            2 => Some(Self::Create),
            3 => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Mirror => "mirror_bucket",
            Self::Create => "create_bucket",
            Self::Delete => "delete_bucket",
        };
        f.write_str(s)
    }
}

/// The three package directions of the bridge protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageDirection {
    /// Request.
    Syn,
    /// Success acknowledgement.
    Ack,
    /// Failure acknowledgement; carries the original request back.
    FailAck,
}

impl PackageDirection {
    /// All directions.
    pub const ALL: [PackageDirection; 3] = [Self::Syn, Self::Ack, Self::FailAck];
}

impl fmt::Display for PackageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Syn => "syn",
            Self::Ack => "ack",
            Self::FailAck => "fail_ack",
        };
        f.write_str(s)
    }
}

impl FromStr for PackageDirection {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "syn" => Ok(Self::Syn),
            "ack" => Ok(Self::Ack),
            "fail_ack" | "failack" => Ok(Self::FailAck),
            _ => Err(PrimitiveError::UnknownVariant {
                kind: "package direction",
                value: s.to_string(),
            }),
        }
    }
}

/// Status carried in acknowledgement packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AckStatus {
    /// The request was applied.
    Success = 0,
    /// The request was rejected.
    Fail = 1,
}

impl AckStatus {
    /// Wire discriminant.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a wire discriminant.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Success),
            1 => Some(Self::Fail),
            _ => None,
        }
    }
}

impl fmt::Display for AckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "SUCCESS",
            Self::Fail => "FAIL",
        })
    }
}

/// Provenance tag on a bucket record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum SourceType {
    /// Created locally and not mirrored anywhere.
    Origin = 0,
    /// Created or mirrored through the BSC bridge.
    BscCrossChain = 1,
    /// A mirror request is in flight.
    MirrorPending = 2,
    /// Created or mirrored through the opBNB bridge.
    OpCrossChain = 3,
}

impl SourceType {
    /// Numeric discriminant as stored by the ledger.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Origin => "SOURCE_TYPE_ORIGIN",
            Self::BscCrossChain => "SOURCE_TYPE_BSC_CROSS_CHAIN",
            Self::MirrorPending => "SOURCE_TYPE_MIRROR_PENDING",
            Self::OpCrossChain => "SOURCE_TYPE_OP_CROSS_CHAIN",
        })
    }
}

/// Read visibility of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum Visibility {
    /// Not set; rejected by validation.
    Unspecified = 0,
    /// Anyone may read.
    PublicRead = 1,
    /// Only the owner and grantees may read.
    Private = 2,
    /// Inherit from the enclosing resource.
    Inherit = 3,
}

impl Visibility {
    /// Wire discriminant.
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Decode a wire discriminant.
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::PublicRead),
            2 => Some(Self::Private),
            3 => Some(Self::Inherit),
            _ => None,
        }
    }
}

/// Package container schema version, selected by the upgrade state of the
/// executing chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    /// Legacy container, before the upgrade boundary.
    V1,
    /// Current container, after the upgrade boundary.
    V2,
}

impl ProtocolVersion {
    /// Map the `isProtocolUpgraded` flag to a version.
    pub const fn from_upgraded(upgraded: bool) -> Self {
        if upgraded {
            Self::V2
        } else {
            Self::V1
        }
    }

    /// The leading container byte of every inner package of this version.
    pub const fn container_marker(self) -> u8 {
        match self {
            Self::V1 => 0x01,
            Self::V2 => 0x02,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        })
    }
}
