//! # Bucket Packages
//!
//! Typed Syn and Ack packages for the three bucket operations, and their
//! binary layouts.
//!
//! ## Layout
//!
//! Each package is `[container marker][fields...]`. Ack packages always use
//! the legacy container. Syn packages use the container of the active
//! protocol version, and only `CreateBucketSyn` changes its field list across
//! versions: V2 adds `global_virtual_group_family_id` before `extra_data`.
//!
//! A FailAck carries the original Syn package back, so it has no layout of
//! its own.

use serde::Serialize;
use xbridge_core::{AckStatus, Address, BucketId, OperationKind, ProtocolVersion};

use crate::error::{DecodeError, EncodeError};
use crate::wire::{Reader, Writer};

/// Field-level binary layout of a package, without its container.
pub trait WireFormat: Sized {
    fn write_fields(&self, w: &mut Writer) -> Result<(), EncodeError>;
    fn read_fields(r: &mut Reader<'_>) -> Result<Self, DecodeError>;
}

/// Encode `package` inside the container of `version`.
pub fn encode_in<T: WireFormat>(
    package: &T,
    version: ProtocolVersion,
) -> Result<Vec<u8>, EncodeError> {
    let mut w = Writer::with_container(version);
    package.write_fields(&mut w)?;
    Ok(w.into_bytes())
}

/// Decode a package that must occupy all of `bytes` inside the container of
/// `version`.
pub fn decode_in<T: WireFormat>(
    bytes: &[u8],
    version: ProtocolVersion,
) -> Result<T, DecodeError> {
    let mut r = Reader::new(bytes);
    r.container(version)?;
    let package = T::read_fields(&mut r)?;
    r.finish()?;
    Ok(package)
}

// ─── Mirror ──────────────────────────────────────────────────────────

/// Request to mirror a bucket onto the peer chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorBucketSyn {
    pub bucket_id: BucketId,
    #[serde(with = "hex")]
    pub extra_data: Vec<u8>,
}

impl WireFormat for MirrorBucketSyn {
    fn write_fields(&self, w: &mut Writer) -> Result<(), EncodeError> {
        w.put_bigint(&self.bucket_id);
        w.put_bytes("extra_data", &self.extra_data)
    }

    fn read_fields(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            bucket_id: r.bigint("bucket_id")?,
            extra_data: r.bytes("extra_data")?,
        })
    }
}

/// Outcome of a mirror request, reported by the peer chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorBucketAck {
    pub bucket_id: BucketId,
    pub status: AckStatus,
    #[serde(with = "hex")]
    pub extra_data: Vec<u8>,
}

impl WireFormat for MirrorBucketAck {
    fn write_fields(&self, w: &mut Writer) -> Result<(), EncodeError> {
        w.put_bigint(&self.bucket_id);
        w.put_status(self.status);
        w.put_bytes("extra_data", &self.extra_data)
    }

    fn read_fields(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            bucket_id: r.bigint("bucket_id")?,
            status: r.status()?,
            extra_data: r.bytes("extra_data")?,
        })
    }
}

// ─── Create ──────────────────────────────────────────────────────────

/// Legacy create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBucketSynV1 {
    pub creator: Address,
    pub bucket_name: String,
    pub primary_sp_address: Address,
    /// Raw visibility discriminant; unknown values are rejected by
    /// validation, not by the decoder.
    pub visibility: u32,
    pub charged_read_quota: u64,
    /// Zero means the creator pays.
    pub payment_address: Address,
    pub primary_sp_approval_expired_height: u64,
    #[serde(with = "hex")]
    pub primary_sp_approval_signature: Vec<u8>,
    #[serde(with = "hex")]
    pub extra_data: Vec<u8>,
}

impl CreateBucketSynV1 {
    fn write_head(&self, w: &mut Writer) -> Result<(), EncodeError> {
        w.put_address(&self.creator);
        w.put_string("bucket_name", &self.bucket_name)?;
        w.put_address(&self.primary_sp_address);
        w.put_u32(self.visibility);
        w.put_u64(self.charged_read_quota);
        w.put_address(&self.payment_address);
        w.put_u64(self.primary_sp_approval_expired_height);
        w.put_bytes(
            "primary_sp_approval_signature",
            &self.primary_sp_approval_signature,
        )
    }

    // Leaves `extra_data` empty for the caller to fill.
    fn read_head(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            creator: r.address("creator")?,
            bucket_name: r.string("bucket_name")?,
            primary_sp_address: r.address("primary_sp_address")?,
            visibility: r.u32("visibility")?,
            charged_read_quota: r.u64("charged_read_quota")?,
            payment_address: r.address("payment_address")?,
            primary_sp_approval_expired_height: r.u64("primary_sp_approval_expired_height")?,
            primary_sp_approval_signature: r.bytes("primary_sp_approval_signature")?,
            extra_data: Vec::new(),
        })
    }
}

impl WireFormat for CreateBucketSynV1 {
    fn write_fields(&self, w: &mut Writer) -> Result<(), EncodeError> {
        self.write_head(w)?;
        w.put_bytes("extra_data", &self.extra_data)
    }

    fn read_fields(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let mut syn = Self::read_head(r)?;
        syn.extra_data = r.bytes("extra_data")?;
        Ok(syn)
    }
}

/// Current create request, pinned to a global virtual group family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBucketSynV2 {
    #[serde(flatten)]
    pub base: CreateBucketSynV1,
    pub global_virtual_group_family_id: u32,
}

impl WireFormat for CreateBucketSynV2 {
    fn write_fields(&self, w: &mut Writer) -> Result<(), EncodeError> {
        self.base.write_head(w)?;
        w.put_u32(self.global_virtual_group_family_id);
        w.put_bytes("extra_data", &self.base.extra_data)
    }

    fn read_fields(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let mut base = CreateBucketSynV1::read_head(r)?;
        let global_virtual_group_family_id = r.u32("global_virtual_group_family_id")?;
        base.extra_data = r.bytes("extra_data")?;
        Ok(Self {
            base,
            global_virtual_group_family_id,
        })
    }
}

/// A create request in either layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "version", rename_all = "lowercase")]
pub enum CreateBucketSyn {
    V1(CreateBucketSynV1),
    V2(CreateBucketSynV2),
}

impl CreateBucketSyn {
    /// Fields shared by both layouts.
    pub fn base(&self) -> &CreateBucketSynV1 {
        match self {
            Self::V1(syn) => syn,
            Self::V2(syn) => &syn.base,
        }
    }

    /// Family id, present only in the V2 layout.
    pub fn global_virtual_group_family_id(&self) -> Option<u32> {
        match self {
            Self::V1(_) => None,
            Self::V2(syn) => Some(syn.global_virtual_group_family_id),
        }
    }

    /// The protocol version whose layout this request uses.
    pub fn version(&self) -> ProtocolVersion {
        match self {
            Self::V1(_) => ProtocolVersion::V1,
            Self::V2(_) => ProtocolVersion::V2,
        }
    }

    fn encode(&self, container: ProtocolVersion) -> Result<Vec<u8>, EncodeError> {
        if self.version() != container {
            return Err(EncodeError::VersionMismatch {
                package: self.version(),
                container,
            });
        }
        match self {
            Self::V1(syn) => encode_in(syn, container),
            Self::V2(syn) => encode_in(syn, container),
        }
    }

    fn decode(bytes: &[u8], version: ProtocolVersion) -> Result<Self, DecodeError> {
        match version {
            ProtocolVersion::V1 => decode_in(bytes, version).map(Self::V1),
            ProtocolVersion::V2 => decode_in(bytes, version).map(Self::V2),
        }
    }
}

/// Outcome of a create request, sent back to the originating chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBucketAck {
    pub status: AckStatus,
    /// Assigned id; absent on failure.
    pub bucket_id: Option<BucketId>,
    pub creator: Address,
    #[serde(with = "hex")]
    pub extra_data: Vec<u8>,
}

impl WireFormat for CreateBucketAck {
    fn write_fields(&self, w: &mut Writer) -> Result<(), EncodeError> {
        w.put_status(self.status);
        w.put_option_bigint(self.bucket_id.as_ref());
        w.put_address(&self.creator);
        w.put_bytes("extra_data", &self.extra_data)
    }

    fn read_fields(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            status: r.status()?,
            bucket_id: r.option_bigint("bucket_id")?,
            creator: r.address("creator")?,
            extra_data: r.bytes("extra_data")?,
        })
    }
}

// ─── Delete ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteBucketSyn {
    pub operator: Address,
    pub bucket_id: BucketId,
    #[serde(with = "hex")]
    pub extra_data: Vec<u8>,
}

impl WireFormat for DeleteBucketSyn {
    fn write_fields(&self, w: &mut Writer) -> Result<(), EncodeError> {
        w.put_address(&self.operator);
        w.put_bigint(&self.bucket_id);
        w.put_bytes("extra_data", &self.extra_data)
    }

    fn read_fields(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            operator: r.address("operator")?,
            bucket_id: r.bigint("bucket_id")?,
            extra_data: r.bytes("extra_data")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteBucketAck {
    pub status: AckStatus,
    pub bucket_id: BucketId,
    #[serde(with = "hex")]
    pub extra_data: Vec<u8>,
}

impl WireFormat for DeleteBucketAck {
    fn write_fields(&self, w: &mut Writer) -> Result<(), EncodeError> {
        w.put_status(self.status);
        w.put_bigint(&self.bucket_id);
        w.put_bytes("extra_data", &self.extra_data)
    }

    fn read_fields(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            status: r.status()?,
            bucket_id: r.bigint("bucket_id")?,
            extra_data: r.bytes("extra_data")?,
        })
    }
}

// ─── Direction unions ────────────────────────────────────────────────

/// A request package of any operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum SynPackage {
    Mirror(MirrorBucketSyn),
    Create(CreateBucketSyn),
    Delete(DeleteBucketSyn),
}

impl SynPackage {
    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Mirror(_) => OperationKind::Mirror,
            Self::Create(_) => OperationKind::Create,
            Self::Delete(_) => OperationKind::Delete,
        }
    }

    /// Encode inside the container of `version`. A create request must use
    /// the layout of that same version.
    pub fn encode(&self, version: ProtocolVersion) -> Result<Vec<u8>, EncodeError> {
        match self {
            Self::Mirror(syn) => encode_in(syn, version),
            Self::Create(syn) => syn.encode(version),
            Self::Delete(syn) => encode_in(syn, version),
        }
    }

    /// Decode the request layout of `operation` for `version`.
    pub fn decode(
        operation: OperationKind,
        bytes: &[u8],
        version: ProtocolVersion,
    ) -> Result<Self, DecodeError> {
        match operation {
            OperationKind::Mirror => decode_in(bytes, version).map(Self::Mirror),
            OperationKind::Create => CreateBucketSyn::decode(bytes, version).map(Self::Create),
            OperationKind::Delete => decode_in(bytes, version).map(Self::Delete),
        }
    }
}

/// An acknowledgement package of any operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum AckPackage {
    Mirror(MirrorBucketAck),
    Create(CreateBucketAck),
    Delete(DeleteBucketAck),
}

impl AckPackage {
    /// Acks have a single layout in the legacy container.
    pub const CONTAINER: ProtocolVersion = ProtocolVersion::V1;

    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Mirror(_) => OperationKind::Mirror,
            Self::Create(_) => OperationKind::Create,
            Self::Delete(_) => OperationKind::Delete,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        match self {
            Self::Mirror(ack) => encode_in(ack, Self::CONTAINER),
            Self::Create(ack) => encode_in(ack, Self::CONTAINER),
            Self::Delete(ack) => encode_in(ack, Self::CONTAINER),
        }
    }

    pub fn decode(operation: OperationKind, bytes: &[u8]) -> Result<Self, DecodeError> {
        match operation {
            OperationKind::Mirror => decode_in(bytes, Self::CONTAINER).map(Self::Mirror),
            OperationKind::Create => decode_in(bytes, Self::CONTAINER).map(Self::Create),
            OperationKind::Delete => decode_in(bytes, Self::CONTAINER).map(Self::Delete),
        }
    }
}

/// A decoded inner package tagged with the direction it arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "direction", content = "package", rename_all = "snake_case")]
pub enum Package {
    Syn(SynPackage),
    Ack(AckPackage),
    /// The original request, returned because it failed on the peer chain.
    FailAck(SynPackage),
}

impl Package {
    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Syn(syn) | Self::FailAck(syn) => syn.operation(),
            Self::Ack(ack) => ack.operation(),
        }
    }
}
