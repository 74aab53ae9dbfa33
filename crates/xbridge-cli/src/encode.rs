//! # Encode Subcommand
//!
//! Builds the envelope for a sample package and prints it as hex, for use
//! in replay scripts and in `inspect`.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use xbridge_codec::{
    AckPackage, CreateBucketSyn, CreateBucketSynV1, CreateBucketSynV2, DeleteBucketSyn, Envelope,
    MirrorBucketAck, MirrorBucketSyn, SynPackage,
};
use xbridge_core::{AckStatus, Address, BucketId, ProtocolVersion};

use crate::parse_hex;

/// Arguments for the `xbridge encode` subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(subcommand)]
    pub package: SamplePackage,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SamplePackage {
    /// Mirror request.
    MirrorSyn {
        #[arg(long)]
        bucket_id: BucketId,
        /// Extra data as hex.
        #[arg(long, default_value = "")]
        extra_data: String,
        /// Use the V2 container.
        #[arg(long)]
        v2: bool,
    },

    /// Mirror acknowledgement from the peer chain.
    MirrorAck {
        #[arg(long)]
        bucket_id: BucketId,
        /// Report a failed mirror instead of a successful one.
        #[arg(long)]
        failed: bool,
        #[arg(long, default_value = "")]
        extra_data: String,
    },

    /// Create request. Passing `--family-id` selects the V2 layout.
    CreateSyn {
        #[arg(long)]
        creator: Address,
        #[arg(long)]
        name: String,
        #[arg(long)]
        primary_sp: Address,
        /// 1 public-read, 2 private, 3 inherit.
        #[arg(long, default_value_t = 2)]
        visibility: u32,
        #[arg(long, default_value_t = 0)]
        charged_read_quota: u64,
        /// Defaults to the zero address (creator pays).
        #[arg(long, default_value = "0x0000000000000000000000000000000000000000")]
        payment_address: Address,
        #[arg(long, default_value_t = 0)]
        expired_height: u64,
        /// Approval signature as hex.
        #[arg(long)]
        signature: String,
        #[arg(long)]
        family_id: Option<u32>,
        #[arg(long, default_value = "")]
        extra_data: String,
    },

    /// Delete request.
    DeleteSyn {
        #[arg(long)]
        operator: Address,
        #[arg(long)]
        bucket_id: BucketId,
        #[arg(long, default_value = "")]
        extra_data: String,
        #[arg(long)]
        v2: bool,
    },
}

/// Execute the encode subcommand.
pub fn run_encode(args: &EncodeArgs) -> Result<u8> {
    let envelope = build_envelope(&args.package)?;
    println!("{}", hex::encode(envelope));
    Ok(0)
}

/// Encode a sample package as a full envelope.
pub fn build_envelope(sample: &SamplePackage) -> Result<Vec<u8>> {
    let (operation, inner) = match sample {
        SamplePackage::MirrorSyn {
            bucket_id,
            extra_data,
            v2,
        } => {
            let syn = SynPackage::Mirror(MirrorBucketSyn {
                bucket_id: bucket_id.clone(),
                extra_data: parse_hex(extra_data)?,
            });
            (syn.operation(), syn.encode(ProtocolVersion::from_upgraded(*v2))?)
        }
        SamplePackage::MirrorAck {
            bucket_id,
            failed,
            extra_data,
        } => {
            let ack = AckPackage::Mirror(MirrorBucketAck {
                bucket_id: bucket_id.clone(),
                status: if *failed {
                    AckStatus::Fail
                } else {
                    AckStatus::Success
                },
                extra_data: parse_hex(extra_data)?,
            });
            (ack.operation(), ack.encode()?)
        }
        SamplePackage::CreateSyn {
            creator,
            name,
            primary_sp,
            visibility,
            charged_read_quota,
            payment_address,
            expired_height,
            signature,
            family_id,
            extra_data,
        } => {
            let base = CreateBucketSynV1 {
                creator: *creator,
                bucket_name: name.clone(),
                primary_sp_address: *primary_sp,
                visibility: *visibility,
                charged_read_quota: *charged_read_quota,
                payment_address: *payment_address,
                primary_sp_approval_expired_height: *expired_height,
                primary_sp_approval_signature: parse_hex(signature)
                    .context("invalid --signature")?,
                extra_data: parse_hex(extra_data)?,
            };
            let create = match family_id {
                Some(id) => CreateBucketSyn::V2(CreateBucketSynV2 {
                    base,
                    global_virtual_group_family_id: *id,
                }),
                None => CreateBucketSyn::V1(base),
            };
            let version = create.version();
            let syn = SynPackage::Create(create);
            (syn.operation(), syn.encode(version)?)
        }
        SamplePackage::DeleteSyn {
            operator,
            bucket_id,
            extra_data,
            v2,
        } => {
            let syn = SynPackage::Delete(DeleteBucketSyn {
                operator: *operator,
                bucket_id: bucket_id.clone(),
                extra_data: parse_hex(extra_data)?,
            });
            (syn.operation(), syn.encode(ProtocolVersion::from_upgraded(*v2))?)
        }
    };
    Ok(Envelope::new(operation, inner).encode())
}
