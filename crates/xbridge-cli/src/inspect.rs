//! # Inspect Subcommand
//!
//! Decodes a raw envelope with the same registry the bucket application
//! uses and prints the typed package as JSON.

use anyhow::{Context, Result};
use clap::Args;

use xbridge_codec::{DecoderRegistry, Package};
use xbridge_core::{BridgeConfig, PackageDirection, ProtocolVersion};

use crate::parse_hex;

/// Arguments for the `xbridge inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Direction the envelope travelled in: syn, ack or fail-ack.
    #[arg(long, default_value = "syn")]
    pub direction: PackageDirection,

    /// Envelope bytes as hex (an optional 0x prefix is accepted).
    #[arg(long)]
    pub payload: String,

    /// Decode requests with the V2 layout.
    #[arg(long)]
    pub v2: bool,
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs, config: &BridgeConfig) -> Result<u8> {
    let bytes = parse_hex(&args.payload)?;
    let package = inspect(
        config,
        args.direction,
        ProtocolVersion::from_upgraded(args.v2),
        &bytes,
    )?;
    println!("{}", serde_json::to_string_pretty(&package)?);
    Ok(0)
}

/// Decode an envelope on the configured channel.
pub fn inspect(
    config: &BridgeConfig,
    direction: PackageDirection,
    version: ProtocolVersion,
    envelope: &[u8],
) -> Result<Package> {
    let registry = DecoderRegistry::bucket(config.channel_id, version);
    tracing::debug!(
        channel = %config.channel_id,
        %direction,
        %version,
        len = envelope.len(),
        "decoding envelope"
    );
    registry
        .decode(config.channel_id, direction, envelope)
        .with_context(|| format!("cannot decode {direction} envelope as {version}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{build_envelope, SamplePackage};
    use xbridge_codec::SynPackage;
    use xbridge_core::{Address, BucketId};

    fn delete_envelope(v2: bool) -> Vec<u8> {
        build_envelope(&SamplePackage::DeleteSyn {
            operator: Address::new([0xaa; 20]),
            bucket_id: BucketId::from(42u64),
            extra_data: "beef".into(),
            v2,
        })
        .unwrap()
    }

    #[test]
    fn decodes_syn_as_json() {
        let package = inspect(
            &BridgeConfig::default(),
            PackageDirection::Syn,
            ProtocolVersion::V1,
            &delete_envelope(false),
        )
        .unwrap();
        let Package::Syn(SynPackage::Delete(syn)) = &package else {
            panic!("unexpected package {package:?}");
        };
        assert_eq!(syn.bucket_id, BucketId::from(42u64));

        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json["direction"], "syn");
        assert_eq!(json["package"]["operation"], "delete");
    }

    #[test]
    fn version_must_match_container() {
        let err = inspect(
            &BridgeConfig::default(),
            PackageDirection::Syn,
            ProtocolVersion::V1,
            &delete_envelope(true),
        );
        assert!(err.is_err());
    }

    #[test]
    fn fail_ack_decodes_as_request() {
        let package = inspect(
            &BridgeConfig::default(),
            PackageDirection::FailAck,
            ProtocolVersion::V2,
            &delete_envelope(true),
        )
        .unwrap();
        assert!(matches!(package, Package::FailAck(SynPackage::Delete(_))));
    }
}
