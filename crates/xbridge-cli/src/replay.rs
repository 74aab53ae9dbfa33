//! # Replay Subcommand
//!
//! Runs a YAML script of envelopes through [`BucketApp`] against an
//! [`InMemoryLedger`] and reports what each step produced.
//!
//! ## Script format
//!
//! ```yaml
//! next_bucket_id: 1        # optional
//! steps:
//!   - direction: syn       # syn | ack | fail_ack
//!     src_chain_id: 56
//!     height: 100          # selects the protocol version
//!     payload: "0x0201..."
//! ```
//!
//! A protocol violation stops the replay. Steps already executed are still
//! reported and the command exits with status 2.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use xbridge_bucket::{AppContext, BucketApp, BucketEvent, InMemoryLedger};
use xbridge_codec::{DecoderRegistry, Package};
use xbridge_core::{BridgeConfig, ChainId, PackageDirection, ProtocolVersion};

use crate::parse_hex;

/// Arguments for the `xbridge replay` subcommand.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the replay script (YAML).
    #[arg(long)]
    pub script: PathBuf,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// A replay script.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayScript {
    #[serde(default)]
    pub next_bucket_id: Option<u64>,
    pub steps: Vec<ReplayStep>,
}

/// One envelope delivered by the transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayStep {
    pub direction: PackageDirection,
    pub src_chain_id: u16,
    #[serde(default)]
    pub height: u64,
    pub payload: String,
}

/// What a single step produced.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub direction: PackageDirection,
    pub version: ProtocolVersion,
    /// Reply envelope as hex, absent when nothing is sent back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_package: Option<Package>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<BucketEvent>,
}

/// Full replay outcome.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    /// Set when a step could not be decoded; later steps were not run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<String>,
    pub buckets: usize,
}

impl ReplayReport {
    pub fn exit_code(&self) -> u8 {
        if self.violation.is_some() {
            2
        } else {
            0
        }
    }
}

/// Execute the replay subcommand.
pub fn run_replay(args: &ReplayArgs, config: &BridgeConfig) -> Result<u8> {
    let script = load_script(&args.script)?;
    let report = replay(config, &script)?;
    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write report: {}", path.display()))?,
        None => println!("{json}"),
    }
    if let Some(violation) = &report.violation {
        tracing::error!(%violation, "replay aborted");
    }
    Ok(report.exit_code())
}

pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script: {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("invalid script: {}", path.display()))
}

/// Run every step of `script` against a fresh ledger.
pub fn replay(config: &BridgeConfig, script: &ReplayScript) -> Result<ReplayReport> {
    let mut ledger = InMemoryLedger::new(config.chain_registry()?);
    if let Some(next_id) = script.next_bucket_id {
        ledger = ledger.with_next_id(next_id);
    }
    let app = BucketApp::new(config.channel_id);
    let acks = DecoderRegistry::bucket(config.channel_id, ProtocolVersion::V1);

    let mut steps = Vec::with_capacity(script.steps.len());
    let mut violation = None;

    for (index, step) in script.steps.iter().enumerate() {
        let payload = parse_hex(&step.payload).with_context(|| format!("step {index}"))?;
        let version = config.upgrade.version_at(step.height);
        let ctx = AppContext::new(ChainId(step.src_chain_id), version);
        tracing::info!(
            index,
            direction = %step.direction,
            %version,
            src_chain_id = step.src_chain_id,
            "replaying step"
        );

        let result = match app.handle(step.direction, &ctx, &mut ledger, &payload) {
            Ok(result) => result,
            Err(e) => {
                violation = Some(format!("step {index}: {e}"));
                break;
            }
        };

        let reply_package = if result.has_reply() {
            Some(
                acks.decode(config.channel_id, PackageDirection::Ack, &result.payload)
                    .with_context(|| format!("step {index}: reply does not decode"))?,
            )
        } else {
            None
        };

        steps.push(StepReport {
            index,
            direction: step.direction,
            version,
            reply: result.has_reply().then(|| hex::encode(&result.payload)),
            reply_package,
            error: result.error.as_ref().map(ToString::to_string),
            events: ledger.take_events(),
        });
    }

    Ok(ReplayReport {
        steps,
        violation,
        buckets: ledger.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{build_envelope, SamplePackage};
    use xbridge_codec::AckPackage;
    use xbridge_core::{AckStatus, Address, BucketId};

    const CREATOR: &str = "0xc1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1";

    fn create_hex(name: &str, family_id: Option<u32>) -> String {
        hex::encode(
            build_envelope(&SamplePackage::CreateSyn {
                creator: CREATOR.parse().unwrap(),
                name: name.into(),
                primary_sp: Address::new([0x5b; 20]),
                visibility: 1,
                charged_read_quota: 0,
                payment_address: Address::ZERO,
                expired_height: 100,
                signature: "01".repeat(65),
                family_id,
                extra_data: String::new(),
            })
            .unwrap(),
        )
    }

    fn delete_hex(id: u64) -> String {
        hex::encode(
            build_envelope(&SamplePackage::DeleteSyn {
                operator: CREATOR.parse().unwrap(),
                bucket_id: BucketId::from(id),
                extra_data: String::new(),
                v2: false,
            })
            .unwrap(),
        )
    }

    fn step(direction: PackageDirection, height: u64, payload: String) -> ReplayStep {
        ReplayStep {
            direction,
            src_chain_id: 56,
            height,
            payload,
        }
    }

    #[test]
    fn create_then_delete() {
        let script = ReplayScript {
            next_bucket_id: Some(7),
            steps: vec![
                step(PackageDirection::Syn, 1, create_hex("alpha", None)),
                step(PackageDirection::Syn, 2, delete_hex(7)),
            ],
        };
        let report = replay(&BridgeConfig::default(), &script).unwrap();
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.buckets, 0);
        assert_eq!(report.steps.len(), 2);

        let created = &report.steps[0];
        assert!(created.error.is_none());
        assert_eq!(created.events.len(), 1);
        let Some(Package::Ack(AckPackage::Create(ack))) = &created.reply_package else {
            panic!("unexpected reply {:?}", created.reply_package);
        };
        assert_eq!(ack.status, AckStatus::Success);
        assert_eq!(ack.bucket_id, Some(BucketId::from(7u64)));

        let Some(Package::Ack(AckPackage::Delete(ack))) = &report.steps[1].reply_package else {
            panic!("unexpected reply {:?}", report.steps[1].reply_package);
        };
        assert_eq!(ack.status, AckStatus::Success);
    }

    #[test]
    fn height_selects_version() {
        let mut config = BridgeConfig::default();
        config.upgrade.v2_height = Some(10);
        let script = ReplayScript {
            next_bucket_id: None,
            steps: vec![
                step(PackageDirection::Syn, 9, create_hex("pre", None)),
                step(PackageDirection::Syn, 10, create_hex("post", Some(3))),
            ],
        };
        let report = replay(&config, &script).unwrap();
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.steps[0].version, ProtocolVersion::V1);
        assert_eq!(report.steps[1].version, ProtocolVersion::V2);
        assert_eq!(report.buckets, 2);
    }

    #[test]
    fn violation_stops_replay() {
        let script = ReplayScript {
            next_bucket_id: None,
            steps: vec![
                step(PackageDirection::Syn, 1, create_hex("alpha", None)),
                step(PackageDirection::Syn, 1, "09".into()),
                step(PackageDirection::Syn, 1, create_hex("beta", None)),
            ],
        };
        let report = replay(&BridgeConfig::default(), &script).unwrap();
        assert_eq!(report.exit_code(), 2);
        assert_eq!(report.steps.len(), 1);
        assert!(report.violation.unwrap().starts_with("step 1"));
    }

    #[test]
    fn script_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("steps.yaml");
        let output = dir.path().join("report.json");
        std::fs::write(
            &script_path,
            format!(
                "steps:\n  - direction: syn\n    src_chain_id: 56\n    height: 1\n    \
                 payload: \"0x{}\"\n",
                create_hex("alpha", None)
            ),
        )
        .unwrap();

        let args = ReplayArgs {
            script: script_path,
            output: Some(output.clone()),
        };
        let code = run_replay(&args, &BridgeConfig::default()).unwrap();
        assert_eq!(code, 0);

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(report["buckets"], 1);
        assert_eq!(report["steps"][0]["events"][0]["type"], "create_bucket");
    }

    #[test]
    fn unknown_script_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "steps: []\nretries: 3\n").unwrap();
        assert!(load_script(&path).is_err());
    }
}
