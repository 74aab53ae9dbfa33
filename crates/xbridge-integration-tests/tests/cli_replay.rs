//! # CLI Seams
//!
//! The CLI builds envelopes, loads configuration from disk and replays
//! scripts. These tests go through the library entry points the binary
//! uses.

use xbridge_cli::encode::{build_envelope, SamplePackage};
use xbridge_cli::inspect::inspect;
use xbridge_cli::load_config;
use xbridge_cli::replay::{load_script, replay};
use xbridge_codec::{Package, SynPackage};
use xbridge_core::{Address, BucketId, PackageDirection, ProtocolVersion};

fn create_sample(name: &str, family_id: Option<u32>) -> SamplePackage {
    SamplePackage::CreateSyn {
        creator: Address::new([0xc1; 20]),
        name: name.into(),
        primary_sp: Address::new([0x5b; 20]),
        visibility: 2,
        charged_read_quota: 0,
        payment_address: Address::ZERO,
        expired_height: 10,
        signature: "ab".repeat(65),
        family_id,
        extra_data: String::new(),
    }
}

#[test]
fn encoded_sample_inspects_back() {
    let bytes = build_envelope(&create_sample("alpha", Some(2))).unwrap();
    let config = xbridge_core::BridgeConfig::default();
    let package = inspect(&config, PackageDirection::Syn, ProtocolVersion::V2, &bytes).unwrap();
    let Package::Syn(SynPackage::Create(syn)) = package else {
        panic!("expected a create syn");
    };
    assert_eq!(syn.base().bucket_name, "alpha");
    assert_eq!(syn.global_virtual_group_family_id(), Some(2));
}

#[test]
fn replay_from_files_with_configured_upgrade() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("bridge.yaml");
    std::fs::write(
        &config_path,
        "channel_id: 4\n\
         upgrade:\n  v2_height: 50\n\
         chains:\n\
         \x20 - chain_id: 56\n    source_type: BSC_CROSS_CHAIN\n",
    )
    .unwrap();

    let v1 = hex::encode(build_envelope(&create_sample("pre", None)).unwrap());
    let v2 = hex::encode(build_envelope(&create_sample("post", Some(1))).unwrap());
    let delete = hex::encode(
        build_envelope(&SamplePackage::DeleteSyn {
            operator: Address::new([0xc1; 20]),
            bucket_id: BucketId::from(1u64),
            extra_data: String::new(),
            v2: true,
        })
        .unwrap(),
    );
    let script_path = dir.path().join("steps.yaml");
    std::fs::write(
        &script_path,
        format!(
            "steps:\n\
             \x20 - {{ direction: syn, src_chain_id: 56, height: 10, payload: \"{v1}\" }}\n\
             \x20 - {{ direction: syn, src_chain_id: 56, height: 60, payload: \"{v2}\" }}\n\
             \x20 - {{ direction: syn, src_chain_id: 56, height: 61, payload: \"{delete}\" }}\n"
        ),
    )
    .unwrap();

    let config = load_config(Some(&config_path)).unwrap();
    let script = load_script(&script_path).unwrap();
    let report = replay(&config, &script).unwrap();

    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.steps.len(), 3);
    assert!(report.steps.iter().all(|s| s.error.is_none()));
    assert_eq!(report.buckets, 1);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["steps"][1]["version"], "v2");
    assert_eq!(json["steps"][2]["events"][0]["type"], "delete_bucket");
}
