//! # Public Surface Vectors
//!
//! Fixed vectors for the pieces other crates and peer chains rely on:
//! canonical JSON of an approval-shaped message, identifier text forms and
//! a full configuration file.

use xbridge_core::{
    Address, BridgeConfig, BucketId, CanonicalBytes, ChainId, ProtocolVersion, SourceType,
};

#[test]
fn approval_shaped_message_vector() {
    let message = serde_json::json!({
        "primary_sp_approval": {"global_virtual_group_family_id": 3, "expired_height": 900},
        "creator": Address::new([0xc1; 20]),
        "bucket_name": "alpha",
        "charged_read_quota": 0,
    });
    let cb = CanonicalBytes::new(&message).unwrap();
    assert_eq!(
        std::str::from_utf8(cb.as_bytes()).unwrap(),
        concat!(
            r#"{"bucket_name":"alpha","charged_read_quota":0,"#,
            r#""creator":"0xc1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1","#,
            r#""primary_sp_approval":{"expired_height":900,"global_virtual_group_family_id":3}}"#
        )
    );
}

#[test]
fn identifier_text_forms() {
    let id: BucketId = "340282366920938463463374607431768211456".parse().unwrap();
    assert_eq!(id.to_be_bytes().len(), 17);
    assert_eq!(id.to_string(), "340282366920938463463374607431768211456");

    let addr: Address = "0X5B5B5B5B5B5B5B5B5B5B5B5B5B5B5B5B5B5B5B5B".parse().unwrap();
    assert_eq!(addr, Address::new([0x5b; 20]));
    assert!("0x5b".parse::<Address>().is_err());
}

#[test]
fn full_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridge.yaml");
    std::fs::write(
        &path,
        "channel_id: 9\n\
         upgrade:\n  v2_height: 1000\n\
         chains:\n\
         \x20 - chain_id: 97\n    source_type: BSC_CROSS_CHAIN\n\
         \x20 - chain_id: 5611\n    source_type: OP_CROSS_CHAIN\n",
    )
    .unwrap();

    let config = BridgeConfig::from_path(&path).unwrap();
    assert_eq!(config.channel_id.0, 9);
    assert_eq!(config.upgrade.version_at(999), ProtocolVersion::V1);
    assert_eq!(config.upgrade.version_at(1000), ProtocolVersion::V2);

    let registry = config.chain_registry().unwrap();
    assert_eq!(registry.source_type(ChainId(97)), Some(SourceType::BscCrossChain));
    assert_eq!(registry.source_type(ChainId(5611)), Some(SourceType::OpCrossChain));
    assert_eq!(registry.source_type(ChainId(56)), None);
}
