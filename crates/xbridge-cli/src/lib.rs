//! # xbridge-cli — Bucket Bridge Command-Line Interface
//!
//! Operator and developer tooling around the bucket application.
//!
//! ## Subcommands
//!
//! - `xbridge inspect`: decode an envelope and print the package as JSON.
//! - `xbridge encode`: build envelope hex for a sample package.
//! - `xbridge replay`: run a script of packages through the router against
//!   an in-memory ledger.
//!
//! ```bash
//! xbridge encode create-syn --creator 0x…c1 --name alpha --primary-sp 0x…5b --signature ab
//! xbridge inspect --direction syn --payload 0201…
//! xbridge replay --script steps.yaml --config bridge.yaml
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the work each subcommand does.
//! - Bridge semantics live in `xbridge-bucket`; nothing here re-implements
//!   them.

pub mod encode;
pub mod inspect;
pub mod replay;

use std::path::Path;

use anyhow::{Context, Result};
use xbridge_core::BridgeConfig;

/// Load the bridge configuration from `path` (or defaults) and apply
/// environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<BridgeConfig> {
    let mut config = match path {
        Some(path) => BridgeConfig::from_path(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => BridgeConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("invalid environment override")?;
    Ok(config)
}

/// Parse hex with an optional `0x` prefix. Whitespace is ignored.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.split_whitespace().collect();
    let digits = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    hex::decode(digits).with_context(|| format!("invalid hex: {text:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_prefix_and_spaces() {
        assert_eq!(parse_hex("0x01 02\n0a").unwrap(), vec![1, 2, 10]);
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
        assert!(parse_hex("0xzz").is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.yaml");
        std::fs::write(&path, "upgrade:\n  v2_height: 12\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert!(config.upgrade.v2_height.is_some());
    }

    #[test]
    fn load_config_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.yaml"))).is_err());
    }
}
