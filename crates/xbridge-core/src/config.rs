//! Bridge configuration.
//!
//! Describes which channel the bucket application listens on, at which
//! height the V2 package container takes effect, and which peer chains map
//! to which bucket source type. Loaded from YAML; selected fields can be
//! overridden from the environment.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{ProtocolVersion, SourceType};
use crate::identity::{ChainId, ChannelId, BUCKET_CHANNEL_ID};

/// Environment variable overriding [`UpgradeSchedule::v2_height`].
pub const ENV_V2_HEIGHT: &str = "XBRIDGE_V2_HEIGHT";

/// Environment variable overriding [`BridgeConfig::channel_id`].
pub const ENV_CHANNEL_ID: &str = "XBRIDGE_CHANNEL_ID";

/// Top-level configuration of the bucket bridge application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Channel the bucket application is registered on.
    pub channel_id: ChannelId,
    /// Protocol upgrade boundary.
    pub upgrade: UpgradeSchedule,
    /// Peer chains allowed to create, delete and mirror buckets.
    pub chains: Vec<ChainRoute>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel_id: BUCKET_CHANNEL_ID,
            upgrade: UpgradeSchedule::default(),
            chains: vec![
                ChainRoute {
                    chain_id: ChainId(56),
                    source_type: SourceType::BscCrossChain,
                },
                ChainRoute {
                    chain_id: ChainId(204),
                    source_type: SourceType::OpCrossChain,
                },
            ],
        }
    }
}

/// Height at which the current package container replaces the legacy one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpgradeSchedule {
    /// First height executing with the V2 container. `None` means the
    /// upgrade is not scheduled.
    pub v2_height: Option<u64>,
}

impl UpgradeSchedule {
    /// Whether the upgrade boundary has been crossed at `height`.
    pub fn is_upgraded(&self, height: u64) -> bool {
        matches!(self.v2_height, Some(boundary) if height >= boundary)
    }

    /// Protocol version active at `height`.
    pub fn version_at(&self, height: u64) -> ProtocolVersion {
        ProtocolVersion::from_upgraded(self.is_upgraded(height))
    }
}

/// Maps a peer chain to the source type stamped on its buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainRoute {
    /// Peer chain identifier.
    pub chain_id: ChainId,
    /// Source type of buckets created or mirrored through that chain.
    pub source_type: SourceType,
}

/// Resolved chain → source type table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainRegistry {
    routes: BTreeMap<ChainId, SourceType>,
}

impl ChainRegistry {
    /// Build a registry, rejecting duplicate chains and source types that
    /// cannot describe a cross-chain bucket.
    pub fn new(routes: &[ChainRoute]) -> Result<Self, ConfigError> {
        let mut table = BTreeMap::new();
        for route in routes {
            if matches!(
                route.source_type,
                SourceType::Origin | SourceType::MirrorPending
            ) {
                return Err(ConfigError::UnroutableSourceType {
                    chain_id: route.chain_id,
                    source_type: route.source_type,
                });
            }
            if table.insert(route.chain_id, route.source_type).is_some() {
                return Err(ConfigError::DuplicateChain(route.chain_id));
            }
        }
        Ok(Self { routes: table })
    }

    /// Source type for buckets arriving from `chain_id`, if the chain is known.
    pub fn source_type(&self, chain_id: ChainId) -> Option<SourceType> {
        self.routes.get(&chain_id).copied()
    }
}

impl BridgeConfig {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a YAML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Apply `XBRIDGE_V2_HEIGHT` and `XBRIDGE_CHANNEL_ID` from the process
    /// environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(raw) = lookup(ENV_V2_HEIGHT) {
            let raw = raw.trim();
            self.upgrade.v2_height = if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(raw.parse().map_err(|_| invalid_env(ENV_V2_HEIGHT, raw))?)
            };
        }
        if let Some(raw) = lookup(ENV_CHANNEL_ID) {
            let raw = raw.trim();
            self.channel_id = ChannelId(raw.parse().map_err(|_| invalid_env(ENV_CHANNEL_ID, raw))?);
        }
        Ok(())
    }

    /// Build the chain registry described by this configuration.
    pub fn chain_registry(&self) -> Result<ChainRegistry, ConfigError> {
        ChainRegistry::new(&self.chains)
    }
}

fn invalid_env(var: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },
    #[error("chain {0} is listed more than once")]
    DuplicateChain(ChainId),
    #[error("chain {chain_id} cannot route buckets with source type {source_type}")]
    UnroutableSourceType {
        chain_id: ChainId,
        source_type: SourceType,
    },
}
