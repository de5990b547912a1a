// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! SDK configuration.
//!
//! Read from `~/.shroud/config.json`; a missing file yields the defaults.
//! `SHROUD_INDEXER_URL` and `SHROUD_PROVER_URL` override the file, the latter
//! switching the prover backend to HTTP.
//!
//! ```json
//! {
//!   "indexer_url": "http://localhost:3000",
//!   "pools": [1],
//!   "prover": { "kind": "command", "program": "shroud-prover", "args": [] },
//!   "proof_layouts": { "transfer": { "a": 48, "b": 96, "c": 48 } }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shroud_types::PoolId;

use crate::error::{SdkError, SdkResult};
use crate::prover::{CircuitId, CommandProver, Groth16Proof, HttpProver, ProofLayouts, Prover, SignalVector};

pub const ENV_INDEXER_URL: &str = "SHROUD_INDEXER_URL";
pub const ENV_PROVER_URL: &str = "SHROUD_PROVER_URL";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProverConfig {
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    Http {
        url: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SdkConfig {
    pub indexer_url: String,
    #[serde(default = "default_pools")]
    pub pools: Vec<PoolId>,
    pub prover: ProverConfig,
    #[serde(default)]
    pub proof_layouts: ProofLayouts,
}

fn default_pools() -> Vec<PoolId> {
    vec![1]
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            indexer_url: "http://localhost:3000".into(),
            pools: default_pools(),
            prover: ProverConfig::Command {
                program: "shroud-prover".into(),
                args: Vec::new(),
            },
            proof_layouts: ProofLayouts::default(),
        }
    }
}

impl SdkConfig {
    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_INDEXER_URL).filter(|v| !v.is_empty()) {
            tracing::debug!(%url, "indexer url from environment");
            self.indexer_url = url;
        }
        if let Some(url) = lookup(ENV_PROVER_URL).filter(|v| !v.is_empty()) {
            tracing::debug!(%url, "prover url from environment");
            self.prover = ProverConfig::Http { url };
        }
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.indexer_url.trim().is_empty() {
            return Err(SdkError::Config("indexer_url is empty".into()));
        }
        if self.pools.is_empty() {
            return Err(SdkError::Config("at least one pool is required".into()));
        }
        match &self.prover {
            ProverConfig::Command { program, .. } if program.trim().is_empty() => {
                Err(SdkError::Config("prover program is empty".into()))
            }
            ProverConfig::Http { url } if url.trim().is_empty() => {
                Err(SdkError::Config("prover url is empty".into()))
            }
            _ => Ok(()),
        }
    }

    pub fn build_prover(&self) -> ConfiguredProver {
        match &self.prover {
            ProverConfig::Command { program, args } => {
                ConfiguredProver::Command(CommandProver::new(program.clone(), args.clone()))
            }
            ProverConfig::Http { url } => ConfiguredProver::Http(HttpProver::new(url)),
        }
    }
}

/// Prover selected at runtime from [`ProverConfig`].
pub enum ConfiguredProver {
    Command(CommandProver),
    Http(HttpProver),
}

impl Prover for ConfiguredProver {
    async fn prove(&self, circuit: CircuitId, signals: &SignalVector) -> SdkResult<Groth16Proof> {
        match self {
            Self::Command(p) => p.prove(circuit, signals).await,
            Self::Http(p) => p.prove(circuit, signals).await,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".shroud").join("config.json"))
}

/// Config file plus process environment.
pub fn load_config() -> Result<SdkConfig> {
    let mut config = load_config_from(&config_path()?)?;
    config.apply_overrides(|k| std::env::var(k).ok());
    Ok(config)
}

pub fn load_config_from(path: &Path) -> Result<SdkConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SdkConfig::default());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read config at {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("invalid config JSON at {}", path.display()))
}

pub fn save_config_to(path: &Path, config: &SdkConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)
        .with_context(|| format!("cannot write config at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prover::ProofLayout;
    use std::collections::HashMap;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, SdkConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn parses_documented_format() {
        let json = r#"{
            "indexer_url": "http://indexer:3000",
            "pools": [1, 2],
            "prover": { "kind": "http", "url": "http://prover:8080" },
            "proof_layouts": { "transfer": { "a": 48, "b": 96, "c": 48 } }
        }"#;
        let config: SdkConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.pools, vec![1, 2]);
        assert_eq!(
            config.prover,
            ProverConfig::Http {
                url: "http://prover:8080".into()
            }
        );
        assert_eq!(
            config.proof_layouts.get(CircuitId::Transfer),
            ProofLayout::BLS12_381_COMPRESSED
        );
        assert_eq!(
            config.proof_layouts.get(CircuitId::Vote),
            ProofLayout::BLS12_381_UNCOMPRESSED
        );
        assert!(matches!(config.build_prover(), ConfiguredProver::Http(_)));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("config.json");
        let mut config = SdkConfig::default();
        config.pools = vec![3];
        config.proof_layouts.set(CircuitId::Order, ProofLayout::BN254_COMPRESSED);
        save_config_to(&path, &config).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_INDEXER_URL, "http://other:1"),
            (ENV_PROVER_URL, "http://prover:2"),
        ]
        .into_iter()
        .collect();
        let mut config = SdkConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.indexer_url, "http://other:1");
        assert_eq!(
            config.prover,
            ProverConfig::Http {
                url: "http://prover:2".into()
            }
        );
    }

    #[test]
    fn empty_override_ignored() {
        let mut config = SdkConfig::default();
        config.apply_overrides(|_| Some(String::new()));
        assert_eq!(config, SdkConfig::default());
    }

    #[test]
    fn validation() {
        let mut config = SdkConfig::default();
        config.pools.clear();
        assert!(matches!(config.validate(), Err(SdkError::Config(_))));
        let config = SdkConfig {
            prover: ProverConfig::Http { url: " ".into() },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SdkError::Config(_))));
    }

    #[test]
    fn invalid_json_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config JSON"));
    }
}
