//! Configuration for the SolCourier SDK
//!
//! Every endpoint and credential is injected through this module; nothing in
//! the operational code carries a literal URL or key. Defaults point at
//! devnet. With the `config-file` feature, values are layered: defaults, then
//! an optional TOML file, then `SOLCOURIER_*` environment variables.

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::transfer::RetryPolicy;

/// SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Websocket endpoint for signature subscriptions
    pub ws_url: String,
    /// Commitment level: "processed", "confirmed", or "finalized"
    pub commitment: String,
    /// Default deadline for confirmation waits, in seconds
    pub confirm_timeout_secs: u64,
    /// Submission retry policy
    pub retry: RetryPolicy,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            ws_url: "wss://api.devnet.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            confirm_timeout_secs: crate::DEFAULT_CONFIRM_TIMEOUT_SECS,
            retry: RetryPolicy::default(),
        }
    }
}

impl CourierConfig {
    /// Parse the configured commitment level
    pub fn commitment_config(&self) -> Result<CommitmentConfig, ConfigError> {
        let commitment = CommitmentLevel::from_str(&self.commitment)
            .map_err(|_| ConfigError::Commitment(self.commitment.clone()))?;
        Ok(CommitmentConfig { commitment })
    }

    /// Default confirmation deadline as a [`Duration`]
    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    /// Load configuration from defaults, an optional TOML file, and
    /// `SOLCOURIER_*` environment variables (later sources win).
    ///
    /// With `path = None` a `solcourier.toml` next to the process is picked
    /// up when present. Nested fields use `__` in the environment, e.g.
    /// `SOLCOURIER_RETRY__MAX_ATTEMPTS=5`.
    #[cfg(feature = "config-file")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&CourierConfig::default())?);

        builder = match path {
            Some(path) => builder.add_source(config::File::with_name(path)),
            None => builder.add_source(config::File::with_name("solcourier").required(false)),
        };

        builder = builder.add_source(
            config::Environment::with_prefix("SOLCOURIER").separator("__"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}

/// Error types for configuration handling
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown commitment level: {0}")]
    Commitment(String),

    #[cfg(feature = "config-file")]
    #[error("configuration error: {0}")]
    File(#[from] config::ConfigError),
}
