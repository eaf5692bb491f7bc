//! Utility functions for CLI commands.

use anyhow::Context as _;
use quorum_correct::CorrectorConfig;
use quorum_voiceprint::{Client, IdentifyPolicy};
use serde::Deserialize;

use crate::Cli;

const DEFAULT_CONFIG_PATH: &str = "quorum.yaml";

/// Credentials and engine tuning, from one YAML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub credentials: Credentials,
    /// Engine tuning overrides; every field is optional.
    #[serde(default)]
    pub engine: CorrectorConfig,
    /// Decision policy for single-clip identification. The correction
    /// engine ignores this and votes in unconditional mode.
    #[serde(default)]
    pub policy: Option<IdentifyPolicy>,
}

/// Feature-search API credentials.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub app_id: String,
    pub api_key: String,
    pub api_secret: String,
    pub group_id: String,
    /// Non-default API host, mainly for regional endpoints.
    #[serde(default)]
    pub host: Option<String>,
}

/// Loads the configuration file named by `--config` (default
/// `quorum.yaml`).
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file '{}'", path))?;
    let config: Config = serde_yaml::from_str(&content)
        .with_context(|| format!("cannot parse config file '{}'", path))?;
    Ok(config)
}

/// Creates a feature-search API client from the config credentials.
pub fn create_client(config: &Config) -> anyhow::Result<Client> {
    let creds = &config.credentials;
    let mut builder = Client::builder(&creds.app_id)
        .api_key(&creds.api_key)
        .api_secret(&creds.api_secret)
        .group_id(&creds.group_id);

    if let Some(host) = &creds.host {
        builder = builder.host(host);
    }

    Ok(builder.build()?)
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    if cli.verbose {
        eprintln!("[verbose] {}", msg);
    }
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config: Config = serde_yaml::from_str(
            "credentials:\n  app_id: app\n  api_key: key\n  api_secret: secret\n  group_id: room\n",
        )
        .unwrap();
        assert_eq!(config.credentials.app_id, "app");
        assert_eq!(config.credentials.host, None);
        assert_eq!(config.engine, CorrectorConfig::default());
        assert!(config.policy.is_none());
    }

    #[test]
    fn parses_engine_and_policy_overrides() {
        let config: Config = serde_yaml::from_str(
            "credentials:\n  app_id: app\n  api_key: key\n  api_secret: secret\n  group_id: room\n  host: api.example.com\nengine:\n  sample_count: 3\n  seed: 99\npolicy:\n  confidence_threshold: 0.8\n  min_accept_score: 0.5\n  gap_threshold: 0.1\n  top_k: 3\n",
        )
        .unwrap();
        assert_eq!(config.credentials.host.as_deref(), Some("api.example.com"));
        assert_eq!(config.engine.sample_count, 3);
        assert_eq!(config.engine.seed, Some(99));
        // Untouched knobs keep their defaults.
        assert_eq!(config.engine.max_retries, 5);
        let policy = config.policy.unwrap();
        assert!((policy.confidence_threshold - 0.8).abs() < 1e-6);
        assert_eq!(policy.top_k, 3);
    }
}
