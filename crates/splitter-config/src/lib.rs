//! Configuration module for the bridge splitter.
//!
//! This module provides structures and utilities for managing splitter
//! configuration. It supports loading configuration from TOML files and
//! validates that all required values are properly set.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["networks.toml", "account.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)
//! - Only the main file may include others

mod loader;

pub use loader::ConfigLoader;

use alloy_primitives::Address;
use regex::Regex;
use serde::{Deserialize, Serialize};
use splitter_types::{Mode, NetworkConfig, NetworksConfig};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the bridge splitter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Contract addresses, network selection and leg mode.
	pub splitter: SplitterConfig,
	/// Networks keyed by short name.
	pub networks: NetworksConfig,
	/// Transaction delivery settings.
	#[serde(default)]
	pub delivery: DeliveryConfig,
	/// Account used to sign, pay and receive refunds.
	pub account: AccountConfig,
}

/// Core settings of a splitter run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SplitterConfig {
	/// Identifier used in logs.
	pub id: String,
	/// Number of legs to build.
	#[serde(default)]
	pub mode: Mode,
	/// Key into `[networks]` naming the source chain.
	pub network: String,
	/// HecBridgeSplitter contract: call target and token spender.
	pub splitter_address: Address,
	/// Downstream bridge (diamond) contract the splitter forwards to.
	///
	/// A quoted destination `callTo` equal to this address is not a real
	/// destination call.
	pub bridge_address: Address,
}

/// Configuration for transaction delivery.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
	/// Confirmations to wait for on each transaction.
	#[serde(default = "default_confirmations")]
	pub min_confirmations: u64,
	/// Provider polling interval in seconds.
	#[serde(default = "default_poll_interval_seconds")]
	pub poll_interval_seconds: u64,
}

impl Default for DeliveryConfig {
	fn default() -> Self {
		Self {
			min_confirmations: default_confirmations(),
			poll_interval_seconds: default_poll_interval_seconds(),
		}
	}
}

fn default_confirmations() -> u64 {
	1
}

fn default_poll_interval_seconds() -> u64 {
	7
}

/// Configuration for account management.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of account implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

impl AccountConfig {
	/// Raw TOML table of the primary implementation.
	pub fn primary_config(&self) -> Option<&toml::Value> {
		self.implementations.get(&self.primary)
	}
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives and
	/// resolving environment variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = ConfigLoader::new(base_dir);
		let file_name = path
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path.display())))?;
		loader.load_config(file_name).await
	}

	/// Network selected by `splitter.network`.
	pub fn network(&self) -> Result<&NetworkConfig, ConfigError> {
		self.networks.get(&self.splitter.network).ok_or_else(|| {
			ConfigError::Validation(format!(
				"Network '{}' not found in networks configuration",
				self.splitter.network
			))
		})
	}

	/// Validates the configuration to ensure all required fields are properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.splitter.id.is_empty() {
			return Err(ConfigError::Validation("Splitter ID cannot be empty".into()));
		}
		if self.splitter.splitter_address.is_zero() {
			return Err(ConfigError::Validation(
				"splitter_address cannot be the zero address".into(),
			));
		}

		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}
		for (name, network) in &self.networks {
			if network.chain_id == 0 {
				return Err(ConfigError::Validation(format!(
					"Network '{}' must have a non-zero chain_id",
					name
				)));
			}
			if network.rpc_url.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network '{}' must have rpc_url",
					name
				)));
			}
		}
		self.network()?;

		if self.delivery.min_confirmations == 0 {
			return Err(ConfigError::Validation(
				"min_confirmations must be at least 1".into(),
			));
		}
		if self.delivery.min_confirmations > 100 {
			return Err(ConfigError::Validation(
				"min_confirmations cannot exceed 100".into(),
			));
		}
		if self.delivery.poll_interval_seconds == 0 {
			return Err(ConfigError::Validation(
				"poll_interval_seconds must be greater than 0".into(),
			));
		}

		if self.account.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Account primary implementation cannot be empty".into(),
			));
		}
		if self.account.primary_config().is_none() {
			return Err(ConfigError::Validation(format!(
				"Primary account '{}' not found in implementations",
				self.account.primary
			)));
		}

		Ok(())
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	const BASE_CONFIG: &str = r#"
[splitter]
id = "hec-bridge-ftm"
mode = "multi"
network = "ftm"
splitter_address = "0x19Fc4D72A9D400A19540f41D3728027B89f5Ccd0"
bridge_address = "0x1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE"

[networks.ftm]
chain_id = 250
rpc_url = "http://localhost:8545"

[account]
primary = "local"
[account.implementations.local]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("TEST_SPLITTER_HOST", "localhost");
		std::env::set_var("TEST_SPLITTER_PORT", "8545");

		let input = "rpc_url = \"http://${TEST_SPLITTER_HOST}:${TEST_SPLITTER_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "rpc_url = \"http://localhost:8545\"");

		std::env::remove_var("TEST_SPLITTER_HOST");
		std::env::remove_var("TEST_SPLITTER_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${MISSING_SPLITTER_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${MISSING_SPLITTER_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("MISSING_SPLITTER_VAR"));
	}

	#[test]
	fn test_parse_config() {
		let config: Config = BASE_CONFIG.parse().unwrap();
		assert_eq!(config.splitter.id, "hec-bridge-ftm");
		assert_eq!(config.splitter.mode, Mode::Multi);
		assert_eq!(
			config.splitter.bridge_address,
			address!("1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE")
		);
		assert_eq!(config.network().unwrap().chain_id, 250);
		// Defaults
		assert_eq!(config.delivery.min_confirmations, 1);
		assert_eq!(config.delivery.poll_interval_seconds, 7);
	}

	#[test]
	fn test_mode_defaults_to_single() {
		let config: Config = BASE_CONFIG.replace("mode = \"multi\"\n", "").parse().unwrap();
		assert_eq!(config.splitter.mode, Mode::Single);
	}

	#[test]
	fn test_invalid_mode_rejected() {
		let result: Result<Config, _> = BASE_CONFIG.replace("\"multi\"", "\"triple\"").parse();
		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}

	#[test]
	fn test_unknown_network_rejected() {
		let result: Result<Config, _> = BASE_CONFIG
			.replace("network = \"ftm\"", "network = \"bsc\"")
			.parse();
		let err = result.unwrap_err().to_string();
		assert!(err.contains("Network 'bsc' not found"));
	}

	#[test]
	fn test_confirmations_bounds() {
		let config = format!("{}\n[delivery]\nmin_confirmations = 0\n", BASE_CONFIG);
		let result: Result<Config, _> = config.parse();
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("min_confirmations must be at least 1"));
	}

	#[test]
	fn test_missing_primary_account() {
		let result: Result<Config, _> = BASE_CONFIG
			.replace("primary = \"local\"", "primary = \"kms\"")
			.parse();
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Primary account 'kms' not found"));
	}

	#[test]
	fn test_config_with_env_vars() {
		std::env::set_var("TEST_SPLITTER_RPC", "http://rpc.ftm.tools");

		let config: Config = BASE_CONFIG
			.replace("http://localhost:8545", "${TEST_SPLITTER_RPC}")
			.parse()
			.unwrap();
		assert_eq!(config.network().unwrap().rpc_url, "http://rpc.ftm.tools");

		std::env::remove_var("TEST_SPLITTER_RPC");
	}
}
