//! Local private-key account.
//!
//! Configuration:
//!
//! ```toml
//! [account.implementations.local]
//! private_key = "${PRIVATE_KEY}"
//! ```

use crate::{AccountError, AccountInterface};
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use splitter_types::{ConfigSchema, Field, FieldType, Schema, SecretString, ValidationError};

/// Registry name of this implementation.
pub const NAME: &str = "local";

/// Account backed by an in-memory secp256k1 key.
pub struct LocalWallet {
	signer: PrivateKeySigner,
	private_key: SecretString,
}

impl LocalWallet {
	/// Parses a hex private key, with or without `0x` prefix.
	pub fn new(private_key: SecretString) -> Result<Self, AccountError> {
		let signer: PrivateKeySigner = private_key.with_exposed(|key| {
			key.parse()
				.map_err(|e| AccountError::InvalidKey(format!("Invalid private key format: {}", e)))
		})?;

		Ok(Self {
			signer,
			private_key,
		})
	}
}

/// Configuration schema for the local account.
pub struct LocalWalletSchema;

impl ConfigSchema for LocalWalletSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("private_key", FieldType::String).with_validator(|value| {
				let key = value.as_str().unwrap_or_default();
				let hex = key.strip_prefix("0x").unwrap_or(key);
				if hex.len() != 64 {
					return Err("Private key must be 64 hex characters".to_string());
				}
				if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
					return Err("Private key must be hex encoded".to_string());
				}
				Ok(())
			})],
			vec![],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl AccountInterface for LocalWallet {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	fn get_private_key(&self) -> SecretString {
		self.private_key.clone()
	}
}

/// Factory function to create the local account from its TOML table.
pub fn create_account(config: &toml::Value) -> Result<Box<dyn AccountInterface>, AccountError> {
	LocalWalletSchema
		.validate(config)
		.map_err(|e| AccountError::InvalidConfig(e.to_string()))?;

	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.ok_or_else(|| AccountError::InvalidConfig("private_key is required".to_string()))?;

	Ok(Box::new(LocalWallet::new(SecretString::from(private_key))?))
}
