//! Account management module for the bridge splitter.
//!
//! The account is the token holder: it signs both the allowance and the
//! bridge transaction, pays the attached native value and receives Stargate
//! refunds.

use alloy_primitives::Address;
use async_trait::async_trait;
use splitter_types::SecretString;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when the implementation configuration is invalid.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
	/// Error that occurs when no implementation is registered under a name.
	#[error("Unknown account implementation: {0}")]
	UnknownImplementation(String),
}

/// An account that can prove its address and hand its key to a signer.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Retrieves the address associated with this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Returns the private key as a SecretString with 0x prefix.
	///
	/// Delivery implementations build their signing wallet from it.
	fn get_private_key(&self) -> SecretString;
}

/// Type alias for account factory functions.
pub type AccountFactory = fn(&toml::Value) -> Result<Box<dyn AccountInterface>, AccountError>;

/// Get all registered account implementations as (name, factory) pairs.
pub fn get_all_implementations() -> Vec<(&'static str, AccountFactory)> {
	vec![(
		implementations::local::NAME,
		implementations::local::create_account,
	)]
}

/// Service that manages account operations.
pub struct AccountService {
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Builds the service from the named implementation and its TOML table.
	pub fn from_config(name: &str, config: &toml::Value) -> Result<Self, AccountError> {
		let factory = get_all_implementations()
			.into_iter()
			.find(|(registered, _)| *registered == name)
			.map(|(_, factory)| factory)
			.ok_or_else(|| AccountError::UnknownImplementation(name.to_string()))?;

		Ok(Self::new(factory(config)?))
	}

	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	pub fn get_private_key(&self) -> SecretString {
		self.implementation.get_private_key()
	}
}
