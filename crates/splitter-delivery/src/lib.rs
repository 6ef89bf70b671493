//! Transaction delivery module for the bridge splitter.
//!
//! This module handles the submission and monitoring of blockchain transactions.
//! Implementations sign with their own wallet; the service routes each
//! transaction to the implementation registered for its chain id.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use splitter_types::{Transaction, TransactionHash, TransactionReceipt};
use std::collections::HashMap;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when a transaction is rejected or reverts.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
	/// Error that occurs when no provider is registered for a chain.
	#[error("No provider available for chain {0}")]
	NoProviderAvailable(u64),
}

/// Trait defining the interface for transaction delivery providers.
///
/// One implementation instance serves one chain.
#[async_trait]
pub trait DeliveryInterface: Send + Sync {
	/// Signs and submits a transaction, returning its hash.
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError>;

	/// Waits until the transaction has the given number of confirmations.
	///
	/// Returns the receipt even when the transaction reverted; callers check
	/// `success`.
	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError>;

	/// Retrieves the receipt for a mined transaction.
	async fn get_receipt(&self, hash: &TransactionHash)
		-> Result<TransactionReceipt, DeliveryError>;

	/// Native currency balance of an address, in wei.
	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError>;
}

/// Service that manages transaction delivery across chains.
pub struct DeliveryService {
	/// Map of chain IDs to their corresponding delivery providers.
	providers: HashMap<u64, Box<dyn DeliveryInterface>>,
	/// Default number of confirmations required for transactions.
	min_confirmations: u64,
}

impl DeliveryService {
	pub fn new(providers: HashMap<u64, Box<dyn DeliveryInterface>>, min_confirmations: u64) -> Self {
		Self {
			providers,
			min_confirmations,
		}
	}

	fn provider(&self, chain_id: u64) -> Result<&dyn DeliveryInterface, DeliveryError> {
		self.providers
			.get(&chain_id)
			.map(|p| p.as_ref())
			.ok_or(DeliveryError::NoProviderAvailable(chain_id))
	}

	/// Delivers a transaction to the provider of its chain.
	pub async fn deliver(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		self.provider(tx.chain_id)?.submit(tx).await
	}

	/// Waits for a transaction to be confirmed with the specified number of confirmations.
	pub async fn confirm(
		&self,
		chain_id: u64,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.provider(chain_id)?
			.wait_for_confirmation(hash, confirmations)
			.await
	}

	/// Waits for a transaction with the configured number of confirmations.
	pub async fn confirm_with_default(
		&self,
		chain_id: u64,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		self.confirm(chain_id, hash, self.min_confirmations).await
	}

	/// Checks whether a mined transaction succeeded.
	pub async fn get_status(
		&self,
		chain_id: u64,
		hash: &TransactionHash,
	) -> Result<bool, DeliveryError> {
		let receipt = self.provider(chain_id)?.get_receipt(hash).await?;
		Ok(receipt.success)
	}

	/// Native balance of an address on a chain.
	pub async fn get_balance(&self, chain_id: u64, address: Address) -> Result<U256, DeliveryError> {
		self.provider(chain_id)?.get_balance(address).await
	}
}
