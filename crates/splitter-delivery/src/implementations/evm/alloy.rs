//! Alloy-based EVM delivery.
//!
//! Submits transactions through an HTTP JSON-RPC provider whose wallet signs
//! them, and polls for receipts until the requested confirmation depth.

use crate::{DeliveryError, DeliveryInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, FixedBytes, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use splitter_types::{
	NetworkConfig, SecretString, Transaction as SplitterTransaction, TransactionHash,
	TransactionReceipt,
};
use std::sync::Arc;
use std::time::Duration;

/// Seconds allowed per requested confirmation before giving up.
const SECONDS_PER_CONFIRMATION: u64 = 20;
/// Upper bound on any confirmation wait.
const MAX_CONFIRMATION_TIMEOUT_SECONDS: u64 = 3600;

/// Alloy-based EVM delivery implementation for a single network.
pub struct AlloyDelivery {
	chain_id: u64,
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
	poll_interval: Duration,
}

impl AlloyDelivery {
	/// Creates a provider for `network` that signs with `signer`.
	pub fn new(
		network: &NetworkConfig,
		signer: PrivateKeySigner,
		poll_interval: Duration,
	) -> Result<Self, DeliveryError> {
		let url: reqwest::Url = network.rpc_url.parse().map_err(|e| {
			DeliveryError::Network(format!(
				"Invalid RPC URL for chain {}: {}",
				network.chain_id, e
			))
		})?;

		let chain_signer = signer.with_chain_id(Some(network.chain_id));
		let wallet = EthereumWallet::from(chain_signer);

		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(wallet)
			.on_http(url);

		provider.client().set_poll_interval(poll_interval);

		Ok(Self {
			chain_id: network.chain_id,
			provider: Arc::new(provider),
			poll_interval,
		})
	}

	fn to_receipt(receipt: &alloy_rpc_types::TransactionReceipt) -> TransactionReceipt {
		TransactionReceipt {
			hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
			block_number: receipt.block_number.unwrap_or(0),
			success: receipt.status(),
		}
	}
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	async fn submit(&self, tx: SplitterTransaction) -> Result<TransactionHash, DeliveryError> {
		if tx.chain_id != self.chain_id {
			return Err(DeliveryError::NoProviderAvailable(tx.chain_id));
		}

		let request: TransactionRequest = tx.into();

		// The provider's wallet signs
		let pending_tx = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| DeliveryError::TransactionFailed(format!("Failed to send transaction: {}", e)))?;

		let hash = TransactionHash(pending_tx.tx_hash().0.to_vec());
		tracing::info!(tx_hash = %hash, chain_id = self.chain_id, "Submitted transaction");

		Ok(hash)
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = FixedBytes::<32>::try_from(hash.0.as_slice())
			.map_err(|_| DeliveryError::Network(format!("Invalid transaction hash {}", hash)))?;

		let timeout_seconds = (confirmations * SECONDS_PER_CONFIRMATION)
			.max(SECONDS_PER_CONFIRMATION)
			.min(MAX_CONFIRMATION_TIMEOUT_SECONDS);
		let max_wait_time = Duration::from_secs(timeout_seconds);
		let start_time = tokio::time::Instant::now();

		tracing::info!(
			tx_hash = %hash,
			"Waiting for {} confirmations (timeout: {}s)",
			confirmations,
			timeout_seconds
		);

		loop {
			if start_time.elapsed() > max_wait_time {
				return Err(DeliveryError::Network(format!(
					"Timeout waiting for {} confirmations after {} seconds",
					confirmations, timeout_seconds
				)));
			}

			let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					// Not mined yet
					tokio::time::sleep(self.poll_interval).await;
					continue;
				},
				Err(e) => {
					return Err(DeliveryError::Network(format!(
						"Failed to get receipt: {}",
						e
					)));
				},
			};

			let current_block = self.provider.get_block_number().await.map_err(|e| {
				DeliveryError::Network(format!("Failed to get block number: {}", e))
			})?;

			// The inclusion block counts as the first confirmation
			let tx_block = receipt.block_number.unwrap_or(current_block);
			let current_confirmations = current_block.saturating_sub(tx_block) + 1;

			if current_confirmations >= confirmations {
				return Ok(Self::to_receipt(&receipt));
			}

			tracing::debug!(
				"Waiting for {} more confirmations...",
				confirmations.saturating_sub(current_confirmations)
			);

			tokio::time::sleep(self.poll_interval).await;
		}
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = FixedBytes::<32>::try_from(hash.0.as_slice())
			.map_err(|_| DeliveryError::Network(format!("Invalid transaction hash {}", hash)))?;

		match self.provider.get_transaction_receipt(tx_hash).await {
			Ok(Some(receipt)) => Ok(Self::to_receipt(&receipt)),
			Ok(None) => Err(DeliveryError::Network(format!(
				"Transaction not found on chain {}",
				self.chain_id
			))),
			Err(e) => Err(DeliveryError::Network(format!(
				"Failed to get receipt on chain {}: {}",
				self.chain_id, e
			))),
		}
	}

	async fn get_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		self.provider
			.get_balance(address)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get balance: {}", e)))
	}
}

/// Factory function to create an HTTP-based delivery provider.
///
/// # Parameters
/// - `network`: Network the provider connects to
/// - `private_key`: Key the provider's wallet signs with
/// - `poll_interval`: Interval between receipt polls
pub fn create_http_delivery(
	network: &NetworkConfig,
	private_key: &SecretString,
	poll_interval: Duration,
) -> Result<Box<dyn DeliveryInterface>, DeliveryError> {
	let signer: PrivateKeySigner = private_key.with_exposed(|key| {
		key.parse()
			.map_err(|_| DeliveryError::Network("Invalid private key format".to_string()))
	})?;

	Ok(Box::new(AlloyDelivery::new(network, signer, poll_interval)?))
}
