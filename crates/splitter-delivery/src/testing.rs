//! In-memory delivery for tests.
//!
//! `RecordingDelivery` accepts every transaction, records what happened in
//! order and can be told to reject or revert calls by function selector.

use crate::{DeliveryError, DeliveryInterface};
use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use splitter_types::{Transaction, TransactionHash, TransactionReceipt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Something the delivery layer was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryEvent {
	Submitted(Transaction),
	Confirmed(TransactionHash),
}

/// Shared, ordered record of delivery events.
#[derive(Debug, Clone, Default)]
pub struct DeliveryLog {
	events: Arc<Mutex<Vec<DeliveryEvent>>>,
	confirmations: Arc<Mutex<Vec<u64>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DeliveryLog {
	pub fn events(&self) -> Vec<DeliveryEvent> {
		lock(&self.events).clone()
	}

	/// Submitted transactions in submission order.
	pub fn submitted(&self) -> Vec<Transaction> {
		lock(&self.events)
			.iter()
			.filter_map(|event| match event {
				DeliveryEvent::Submitted(tx) => Some(tx.clone()),
				DeliveryEvent::Confirmed(_) => None,
			})
			.collect()
	}

	/// Confirmation counts passed to `wait_for_confirmation`, in call order.
	pub fn confirmations_requested(&self) -> Vec<u64> {
		lock(&self.confirmations).clone()
	}

	fn push(&self, event: DeliveryEvent) -> usize {
		let mut events = lock(&self.events);
		events.push(event);
		events.len()
	}
}

/// Delivery fake that never touches a network.
#[derive(Default)]
pub struct RecordingDelivery {
	log: DeliveryLog,
	rejected: Vec<[u8; 4]>,
	reverted: Vec<[u8; 4]>,
	outcomes: Mutex<HashMap<Vec<u8>, bool>>,
	balance: U256,
}

impl RecordingDelivery {
	pub fn new() -> Self {
		Self::default()
	}

	/// Handle onto the event log that stays valid after the fake is boxed.
	pub fn log(&self) -> DeliveryLog {
		self.log.clone()
	}

	/// Fails submission of calls starting with `selector`.
	pub fn reject_selector(mut self, selector: [u8; 4]) -> Self {
		self.rejected.push(selector);
		self
	}

	/// Mines calls starting with `selector` with a failed status.
	pub fn revert_selector(mut self, selector: [u8; 4]) -> Self {
		self.reverted.push(selector);
		self
	}

	pub fn with_balance(mut self, balance: U256) -> Self {
		self.balance = balance;
		self
	}

	fn matches(selectors: &[[u8; 4]], tx: &Transaction) -> bool {
		tx.data.len() >= 4 && selectors.iter().any(|s| tx.data[..4] == s[..])
	}
}

#[async_trait]
impl DeliveryInterface for RecordingDelivery {
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		if Self::matches(&self.rejected, &tx) {
			return Err(DeliveryError::TransactionFailed(
				"execution reverted".to_string(),
			));
		}
		let success = !Self::matches(&self.reverted, &tx);

		let sequence = self.log.push(DeliveryEvent::Submitted(tx)) as u64;
		let mut hash = vec![0u8; 32];
		hash[24..].copy_from_slice(&sequence.to_be_bytes());

		lock(&self.outcomes).insert(hash.clone(), success);
		Ok(TransactionHash(hash))
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
	) -> Result<TransactionReceipt, DeliveryError> {
		lock(&self.log.confirmations).push(confirmations);
		let receipt = self.get_receipt(hash).await?;
		self.log.push(DeliveryEvent::Confirmed(hash.clone()));
		Ok(receipt)
	}

	async fn get_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, DeliveryError> {
		let success = lock(&self.outcomes)
			.get(&hash.0)
			.copied()
			.ok_or_else(|| DeliveryError::Network(format!("Transaction {} not found", hash)))?;

		Ok(TransactionReceipt {
			hash: hash.clone(),
			block_number: 1,
			success,
		})
	}

	async fn get_balance(&self, _address: Address) -> Result<U256, DeliveryError> {
		Ok(self.balance)
	}
}
