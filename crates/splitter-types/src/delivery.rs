//! Transaction delivery types for the splitter system.
//!
//! This module defines the transaction handed to the delivery layer and the
//! hashes and receipts it hands back.

use alloy_primitives::{Address, Bytes, U256};
use alloy_rpc_types::TransactionRequest;
use std::fmt;

use crate::with_0x_prefix;

/// Blockchain transaction hash representation.
///
/// Stores transaction hashes as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", with_0x_prefix(&hex::encode(&self.0)))
	}
}

/// Transaction receipt containing execution details.
///
/// Provides information about a transaction after it has been included in a block,
/// including its success status and block number.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
}

/// An unsigned transaction ready for submission.
///
/// Signing happens inside the delivery implementation; everything left as
/// `None` is filled in by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	/// Recipient contract. `None` would be a contract creation.
	pub to: Option<Address>,
	/// ABI-encoded calldata.
	pub data: Bytes,
	/// Native currency attached to the call, in wei.
	pub value: U256,
	/// Chain the transaction is meant for.
	pub chain_id: u64,
	pub nonce: Option<u64>,
	pub gas_limit: Option<u64>,
	pub max_fee_per_gas: Option<u128>,
	pub max_priority_fee_per_gas: Option<u128>,
}

impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		let mut request = TransactionRequest::default()
			.value(tx.value)
			.input(tx.data.into());
		if let Some(to) = tx.to {
			request = request.to(to);
		}
		request.chain_id = Some(tx.chain_id);
		request.nonce = tx.nonce;
		request.gas = tx.gas_limit;
		request.max_fee_per_gas = tx.max_fee_per_gas;
		request.max_priority_fee_per_gas = tx.max_priority_fee_per_gas;
		request
	}
}
