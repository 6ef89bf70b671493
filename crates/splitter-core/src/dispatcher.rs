//! Call assembly and dispatch.
//!
//! A `BridgePayload` is the complete, encoded intent of one run: the leg set,
//! the entry point it selects, the native value and the allowance the splitter
//! needs first. The `Dispatcher` submits the allowance, waits for it, then
//! submits the bridge call.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use splitter_delivery::DeliveryService;
use splitter_types::{Mode, Transaction, TransactionHash};
use std::fmt;
use std::sync::Arc;

use crate::abi::{IHecBridgeSplitter, IERC20};
use crate::fees;
use crate::interpreter::InterpretedRoute;
use crate::normalizer::{self, LegSet, PayloadError};
use crate::{PipelineConfig, SplitterError};

/// Gas limit for ERC-20 approvals.
const APPROVAL_GAS_LIMIT: u64 = 100_000;

/// Splitter function a payload calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
	StartBridge,
	SwapAndStartBridge,
}

impl EntryPoint {
	pub fn select(has_source_swaps: bool) -> Self {
		if has_source_swaps {
			EntryPoint::SwapAndStartBridge
		} else {
			EntryPoint::StartBridge
		}
	}

	pub fn selector(&self) -> [u8; 4] {
		match self {
			EntryPoint::StartBridge => IHecBridgeSplitter::startBridgeTokensViaStargateCall::SELECTOR,
			EntryPoint::SwapAndStartBridge => {
				IHecBridgeSplitter::swapAndStartBridgeTokensViaStargateCall::SELECTOR
			},
		}
	}
}

impl fmt::Display for EntryPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EntryPoint::StartBridge => write!(f, "startBridgeTokensViaStargate"),
			EntryPoint::SwapAndStartBridge => write!(f, "swapAndStartBridgeTokensViaStargate"),
		}
	}
}

/// ERC-20 allowance granted to the splitter before bridging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
	pub token: Address,
	pub spender: Address,
	pub amount: U256,
}

impl Approval {
	pub fn calldata(&self) -> Bytes {
		IERC20::approveCall {
			spender: self.spender,
			amount: self.amount,
		}
		.abi_encode()
		.into()
	}
}

/// Everything needed to execute one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgePayload {
	pub legs: LegSet,
	pub has_source_swaps: bool,
	/// Native value attached to the bridge call.
	pub total_fee: U256,
	/// `None` for native-currency routes.
	pub approval: Option<Approval>,
}

impl BridgePayload {
	/// Normalizes `route` and derives the fee and allowance for it.
	pub fn build(
		route: &InterpretedRoute,
		mode: Mode,
		refund_address: Address,
		splitter_address: Address,
	) -> Result<Self, PayloadError> {
		let legs = normalizer::normalize(route, mode, refund_address)?;
		let total_fee = fees::total_fee(&legs.fees)?;

		let approval = if route.is_native_from {
			None
		} else {
			Some(Approval {
				token: route.bridge.sending_asset_id,
				spender: splitter_address,
				amount: fees::approval_amount(&legs.bridge_datas)?,
			})
		};

		Ok(Self {
			legs,
			has_source_swaps: route.has_source_swaps,
			total_fee,
			approval,
		})
	}

	pub fn entry_point(&self) -> EntryPoint {
		EntryPoint::select(self.has_source_swaps)
	}

	/// ABI-encoded call to the selected entry point.
	pub fn calldata(&self) -> Result<Bytes, PayloadError> {
		let legs = &self.legs;
		let encoded = match self.entry_point() {
			EntryPoint::StartBridge => IHecBridgeSplitter::startBridgeTokensViaStargateCall {
				bridgeDatas: legs.bridge_datas.clone(),
				stargateDatas: legs.stargate_datas.clone(),
			}
			.abi_encode(),
			EntryPoint::SwapAndStartBridge => {
				let swap_datas = legs.swap_datas.clone().ok_or(PayloadError::MissingSwapData)?;
				IHecBridgeSplitter::swapAndStartBridgeTokensViaStargateCall {
					bridgeDatas: legs.bridge_datas.clone(),
					swapDatas: swap_datas,
					stargateDatas: legs.stargate_datas.clone(),
					fees: legs.fees.clone(),
				}
				.abi_encode()
			},
		};
		Ok(encoded.into())
	}
}

/// Submits payloads on the configured chain.
pub struct Dispatcher {
	delivery: Arc<DeliveryService>,
	chain_id: u64,
	splitter_address: Address,
	min_confirmations: u64,
}

impl Dispatcher {
	pub fn new(delivery: Arc<DeliveryService>, config: &PipelineConfig) -> Self {
		Self {
			delivery,
			chain_id: config.chain_id,
			splitter_address: config.splitter_address,
			min_confirmations: config.min_confirmations,
		}
	}

	pub fn approval_transaction(&self, approval: &Approval) -> Transaction {
		Transaction {
			to: Some(approval.token),
			data: approval.calldata(),
			value: U256::ZERO,
			chain_id: self.chain_id,
			nonce: None,
			gas_limit: Some(APPROVAL_GAS_LIMIT),
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		}
	}

	pub fn bridge_transaction(&self, payload: &BridgePayload) -> Result<Transaction, PayloadError> {
		Ok(Transaction {
			to: Some(self.splitter_address),
			data: payload.calldata()?,
			value: payload.total_fee,
			chain_id: self.chain_id,
			nonce: None,
			gas_limit: None,
			max_fee_per_gas: None,
			max_priority_fee_per_gas: None,
		})
	}

	/// Grants the allowance if needed, then submits the bridge call.
	///
	/// Returns the hash of the confirmed bridge transaction. An allowance that
	/// fails or reverts stops the run before the bridge call is built.
	pub async fn dispatch(&self, payload: &BridgePayload) -> Result<TransactionHash, SplitterError> {
		if let Some(approval) = &payload.approval {
			self.approve(approval).await?;
		}

		let tx = self.bridge_transaction(payload)?;
		let entry_point = payload.entry_point();
		tracing::info!(
			%entry_point,
			value = %payload.total_fee,
			legs = payload.legs.len(),
			"Submitting bridge transaction"
		);

		let hash = self
			.delivery
			.deliver(tx)
			.await
			.map_err(|e| SplitterError::Bridge(e.to_string()))?;
		let receipt = self
			.delivery
			.confirm(self.chain_id, &hash, self.min_confirmations)
			.await
			.map_err(|e| SplitterError::Bridge(e.to_string()))?;

		if !receipt.success {
			return Err(SplitterError::Bridge(format!("Transaction {} reverted", hash)));
		}

		tracing::info!(tx_hash = %hash, block = receipt.block_number, "Bridge transaction confirmed");
		Ok(hash)
	}

	async fn approve(&self, approval: &Approval) -> Result<(), SplitterError> {
		tracing::info!(
			token = %approval.token,
			spender = %approval.spender,
			amount = %approval.amount,
			"Approving splitter allowance"
		);

		let tx = self.approval_transaction(approval);
		let hash = self
			.delivery
			.deliver(tx)
			.await
			.map_err(|e| SplitterError::Allowance(e.to_string()))?;
		let receipt = self
			.delivery
			.confirm(self.chain_id, &hash, self.min_confirmations)
			.await
			.map_err(|e| SplitterError::Allowance(e.to_string()))?;

		if !receipt.success {
			return Err(SplitterError::Allowance(format!(
				"Approval {} reverted",
				hash
			)));
		}

		tracing::info!(tx_hash = %hash, "Allowance confirmed");
		Ok(())
	}
}
