//! Route interpretation.
//!
//! Reads a route quote once, checks that it has the shape the splitter can
//! execute and extracts the bridge, swap and Stargate parameters together with
//! the three route flags. Nothing downstream looks at the raw quote again.

use alloy_primitives::{Address, Bytes, B256, U256};
use splitter_types::{IncludedStep, RouteQuote, StepType, ZERO_ADDRESS};
use thiserror::Error;

/// Errors raised while reading a route quote.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
	#[error("Route has no steps")]
	NoSteps,
	#[error("Route has no cross-chain step")]
	MissingCrossStep,
	#[error("Route has {0} cross-chain steps, expected exactly one")]
	AmbiguousCrossStep(usize),
	#[error("Cross-chain step carries no stargateData")]
	MissingStargateData,
	#[error("Missing route field: {0}")]
	MissingField(&'static str),
	#[error("Route id '{0}' is not a 32-byte hex value")]
	InvalidTransactionId(String),
	#[error("Route starts on chain {actual}, configured network is chain {expected}")]
	ChainMismatch { expected: u64, actual: u64 },
}

/// Bridge-level parameters shared by every leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeLeg {
	pub transaction_id: B256,
	pub bridge: String,
	pub integrator: String,
	/// Referrer as quoted; empty when the route has none.
	pub referrer: String,
	/// Asset the bridge receives: the swap output when swapping, else the
	/// quoted source token.
	pub sending_asset_id: Address,
	pub receiver: Address,
	/// Amount the bridge receives.
	pub min_amount: U256,
	pub destination_chain_id: u64,
}

/// Source-chain swap parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapLeg {
	/// Contract both approved and called for the swap.
	pub approval_address: Address,
	pub from_token: Address,
	pub to_token: Address,
	pub from_amount: U256,
	pub call_data: Bytes,
}

/// Stargate parameters of the cross-chain step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolLeg {
	pub dst_pool_id: U256,
	pub min_amount_ld: U256,
	pub dst_gas_for_call: U256,
	pub lz_fee: U256,
	pub call_to: Bytes,
	pub call_data: Bytes,
}

/// Everything the splitter needs from a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretedRoute {
	pub bridge: BridgeLeg,
	/// Present exactly when `has_source_swaps` is set.
	pub swap: Option<SwapLeg>,
	pub protocol: ProtocolLeg,
	pub has_source_swaps: bool,
	pub has_destination_call: bool,
	pub is_native_from: bool,
}

/// Interprets quotes against the configured bridge and source chain.
#[derive(Debug, Clone)]
pub struct RouteInterpreter {
	bridge_address: Address,
	chain_id: u64,
}

impl RouteInterpreter {
	pub fn new(bridge_address: Address, chain_id: u64) -> Self {
		Self {
			bridge_address,
			chain_id,
		}
	}

	/// Validates `quote` and extracts its legs and flags.
	pub fn interpret(&self, quote: &RouteQuote) -> Result<InterpretedRoute, RouteError> {
		if let Some(actual) = quote.from_chain_id {
			if actual != self.chain_id {
				return Err(RouteError::ChainMismatch {
					expected: self.chain_id,
					actual,
				});
			}
		}

		let step = quote.steps.first().ok_or(RouteError::NoSteps)?;

		let mut cross_steps = step
			.included_steps
			.iter()
			.filter(|s| s.step_type == StepType::Cross);
		let cross = cross_steps.next().ok_or(RouteError::MissingCrossStep)?;
		let extra = cross_steps.count();
		if extra > 0 {
			return Err(RouteError::AmbiguousCrossStep(extra + 1));
		}
		let stargate = cross.stargate_data().ok_or(RouteError::MissingStargateData)?;

		let transaction_id: B256 = quote
			.id
			.parse()
			.map_err(|_| RouteError::InvalidTransactionId(quote.id.clone()))?;

		let has_source_swaps = step
			.included_steps
			.first()
			.is_some_and(|s| s.step_type == StepType::Swap);
		let is_native_from = quote.from_token.address == ZERO_ADDRESS;
		let receiver = quote.to_address;
		let has_destination_call = stargate.call_to.as_ref() != self.bridge_address.as_slice()
			&& stargate.call_to.as_ref() != receiver.as_slice();

		let (swap, sending_asset_id, min_amount) = if has_source_swaps {
			let swap = swap_leg(&step.included_steps[0])?;
			let output = step
				.estimate
				.data
				.as_ref()
				.ok_or(RouteError::MissingField("steps[0].estimate.data"))?;
			let to_token = output
				.to_token
				.as_ref()
				.ok_or(RouteError::MissingField("steps[0].estimate.data.toToken"))?;
			let to_amount = output
				.to_token_amount
				.ok_or(RouteError::MissingField("steps[0].estimate.data.toTokenAmount"))?;
			(Some(swap), to_token.address, to_amount)
		} else {
			(None, quote.from_token.address, quote.from_amount)
		};

		Ok(InterpretedRoute {
			bridge: BridgeLeg {
				transaction_id,
				bridge: step.tool.clone(),
				integrator: step.integrator.clone(),
				referrer: step.referrer.clone(),
				sending_asset_id,
				receiver,
				min_amount,
				destination_chain_id: quote.to_chain_id,
			},
			swap,
			protocol: ProtocolLeg {
				dst_pool_id: stargate.dst_pool_id,
				min_amount_ld: stargate.min_amount_ld,
				dst_gas_for_call: stargate.dst_gas_for_call,
				lz_fee: stargate.lz_fee,
				call_to: stargate.call_to.clone(),
				call_data: stargate.call_data.clone(),
			},
			has_source_swaps,
			has_destination_call,
			is_native_from,
		})
	}
}

fn swap_leg(step: &IncludedStep) -> Result<SwapLeg, RouteError> {
	let estimate = step
		.estimate
		.as_ref()
		.ok_or(RouteError::MissingField("includedSteps[0].estimate"))?;
	let approval_address = estimate
		.approval_address
		.ok_or(RouteError::MissingField("includedSteps[0].estimate.approvalAddress"))?;
	let from_token = estimate
		.data
		.as_ref()
		.and_then(|d| d.from_token.as_ref())
		.ok_or(RouteError::MissingField("includedSteps[0].estimate.data.fromToken"))?;

	let action = step
		.action
		.as_ref()
		.ok_or(RouteError::MissingField("includedSteps[0].action"))?;
	let to_token = action
		.to_token
		.as_ref()
		.ok_or(RouteError::MissingField("includedSteps[0].action.toToken"))?;
	let from_amount = action
		.from_amount
		.ok_or(RouteError::MissingField("includedSteps[0].action.fromAmount"))?;

	let call_data = step
		.transaction_request
		.as_ref()
		.and_then(|r| r.data.clone())
		.unwrap_or_default();

	Ok(SwapLeg {
		approval_address,
		from_token: from_token.address,
		to_token: to_token.address,
		from_amount,
		call_data,
	})
}
