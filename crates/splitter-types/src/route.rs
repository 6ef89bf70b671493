//! Route quote schema.
//!
//! Typed view of the route document returned by the third-party routing API.
//! Only the fields the splitter reads are modelled; unknown fields are
//! ignored. Fields that are only required in some route shapes (swap legs,
//! Stargate data) are optional here and checked by the route interpreter.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::utils::serde_u256::{deserialize_optional_u256, deserialize_u256};

/// A complete route as quoted by the routing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuote {
	/// Route identifier, forwarded on-chain as the bridge `transactionId`.
	pub id: String,
	/// Chain the route starts on, when the API reports it.
	#[serde(default)]
	pub from_chain_id: Option<u64>,
	/// Token the holder spends.
	pub from_token: TokenRef,
	/// Amount of `from_token` the holder spends.
	#[serde(deserialize_with = "deserialize_u256")]
	pub from_amount: U256,
	pub to_chain_id: u64,
	/// Final receiver on the destination chain.
	pub to_address: Address,
	/// Top-level steps; the splitter executes the first one.
	pub steps: Vec<RouteStep>,
}

/// Token reference as embedded throughout the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
	pub address: Address,
	#[serde(default)]
	pub symbol: Option<String>,
	#[serde(default)]
	pub decimals: Option<u8>,
}

/// One top-level step of a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
	/// Bridge tool name, e.g. `stargate`.
	#[serde(default)]
	pub tool: String,
	#[serde(default)]
	pub integrator: String,
	#[serde(default)]
	pub referrer: String,
	#[serde(default)]
	pub estimate: StepEstimate,
	#[serde(default)]
	pub included_steps: Vec<IncludedStep>,
}

/// Aggregate estimate of a top-level step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepEstimate {
	#[serde(default)]
	pub data: Option<StepEstimateData>,
}

/// Output side of a top-level step: what arrives at the bridge after any swap.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEstimateData {
	#[serde(default)]
	pub to_token: Option<TokenRef>,
	#[serde(default, deserialize_with = "deserialize_optional_u256")]
	pub to_token_amount: Option<U256>,
}

/// Kind of an included step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
	/// Same-chain token swap.
	Swap,
	/// Cross-chain transfer.
	Cross,
	/// Any other step kind (fee collection, protocol steps, ...).
	#[serde(other)]
	Other,
}

/// A step nested inside a top-level step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedStep {
	#[serde(rename = "type")]
	pub step_type: StepType,
	#[serde(default)]
	pub tool: Option<String>,
	#[serde(default)]
	pub action: Option<StepAction>,
	#[serde(default)]
	pub estimate: Option<IncludedEstimate>,
	#[serde(default)]
	pub transaction_request: Option<TransactionRequestData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepAction {
	#[serde(default, deserialize_with = "deserialize_optional_u256")]
	pub from_amount: Option<U256>,
	#[serde(default)]
	pub from_token: Option<TokenRef>,
	#[serde(default)]
	pub to_token: Option<TokenRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedEstimate {
	/// Contract the holder approves and calls for a swap.
	#[serde(default)]
	pub approval_address: Option<Address>,
	#[serde(default)]
	pub data: Option<IncludedEstimateData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedEstimateData {
	#[serde(default)]
	pub from_token: Option<TokenRef>,
	#[serde(default)]
	pub stargate_data: Option<StargateQuote>,
}

/// Stargate parameters quoted for the cross-chain transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StargateQuote {
	#[serde(deserialize_with = "deserialize_u256")]
	pub dst_pool_id: U256,
	#[serde(rename = "minAmountLD", deserialize_with = "deserialize_u256")]
	pub min_amount_ld: U256,
	#[serde(deserialize_with = "deserialize_u256")]
	pub dst_gas_for_call: U256,
	/// LayerZero messaging fee, paid in native currency.
	#[serde(deserialize_with = "deserialize_u256")]
	pub lz_fee: U256,
	/// Destination call target, ABI `bytes`.
	pub call_to: Bytes,
	#[serde(default)]
	pub call_data: Bytes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionRequestData {
	#[serde(default)]
	pub data: Option<Bytes>,
}

impl IncludedStep {
	/// Stargate data of this step, if the estimate carries any.
	pub fn stargate_data(&self) -> Option<&StargateQuote> {
		self.estimate
			.as_ref()
			.and_then(|e| e.data.as_ref())
			.and_then(|d| d.stargate_data.as_ref())
	}
}
