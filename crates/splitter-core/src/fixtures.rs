//! Route quotes shaped like the routing API's responses.

use alloy_primitives::{address, Address};
use serde_json::{json, Value};
use splitter_types::{RouteQuote, ZERO_ADDRESS};

use crate::PipelineConfig;
use splitter_types::Mode;

pub(crate) const BRIDGE: Address = address!("1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE");
pub(crate) const SPLITTER: Address = address!("19Fc4D72A9D400A19540f41D3728027B89f5Ccd0");
pub(crate) const RECEIVER: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
pub(crate) const HOLDER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub(crate) const USDC: Address = address!("04068DA6C83AFCFA0e13ba15A6696662335D5B75");
pub(crate) const WFTM: Address = address!("21be370D5312f44cB42ce377BC9b8a0cEF1A4C83");
pub(crate) const DEX: Address = address!("F491e7B69E4244ad4002BC14e878a34207E38c29");
pub(crate) const DEST_CONTRACT: Address = address!("3C2269811836af69497E5F486A85D7316753cf62");
pub(crate) const ROUTE_ID: &str =
	"0x5e0a3e0e7a8d0f2f4b5b0c5d2c7b8a9e1f2d3c4b5a69788796a5b4c3d2e1f000";
pub(crate) const CHAIN_ID: u64 = 250;

/// Builder for a one-step Stargate route quote.
#[derive(Debug, Clone)]
pub(crate) struct QuoteFixture {
	pub from_token: Address,
	pub from_amount: u64,
	/// Source swap token; `None` means a bridge-only route.
	pub swap_from_token: Option<Address>,
	pub swap_from_amount: u64,
	pub swap_to_amount: u64,
	pub lz_fee: u64,
	pub call_to: Address,
	pub referrer: &'static str,
	pub include_cross: bool,
	pub from_chain_id: u64,
}

impl QuoteFixture {
	/// USDC bridged as-is.
	pub fn token_bridge() -> Self {
		Self {
			from_token: USDC,
			from_amount: 1_000_000,
			swap_from_token: None,
			swap_from_amount: 50,
			swap_to_amount: 995_000,
			lz_fee: 100,
			call_to: BRIDGE,
			referrer: "",
			include_cross: true,
			from_chain_id: CHAIN_ID,
		}
	}

	/// Native FTM swapped into USDC, then bridged.
	pub fn native_swap() -> Self {
		Self {
			from_token: ZERO_ADDRESS,
			swap_from_token: Some(ZERO_ADDRESS),
			..Self::token_bridge()
		}
	}

	/// WFTM swapped into USDC, then bridged.
	pub fn token_swap() -> Self {
		Self {
			from_token: WFTM,
			swap_from_token: Some(WFTM),
			..Self::token_bridge()
		}
	}

	pub fn to_json(&self) -> Value {
		let cross = json!({
			"type": "cross",
			"tool": "stargate",
			"action": { "fromAmount": self.swap_to_amount.to_string() },
			"estimate": {
				"approvalAddress": BRIDGE,
				"data": {
					"stargateData": {
						"dstPoolId": 1,
						"minAmountLD": "990000",
						"dstGasForCall": 0,
						"lzFee": self.lz_fee.to_string(),
						"callTo": self.call_to,
						"callData": "0x"
					}
				}
			}
		});

		let mut included = Vec::new();
		if let Some(swap_from) = self.swap_from_token {
			included.push(json!({
				"type": "swap",
				"tool": "spookyswap",
				"action": {
					"fromAmount": self.swap_from_amount.to_string(),
					"fromToken": { "address": swap_from },
					"toToken": { "address": USDC, "symbol": "USDC", "decimals": 6 }
				},
				"estimate": {
					"approvalAddress": DEX,
					"data": { "fromToken": { "address": swap_from } }
				},
				"transactionRequest": { "data": "0x38ed1739" }
			}));
		}
		if self.include_cross {
			included.push(cross);
		}

		json!({
			"id": ROUTE_ID,
			"fromChainId": self.from_chain_id,
			"fromToken": { "address": self.from_token },
			"fromAmount": self.from_amount.to_string(),
			"toChainId": 56,
			"toAddress": RECEIVER,
			"steps": [{
				"tool": "stargate",
				"integrator": "hector",
				"referrer": self.referrer,
				"estimate": {
					"data": {
						"toToken": { "address": USDC },
						"toTokenAmount": self.swap_to_amount.to_string()
					}
				},
				"includedSteps": included
			}]
		})
	}

	pub fn build(&self) -> RouteQuote {
		serde_json::from_value(self.to_json()).expect("fixture deserializes")
	}
}

pub(crate) fn pipeline_config(mode: Mode) -> PipelineConfig {
	PipelineConfig {
		mode,
		splitter_address: SPLITTER,
		bridge_address: BRIDGE,
		chain_id: CHAIN_ID,
		min_confirmations: 1,
	}
}
