//! Payload normalization.
//!
//! Turns an interpreted route into the ABI descriptors the splitter contract
//! takes, replicated once per leg. Everything here is pure.

use alloy_primitives::{Address, Bytes, U256};
use splitter_types::{Mode, NATIVE_TOKEN_SENTINEL, REFERRER_PLACEHOLDER, ZERO_ADDRESS};
use thiserror::Error;

use crate::abi::{BridgeData, StargateData, SwapData};
use crate::fees;
use crate::interpreter::InterpretedRoute;

/// Errors raised while building the call payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
	#[error("Native-currency route has no source swap")]
	NativeSourceWithoutSwap,
	#[error("Route declares a source swap but the payload has no swap data")]
	MissingSwapData,
	#[error("Arithmetic overflow computing {0}")]
	Overflow(&'static str),
}

/// Parallel per-leg sequences passed to the splitter contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegSet {
	pub bridge_datas: Vec<BridgeData>,
	/// `None` when the route has no source swap.
	pub swap_datas: Option<Vec<Vec<SwapData>>>,
	pub stargate_datas: Vec<StargateData>,
	/// Native fee carried by each leg.
	pub fees: Vec<U256>,
}

impl LegSet {
	pub fn len(&self) -> usize {
		self.bridge_datas.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bridge_datas.is_empty()
	}
}

/// Builds the leg set for `route` in `mode`, refunding to `refund_address`.
pub fn normalize(
	route: &InterpretedRoute,
	mode: Mode,
	refund_address: Address,
) -> Result<LegSet, PayloadError> {
	let legs = mode.leg_count();

	let bridge = bridge_data(route);
	let swap = swap_data(route);
	let stargate = stargate_data(route, refund_address);
	let fees = fees::leg_fees(
		route.protocol.lz_fee,
		route.swap.as_ref().map(|s| s.from_amount),
		route.is_native_from,
		legs,
	)?;

	Ok(LegSet {
		bridge_datas: vec![bridge; legs],
		swap_datas: swap.map(|s| vec![vec![s]; legs]),
		stargate_datas: vec![stargate; legs],
		fees,
	})
}

fn bridge_data(route: &InterpretedRoute) -> BridgeData {
	let leg = &route.bridge;
	BridgeData {
		transactionId: leg.transaction_id,
		bridge: leg.bridge.clone(),
		integrator: leg.integrator.clone(),
		referrer: if leg.referrer.is_empty() {
			ZERO_ADDRESS
		} else {
			REFERRER_PLACEHOLDER
		},
		sendingAssetId: leg.sending_asset_id,
		receiver: leg.receiver,
		minAmount: leg.min_amount,
		destinationChainId: U256::from(leg.destination_chain_id),
		hasSourceSwaps: route.has_source_swaps,
		hasDestinationCall: route.has_destination_call,
	}
}

fn swap_data(route: &InterpretedRoute) -> Option<SwapData> {
	let swap = route.swap.as_ref()?;
	let sending_asset_id = if swap.from_token == NATIVE_TOKEN_SENTINEL || route.is_native_from {
		ZERO_ADDRESS
	} else {
		swap.from_token
	};

	Some(SwapData {
		callTo: swap.approval_address,
		approveTo: swap.approval_address,
		sendingAssetId: sending_asset_id,
		receivingAssetId: swap.to_token,
		fromAmount: swap.from_amount,
		callData: swap.call_data.clone(),
		requiresDeposit: true,
	})
}

fn stargate_data(route: &InterpretedRoute, refund_address: Address) -> StargateData {
	let protocol = &route.protocol;
	let call_to = if route.has_destination_call {
		protocol.call_to.clone()
	} else {
		Bytes::copy_from_slice(route.bridge.receiver.as_slice())
	};

	StargateData {
		dstPoolId: protocol.dst_pool_id,
		minAmountLD: protocol.min_amount_ld,
		dstGasForCall: protocol.dst_gas_for_call,
		lzFee: protocol.lz_fee,
		refundAddress: refund_address,
		callTo: call_to,
		callData: protocol.call_data.clone(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures::{
		QuoteFixture, BRIDGE, CHAIN_ID, DEST_CONTRACT, DEX, HOLDER, RECEIVER, USDC, WFTM,
	};
	use crate::interpreter::RouteInterpreter;

	fn route(fixture: &QuoteFixture) -> InterpretedRoute {
		RouteInterpreter::new(BRIDGE, CHAIN_ID)
			.interpret(&fixture.build())
			.unwrap()
	}

	#[test]
	fn test_leg_count_follows_mode() {
		for fixture in [QuoteFixture::token_bridge(), QuoteFixture::native_swap()] {
			let route = route(&fixture);
			for (mode, expected) in [(Mode::Single, 1), (Mode::Multi, 2)] {
				let legs = normalize(&route, mode, HOLDER).unwrap();
				assert_eq!(legs.len(), expected);
				assert_eq!(legs.stargate_datas.len(), expected);
				assert_eq!(legs.fees.len(), expected);
				if let Some(swaps) = &legs.swap_datas {
					assert_eq!(swaps.len(), expected);
				}
			}
		}
	}

	#[test]
	fn test_multi_legs_are_identical() {
		let legs = normalize(&route(&QuoteFixture::token_swap()), Mode::Multi, HOLDER).unwrap();
		assert_eq!(legs.bridge_datas[0], legs.bridge_datas[1]);
		assert_eq!(legs.stargate_datas[0], legs.stargate_datas[1]);
		let swaps = legs.swap_datas.unwrap();
		assert_eq!(swaps[0], swaps[1]);
	}

	#[test]
	fn test_swap_data_absent_without_source_swap() {
		let legs = normalize(&route(&QuoteFixture::token_bridge()), Mode::Single, HOLDER).unwrap();
		assert!(legs.swap_datas.is_none());
		assert!(!legs.bridge_datas[0].hasSourceSwaps);
	}

	#[test]
	fn test_swap_data_fields() {
		let legs = normalize(&route(&QuoteFixture::token_swap()), Mode::Single, HOLDER).unwrap();
		let swap = &legs.swap_datas.unwrap()[0][0];
		assert_eq!(swap.callTo, DEX);
		assert_eq!(swap.approveTo, DEX);
		assert_eq!(swap.sendingAssetId, WFTM);
		assert_eq!(swap.receivingAssetId, USDC);
		assert_eq!(swap.fromAmount, U256::from(50u64));
		assert!(swap.requiresDeposit);
	}

	#[test]
	fn test_missing_swap_call_data_defaults_to_empty() {
		let mut json = QuoteFixture::token_swap().to_json();
		json["steps"][0]["includedSteps"][0]
			.as_object_mut()
			.unwrap()
			.remove("transactionRequest");
		let quote = serde_json::from_value(json).unwrap();
		let route = RouteInterpreter::new(BRIDGE, CHAIN_ID).interpret(&quote).unwrap();

		let legs = normalize(&route, Mode::Single, HOLDER).unwrap();
		assert!(legs.swap_datas.unwrap()[0][0].callData.is_empty());
	}

	#[test]
	fn test_native_sending_asset_uses_either_signal() {
		// Native source whose swap quotes a non-sentinel token
		let native_source = QuoteFixture {
			swap_from_token: Some(WFTM),
			..QuoteFixture::native_swap()
		};
		// Token source whose swap quotes the sentinel
		let sentinel_swap = QuoteFixture {
			swap_from_token: Some(NATIVE_TOKEN_SENTINEL),
			..QuoteFixture::token_swap()
		};

		for fixture in [native_source, sentinel_swap] {
			let legs = normalize(&route(&fixture), Mode::Single, HOLDER).unwrap();
			assert_eq!(legs.swap_datas.unwrap()[0][0].sendingAssetId, ZERO_ADDRESS);
		}

		let plain = normalize(&route(&QuoteFixture::token_swap()), Mode::Single, HOLDER).unwrap();
		assert_eq!(plain.swap_datas.unwrap()[0][0].sendingAssetId, WFTM);
	}

	#[test]
	fn test_referrer_is_normalized() {
		let without = normalize(&route(&QuoteFixture::token_bridge()), Mode::Single, HOLDER).unwrap();
		assert_eq!(without.bridge_datas[0].referrer, ZERO_ADDRESS);

		let with = QuoteFixture {
			referrer: "0x1111111111111111111111111111111111111111",
			..QuoteFixture::token_bridge()
		};
		let legs = normalize(&route(&with), Mode::Single, HOLDER).unwrap();
		assert_eq!(legs.bridge_datas[0].referrer, REFERRER_PLACEHOLDER);
	}

	#[test]
	fn test_call_target_replaced_without_destination_call() {
		let legs = normalize(&route(&QuoteFixture::token_bridge()), Mode::Single, HOLDER).unwrap();
		assert_eq!(legs.stargate_datas[0].callTo.as_ref(), RECEIVER.as_slice());
		assert_eq!(legs.stargate_datas[0].refundAddress, HOLDER);

		let calling = QuoteFixture {
			call_to: DEST_CONTRACT,
			..QuoteFixture::token_bridge()
		};
		let legs = normalize(&route(&calling), Mode::Single, HOLDER).unwrap();
		assert_eq!(legs.stargate_datas[0].callTo.as_ref(), DEST_CONTRACT.as_slice());
		assert!(legs.bridge_datas[0].hasDestinationCall);
	}

	#[test]
	fn test_bridge_data_fields() {
		let legs = normalize(&route(&QuoteFixture::token_bridge()), Mode::Single, HOLDER).unwrap();
		let bridge = &legs.bridge_datas[0];
		assert_eq!(bridge.bridge, "stargate");
		assert_eq!(bridge.integrator, "hector");
		assert_eq!(bridge.sendingAssetId, USDC);
		assert_eq!(bridge.receiver, RECEIVER);
		assert_eq!(bridge.minAmount, U256::from(1_000_000u64));
		assert_eq!(bridge.destinationChainId, U256::from(56u64));
	}
}
