//! Solidity bindings for the contracts the splitter calls.
//!
//! Struct layouts follow the downstream bridge's `BridgeData`, `SwapData` and
//! `StargateData` tuples; only the tuple shapes matter for encoding.

use alloy_sol_types::sol;

sol! {
	/// Generic bridge descriptor, one per leg.
	#[derive(Debug, PartialEq, Eq)]
	struct BridgeData {
		bytes32 transactionId;
		string bridge;
		string integrator;
		address referrer;
		address sendingAssetId;
		address receiver;
		uint256 minAmount;
		uint256 destinationChainId;
		bool hasSourceSwaps;
		bool hasDestinationCall;
	}

	/// Source-chain swap executed before bridging.
	#[derive(Debug, PartialEq, Eq)]
	struct SwapData {
		address callTo;
		address approveTo;
		address sendingAssetId;
		address receivingAssetId;
		uint256 fromAmount;
		bytes callData;
		bool requiresDeposit;
	}

	/// Stargate-specific parameters, one per leg.
	#[derive(Debug, PartialEq, Eq)]
	struct StargateData {
		uint256 dstPoolId;
		uint256 minAmountLD;
		uint256 dstGasForCall;
		uint256 lzFee;
		address refundAddress;
		bytes callTo;
		bytes callData;
	}

	/// HecBridgeSplitter entry points.
	interface IHecBridgeSplitter {
		function startBridgeTokensViaStargate(BridgeData[] bridgeDatas, StargateData[] stargateDatas) external payable;
		function swapAndStartBridgeTokensViaStargate(BridgeData[] bridgeDatas, SwapData[][] swapDatas, StargateData[] stargateDatas, uint256[] fees) external payable;
	}

	interface IERC20 {
		function approve(address spender, uint256 amount) external returns (bool);
	}
}
