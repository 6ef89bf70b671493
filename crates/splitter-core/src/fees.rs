//! Native value attached to the bridge call.
//!
//! Every leg pays its LayerZero fee. When the route spends native currency the
//! first leg also carries the swap input, since the splitter forwards it as
//! `msg.value`.

use alloy_primitives::U256;

use crate::abi::BridgeData;
use crate::normalizer::PayloadError;

/// Per-leg native fees for `leg_count` legs.
pub fn leg_fees(
	lz_fee: U256,
	native_swap_amount: Option<U256>,
	is_native_from: bool,
	leg_count: usize,
) -> Result<Vec<U256>, PayloadError> {
	let first = if is_native_from {
		let swap_amount = native_swap_amount.ok_or(PayloadError::NativeSourceWithoutSwap)?;
		lz_fee
			.checked_add(swap_amount)
			.ok_or(PayloadError::Overflow("leg fee"))?
	} else {
		lz_fee
	};

	Ok((0..leg_count)
		.map(|leg| if leg == 0 { first } else { lz_fee })
		.collect())
}

/// Sum of all leg fees.
pub fn total_fee(fees: &[U256]) -> Result<U256, PayloadError> {
	fees.iter().try_fold(U256::ZERO, |acc, fee| {
		acc.checked_add(*fee).ok_or(PayloadError::Overflow("total fee"))
	})
}

/// Token allowance the splitter needs to pull every leg's bridge amount.
pub fn approval_amount(bridge_datas: &[BridgeData]) -> Result<U256, PayloadError> {
	bridge_datas.iter().try_fold(U256::ZERO, |acc, data| {
		acc.checked_add(data.minAmount)
			.ok_or(PayloadError::Overflow("approval amount"))
	})
}
