//! Display helpers for ids, hex strings and amounts.

use alloy_primitives::U256;

/// Shortens an id to its first 10 characters for log fields.
pub fn truncate_id(id: &str) -> String {
	match id.get(..10) {
		Some(head) if id.len() > 10 => format!("{}..", head),
		_ => id.to_string(),
	}
}

/// Adds "0x" prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.starts_with("0x") || hex_str.starts_with("0X") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Renders a raw amount in whole units, dropping trailing zeros.
///
/// `format_token_amount(U256::from(1_500_000u64), 6)` yields `"1.5"`.
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
	let unit = U256::from(10u64).pow(U256::from(decimals));
	let (whole, fraction) = amount.div_rem(unit);
	if fraction.is_zero() {
		return whole.to_string();
	}

	let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
	format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_truncate_id() {
		assert_eq!(truncate_id("0x12345678"), "0x12345678");
		assert_eq!(truncate_id("0x1234567890abcdef"), "0x12345678..");
	}

	#[test]
	fn test_with_0x_prefix() {
		assert_eq!(with_0x_prefix("abcd"), "0xabcd");
		assert_eq!(with_0x_prefix("0xabcd"), "0xabcd");
	}

	#[test]
	fn test_format_token_amount() {
		let wei = |s: &str| U256::from_str_radix(s, 10).unwrap();

		assert_eq!(format_token_amount(wei("1000000000000000000"), 18), "1");
		assert_eq!(format_token_amount(wei("6219844712389678421"), 18), "6.219844712389678421");
		assert_eq!(format_token_amount(wei("100000000000000000"), 18), "0.1");
		assert_eq!(format_token_amount(U256::from(995_000u64), 6), "0.995");
		assert_eq!(format_token_amount(U256::from(1000u64), 0), "1000");
		assert_eq!(format_token_amount(U256::ZERO, 18), "0");
	}
}
