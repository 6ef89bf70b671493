//! Lenient deserialization of on-chain amounts.
//!
//! Routing APIs emit amounts as decimal strings, `0x` hex strings or plain
//! JSON numbers depending on the field. All of them land in a `U256`.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
	Number(u64),
	Text(String),
}

impl AmountRepr {
	fn into_u256(self) -> Result<U256, String> {
		match self {
			AmountRepr::Number(n) => Ok(U256::from(n)),
			AmountRepr::Text(s) => parse_u256(&s),
		}
	}
}

/// Parses a decimal or `0x`-prefixed hex string into a `U256`.
pub fn parse_u256(value: &str) -> Result<U256, String> {
	let value = value.trim();
	let parsed = match value
		.strip_prefix("0x")
		.or_else(|| value.strip_prefix("0X"))
	{
		Some(hex) if !hex.is_empty() => U256::from_str_radix(hex, 16),
		Some(_) => return Err(format!("Invalid amount '{}': empty hex string", value)),
		None if !value.is_empty() => U256::from_str_radix(value, 10),
		None => return Err("Invalid amount: empty string".to_string()),
	};
	parsed.map_err(|e| format!("Invalid amount '{}': {}", value, e))
}

pub(crate) fn deserialize_u256<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
	D: Deserializer<'de>,
{
	AmountRepr::deserialize(deserializer)?
		.into_u256()
		.map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_optional_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<AmountRepr>::deserialize(deserializer)?
		.map(AmountRepr::into_u256)
		.transpose()
		.map_err(serde::de::Error::custom)
}
