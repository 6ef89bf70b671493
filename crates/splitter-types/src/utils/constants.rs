//! Sentinel addresses understood by the bridge contracts.

use alloy_primitives::{address, Address};

/// The zero address.
///
/// Stands for the chain's native currency in asset fields and for
/// "no referrer" in the bridge descriptor.
pub const ZERO_ADDRESS: Address = Address::ZERO;

/// Referrer forwarded on-chain whenever the quote names any referrer.
pub const REFERRER_PLACEHOLDER: Address = address!("0000000000000000000000000000000000000001");

/// Native currency marker used by routing APIs in token fields.
pub const NATIVE_TOKEN_SENTINEL: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
