//! Utility functions for common type conversions and transformations.
//!
//! This module provides sentinel address constants, amount parsing and the
//! string formatting helpers used for logging.

pub mod constants;
pub mod formatting;
pub mod serde_u256;

pub use constants::{NATIVE_TOKEN_SENTINEL, REFERRER_PLACEHOLDER, ZERO_ADDRESS};
pub use formatting::{format_token_amount, truncate_id, with_0x_prefix};
pub use serde_u256::parse_u256;
