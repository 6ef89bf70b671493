//! Common types module for the bridge splitter system.
//!
//! This module defines the data types shared by every splitter crate: the
//! route quote schema consumed from the routing API, transaction and receipt
//! types exchanged with the delivery layer, network configuration and the
//! configuration validation framework.

/// Transaction delivery types for blockchain interactions.
pub mod delivery;
/// Leg replication mode.
pub mod mode;
/// Network configuration types.
pub mod networks;
/// Route quote schema as returned by the routing API.
pub mod route;
/// Secure string type for private keys.
pub mod secret_string;
/// Utility functions and sentinel constants.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

pub use delivery::*;
pub use mode::Mode;
pub use networks::{NetworkConfig, NetworksConfig};
pub use route::*;
pub use secret_string::SecretString;
pub use utils::{
	format_token_amount, parse_u256, truncate_id, with_0x_prefix, NATIVE_TOKEN_SENTINEL,
	REFERRER_PLACEHOLDER, ZERO_ADDRESS,
};
pub use validation::*;
