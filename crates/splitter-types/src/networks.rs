//! Network configuration types.
//!
//! Networks are addressed by their short name (`ftm`, `bsc`, ...) in the
//! configuration file, matching the naming the deployment tooling uses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for a single blockchain network.
///
/// # Fields
///
/// * `chain_id` - The EVM chain id transactions are signed for
/// * `rpc_url` - The HTTP(S) RPC endpoint for blockchain interaction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkConfig {
	pub chain_id: u64,
	pub rpc_url: String,
}

/// Networks configuration mapping network names to their configurations.
pub type NetworksConfig = HashMap<String, NetworkConfig>;
