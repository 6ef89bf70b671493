//! Core pipeline of the bridge splitter.
//!
//! A run reads one route quote, interprets it into bridge, swap and Stargate
//! legs, normalizes those into per-leg ABI descriptors, works out the native
//! value and allowance, and dispatches the splitter call through the delivery
//! service.

pub mod abi;
pub mod dispatcher;
pub mod fees;
pub mod interpreter;
pub mod normalizer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use dispatcher::{Approval, BridgePayload, Dispatcher, EntryPoint};
pub use interpreter::{InterpretedRoute, RouteError, RouteInterpreter};
pub use normalizer::{LegSet, PayloadError};

use alloy_primitives::{Address, U256};
use splitter_account::{AccountError, AccountService};
use splitter_config::{Config, ConfigError};
use splitter_delivery::{DeliveryError, DeliveryService};
use splitter_types::{truncate_id, Mode, RouteQuote, TransactionHash};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Errors that end a splitter run.
#[derive(Debug, Error)]
pub enum SplitterError {
	/// The route quote is malformed or unsupported.
	#[error("Route error: {0}")]
	Route(#[from] RouteError),
	/// The payload could not be built from a valid route.
	#[error("Payload error: {0}")]
	Payload(#[from] PayloadError),
	/// The allowance transaction failed or reverted.
	#[error("Allowance failed: {0}")]
	Allowance(String),
	/// The bridge transaction failed or reverted.
	#[error("Bridge call failed: {0}")]
	Bridge(String),
	#[error("Delivery error: {0}")]
	Delivery(#[from] DeliveryError),
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
}

/// Settings a run needs, taken from the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
	pub mode: Mode,
	/// HecBridgeSplitter contract: call target and allowance spender.
	pub splitter_address: Address,
	/// LI.FI diamond, used to recognise plain transfers.
	pub bridge_address: Address,
	/// Chain of the configured network.
	pub chain_id: u64,
	pub min_confirmations: u64,
}

impl PipelineConfig {
	pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
		let network = config.network()?;
		Ok(Self {
			mode: config.splitter.mode,
			splitter_address: config.splitter.splitter_address,
			bridge_address: config.splitter.bridge_address,
			chain_id: network.chain_id,
			min_confirmations: config.delivery.min_confirmations,
		})
	}

	/// Same settings with a different leg mode.
	pub fn with_mode(mut self, mode: Mode) -> Self {
		self.mode = mode;
		self
	}
}

/// Runs routes for one account on one chain.
pub struct BridgeSplitter {
	config: PipelineConfig,
	account: Arc<AccountService>,
	delivery: Arc<DeliveryService>,
	interpreter: RouteInterpreter,
	dispatcher: Dispatcher,
}

impl BridgeSplitter {
	pub fn new(
		config: PipelineConfig,
		account: Arc<AccountService>,
		delivery: Arc<DeliveryService>,
	) -> Self {
		let interpreter = RouteInterpreter::new(config.bridge_address, config.chain_id);
		let dispatcher = Dispatcher::new(delivery.clone(), &config);
		Self {
			config,
			account,
			delivery,
			interpreter,
			dispatcher,
		}
	}

	pub fn config(&self) -> &PipelineConfig {
		&self.config
	}

	pub fn dispatcher(&self) -> &Dispatcher {
		&self.dispatcher
	}

	/// Holder address and its native balance on the configured chain.
	pub async fn holder(&self) -> Result<(Address, U256), SplitterError> {
		let address = self.account.get_address().await?;
		let balance = self.delivery.get_balance(self.config.chain_id, address).await?;
		Ok((address, balance))
	}

	/// Builds the payload for `quote` without submitting anything.
	#[instrument(skip_all, fields(route_id = %truncate_id(&quote.id)))]
	pub async fn compose(&self, quote: &RouteQuote) -> Result<BridgePayload, SplitterError> {
		let route = self.interpreter.interpret(quote)?;
		tracing::info!(
			mode = %self.config.mode,
			has_source_swaps = route.has_source_swaps,
			has_destination_call = route.has_destination_call,
			is_native_from = route.is_native_from,
			"Interpreted route"
		);

		let refund_address = self.account.get_address().await?;
		let payload = BridgePayload::build(
			&route,
			self.config.mode,
			refund_address,
			self.config.splitter_address,
		)?;

		tracing::debug!(bridge_datas = ?payload.legs.bridge_datas, "Bridge descriptors");
		tracing::debug!(swap_datas = ?payload.legs.swap_datas, "Swap descriptors");
		tracing::debug!(stargate_datas = ?payload.legs.stargate_datas, "Stargate descriptors");
		tracing::info!(
			legs = payload.legs.len(),
			fees = ?payload.legs.fees,
			total_fee = %payload.total_fee,
			"Composed payload"
		);

		Ok(payload)
	}

	/// Composes and dispatches `quote`, returning the bridge transaction hash.
	#[instrument(skip_all, fields(route_id = %truncate_id(&quote.id)))]
	pub async fn run(&self, quote: &RouteQuote) -> Result<TransactionHash, SplitterError> {
		let payload = self.compose(quote).await?;
		let hash = self.dispatcher.dispatch(&payload).await?;
		tracing::info!(tx_hash = %hash, "Bridge submitted");
		Ok(hash)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::abi::{IHecBridgeSplitter, IERC20};
	use crate::fixtures::{pipeline_config, QuoteFixture, CHAIN_ID, HOLDER, SPLITTER};
	use alloy_sol_types::SolCall;
	use splitter_delivery::testing::{DeliveryLog, RecordingDelivery};
	use splitter_delivery::DeliveryInterface;
	use std::collections::HashMap;

	const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn splitter(mode: Mode, delivery: RecordingDelivery) -> (BridgeSplitter, DeliveryLog) {
		let log = delivery.log();
		let mut providers: HashMap<u64, Box<dyn DeliveryInterface>> = HashMap::new();
		providers.insert(CHAIN_ID, Box::new(delivery));
		let delivery = Arc::new(DeliveryService::new(providers, 1));

		let key: toml::Value = toml::from_str(&format!("private_key = \"{}\"", ANVIL_KEY)).unwrap();
		let account = Arc::new(AccountService::from_config("local", &key).unwrap());

		(
			BridgeSplitter::new(pipeline_config(mode), account, delivery),
			log,
		)
	}

	#[tokio::test]
	async fn test_compose_refunds_to_holder() {
		let (splitter, log) = splitter(Mode::Multi, RecordingDelivery::new());
		let payload = splitter.compose(&QuoteFixture::token_swap().build()).await.unwrap();

		assert_eq!(payload.legs.len(), 2);
		assert!(payload
			.legs
			.stargate_datas
			.iter()
			.all(|s| s.refundAddress == HOLDER));
		assert!(log.events().is_empty());
	}

	#[tokio::test]
	async fn test_run_token_swap_in_multi_mode() {
		let (splitter, log) = splitter(Mode::Multi, RecordingDelivery::new());
		splitter.run(&QuoteFixture::token_swap().build()).await.unwrap();

		let submitted = log.submitted();
		assert_eq!(submitted.len(), 2);
		assert_eq!(submitted[0].data[..4], IERC20::approveCall::SELECTOR);
		assert_eq!(
			submitted[1].data[..4],
			IHecBridgeSplitter::swapAndStartBridgeTokensViaStargateCall::SELECTOR
		);
		assert_eq!(submitted[1].to, Some(SPLITTER));
		assert_eq!(submitted[1].value, U256::from(200u64));
		assert_eq!(log.confirmations_requested(), vec![1, 1]);
	}

	#[tokio::test]
	async fn test_run_rejects_quote_without_cross_step() {
		let (splitter, log) = splitter(Mode::Single, RecordingDelivery::new());
		let quote = QuoteFixture {
			include_cross: false,
			..QuoteFixture::token_bridge()
		}
		.build();

		let result = splitter.run(&quote).await;
		assert!(matches!(
			result,
			Err(SplitterError::Route(RouteError::MissingCrossStep))
		));
		assert!(log.events().is_empty());
	}

	#[tokio::test]
	async fn test_compose_native_demo_route() {
		let quote: RouteQuote =
			serde_json::from_str(include_str!("../../../demos/stargate_route.json")).unwrap();
		let (splitter, _log) = splitter(Mode::Single, RecordingDelivery::new());

		let payload = splitter.compose(&quote).await.unwrap();
		assert_eq!(payload.entry_point(), EntryPoint::SwapAndStartBridge);
		assert!(payload.approval.is_none());
		assert_eq!(
			payload.total_fee,
			U256::from(11_219_844_712_389_678_421u128)
		);

		let swap = &payload.legs.swap_datas.as_ref().unwrap()[0][0];
		assert_eq!(swap.sendingAssetId, splitter_types::ZERO_ADDRESS);
		assert!(!payload.legs.bridge_datas[0].hasDestinationCall);
	}

	#[tokio::test]
	async fn test_holder_balance() {
		let delivery = RecordingDelivery::new().with_balance(U256::from(5u64));
		let (splitter, _log) = splitter(Mode::Single, delivery);
		let (address, balance) = splitter.holder().await.unwrap();
		assert_eq!(address, HOLDER);
		assert_eq!(balance, U256::from(5u64));
	}

	#[test]
	fn test_pipeline_config_from_config() {
		let config: Config = r#"
[splitter]
id = "hec-bridge-ftm"
mode = "multi"
network = "ftm"
splitter_address = "0x19Fc4D72A9D400A19540f41D3728027B89f5Ccd0"
bridge_address = "0x1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE"

[networks.ftm]
chain_id = 250
rpc_url = "https://rpc.ftm.tools"

[delivery]
min_confirmations = 3

[account]
primary = "local"

[account.implementations.local]
private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
"#
		.parse()
		.unwrap();

		let pipeline = PipelineConfig::from_config(&config).unwrap();
		assert_eq!(pipeline.mode, Mode::Multi);
		assert_eq!(pipeline.chain_id, 250);
		assert_eq!(pipeline.splitter_address, SPLITTER);
		assert_eq!(pipeline.min_confirmations, 3);
		assert_eq!(pipeline.with_mode(Mode::Single).mode, Mode::Single);
	}
}
