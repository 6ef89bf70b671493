//! Main entry point for the bridge splitter.
//!
//! Loads a configuration and a route quote, then composes and submits one
//! HecBridgeSplitter call for the configured account. The bridge transaction
//! hash is printed to stdout; any failure ends the process with a non-zero
//! exit status.

use clap::Parser;
use splitter_account::{AccountError, AccountService};
use splitter_config::{Config, ConfigError};
use splitter_core::{BridgePayload, BridgeSplitter, PipelineConfig, SplitterError};
use splitter_delivery::implementations::evm::alloy::create_http_delivery;
use splitter_delivery::{DeliveryError, DeliveryInterface, DeliveryService};
use splitter_types::{format_token_amount, Mode, RouteQuote};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Command-line arguments for the splitter.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Path to the route quote JSON
	#[arg(short, long)]
	quote: PathBuf,

	/// Leg mode, overriding the configuration (single, multi)
	#[arg(short, long)]
	mode: Option<Mode>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Compose and log the payload without submitting it
	#[arg(long)]
	dry_run: bool,
}

/// Errors surfaced by the binary.
#[derive(Debug, Error)]
enum ServiceError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error("Failed to read quote {path}: {source}")]
	QuoteRead {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("Invalid quote {path}: {source}")]
	QuoteParse {
		path: PathBuf,
		source: serde_json::Error,
	},
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	#[error("Delivery error: {0}")]
	Delivery(#[from] DeliveryError),
	#[error(transparent)]
	Splitter(#[from] SplitterError),
}

#[tokio::main]
async fn main() {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
	fmt().with_env_filter(env_filter).with_target(true).init();

	if let Err(e) = run(args).await {
		tracing::error!("{}", e);
		std::process::exit(1);
	}
}

async fn run(args: Args) -> Result<(), ServiceError> {
	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.splitter.id);

	let quote = load_quote(&args.quote).await?;
	let splitter = build_splitter(&config, args.mode)?;

	let (holder, balance) = splitter.holder().await?;
	tracing::info!(
		%holder,
		balance = %format_token_amount(balance, 18),
		mode = %splitter.config().mode,
		"Using account"
	);

	if args.dry_run {
		let payload = splitter.compose(&quote).await?;
		log_dry_run(&splitter, &payload)?;
		return Ok(());
	}

	let hash = splitter.run(&quote).await?;
	println!("{}", hash);
	Ok(())
}

/// Reads and deserializes a route quote document.
async fn load_quote(path: &Path) -> Result<RouteQuote, ServiceError> {
	let contents = tokio::fs::read_to_string(path)
		.await
		.map_err(|source| ServiceError::QuoteRead {
			path: path.to_path_buf(),
			source,
		})?;
	serde_json::from_str(&contents).map_err(|source| ServiceError::QuoteParse {
		path: path.to_path_buf(),
		source,
	})
}

/// Wires the account, delivery and pipeline for the configured network.
fn build_splitter(config: &Config, mode: Option<Mode>) -> Result<BridgeSplitter, ServiceError> {
	let account_config = config.account.primary_config().ok_or_else(|| {
		ConfigError::Validation(format!(
			"Primary account '{}' not found in implementations",
			config.account.primary
		))
	})?;
	let account = AccountService::from_config(&config.account.primary, account_config)?;

	let network = config.network()?;
	let provider = create_http_delivery(
		network,
		&account.get_private_key(),
		Duration::from_secs(config.delivery.poll_interval_seconds),
	)?;
	let mut providers: HashMap<u64, Box<dyn DeliveryInterface>> = HashMap::new();
	providers.insert(network.chain_id, provider);
	let delivery = DeliveryService::new(providers, config.delivery.min_confirmations);

	let mut pipeline = PipelineConfig::from_config(config)?;
	if let Some(mode) = mode {
		pipeline = pipeline.with_mode(mode);
	}

	Ok(BridgeSplitter::new(
		pipeline,
		Arc::new(account),
		Arc::new(delivery),
	))
}

fn log_dry_run(splitter: &BridgeSplitter, payload: &BridgePayload) -> Result<(), ServiceError> {
	let dispatcher = splitter.dispatcher();

	if let Some(approval) = &payload.approval {
		let tx = dispatcher.approval_transaction(approval);
		tracing::info!(
			token = %approval.token,
			spender = %approval.spender,
			amount = %approval.amount,
			calldata = %tx.data,
			"Dry run: approval"
		);
	}

	let tx = dispatcher
		.bridge_transaction(payload)
		.map_err(SplitterError::from)?;
	tracing::info!(
		entry_point = %payload.entry_point(),
		value = %tx.value,
		calldata = %tx.data,
		"Dry run: bridge call"
	);
	Ok(())
}
