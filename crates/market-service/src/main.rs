//! Main entry point for the marketplace order service.
//!
//! This binary wires the configured store backend into the order service
//! core and hosts the HTTP API. Catalog browsing, cart, and identity
//! resolution live in separate services; this process owns the order
//! lifecycle only.

use clap::Parser;
use market_config::Config;
use market_orders::OrderService;
use market_service::server;
use market_storage::{OrderStore, StoreError, StoreFactory};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line arguments for the order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the order service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the order store from the configured backend
/// 5. Serves the HTTP API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	tracing::info!("Started marketplace order service");

	// Load configuration
	let config = Config::from_file(args.config.to_string_lossy().as_ref()).await?;
	tracing::info!(
		"Loaded configuration [storage: {}]",
		config.storage.primary
	);

	// Build the configured store backend
	let store = build_store(&config)?;
	let orders = Arc::new(OrderService::new(Arc::from(store)));

	server::start_server(config.server.clone(), orders).await?;

	tracing::info!("Stopped marketplace order service");
	Ok(())
}

/// Resolves the configured store backend by name and constructs it.
fn build_store(config: &Config) -> Result<Box<dyn OrderStore>, StoreError> {
	let factories: HashMap<&str, StoreFactory> =
		market_storage::get_all_implementations().into_iter().collect();

	let primary = config.storage.primary.as_str();
	let factory = factories.get(primary).ok_or_else(|| {
		StoreError::Configuration(format!("unknown storage implementation: {}", primary))
	})?;

	let backend_config = config
		.storage
		.implementations
		.get(primary)
		.cloned()
		.unwrap_or_else(|| toml::Value::Table(Default::default()));

	factory(&backend_config)
}
