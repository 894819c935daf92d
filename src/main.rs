//! kdx - command line smoke test for the Kythera KDX client.
//!
//! Signs in with the configured credentials and reports the token state and
//! the number of enabled funds.

#![deny(clippy::all)]

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kythera_kdx::config::{ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_TENANT_ID};
use kythera_kdx::{ClientConfig, ConfigOverrides, Kdx, KdxError};

#[tokio::main]
async fn main() {
    // Load .env file (if present) before anything else
    if let Err(e) = dotenvy::dotenv() {
        // .env file is optional - only log if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    init_logging();

    info!("Starting kdx v{}", env!("CARGO_PKG_VERSION"));

    let config = match ClientConfig::load(ConfigOverrides::default()) {
        Ok(c) => {
            info!("Configuration loaded successfully");
            c
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Configuration error: {}", e);
            eprintln!("\nPlease set the following environment variables:");
            eprintln!("  {}=<your-azure-ad-client-id>", ENV_CLIENT_ID);
            eprintln!("  {}=<optional, enables service principal sign-in>", ENV_CLIENT_SECRET);
            eprintln!("  {}=<optional tenant id>", ENV_TENANT_ID);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        let hint = e
            .downcast_ref::<KdxError>()
            .map(KdxError::user_message)
            .unwrap_or("An error occurred.");
        eprintln!("{}\n{:#}", hint, e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

async fn run(config: ClientConfig) -> Result<()> {
    let kdx = Kdx::new(config).context("Failed to create client")?;
    println!("Before sign-in: {}", kdx.get_token_info());

    let funds = kdx
        .funds()
        .get_funds(true, false)
        .await
        .context("Failed to list funds")?;

    println!("After sign-in: {}", kdx.get_token_info());
    println!("{} enabled funds", funds.len());
    for fund in funds.iter().take(10) {
        println!(
            "  {:>6}  {}",
            fund.id.map(|id| id.to_string()).unwrap_or_default(),
            fund.short_name.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
