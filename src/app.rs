//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - starts the HTTP server, or runs a single forecast and prints it

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Command, ForecastArgs, ServeArgs};
use crate::error::AppError;

pub mod pipeline;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "placement_forecast=info,tower_http=info";

/// Entry point for the `placement-forecast` binary.
pub fn run() -> Result<(), AppError> {
    // Optional; a missing .env is fine.
    dotenvy::dotenv().ok();
    init_tracing();

    let argv = crate::cli::rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Serve(args) => handle_serve(args),
        Command::Forecast(args) => handle_forecast(args),
    }
}

fn init_tracing() {
    // Logs go to stderr so `forecast` output on stdout stays machine-readable.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .try_init();
}

fn handle_serve(args: ServeArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::internal(format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(crate::server::serve(config))
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = args.common.to_config();
    crate::server::ensure_output_dirs(&config)?;

    let response = pipeline::run_forecast(&config, &args.department)?;
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| AppError::internal(format!("Failed to encode response: {e}")))?;
    println!("{json}");
    Ok(())
}
