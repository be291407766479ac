// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Snag issue tracker server binary.

use clap::{Parser, Subcommand};
use snag_server::{create_app_state, create_router};
use std::path::PathBuf;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Snag server - HTTP server for the Snag issue tracker.
#[derive(Parser, Debug)]
#[command(name = "snag-server", about = "Snag issue tracker server", version)]
struct Args {
	/// Path to a TOML configuration file
	#[arg(long)]
	config: Option<PathBuf>,

	/// Subcommands for snag-server (e.g., `version`)
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Parse CLI arguments
	let args = Args::parse();

	// Handle subcommands that should not start the server
	if let Some(Command::Version) = args.command {
		println!("snag-server version: {}", env!("CARGO_PKG_VERSION"));
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	// Load configuration
	let config = match args.config {
		Some(ref path) => snag_server_config::load_config_with_file(path)?,
		None => snag_server_config::load_config()?,
	};

	// Setup tracing
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
			host = %config.http.host,
			port = config.http.port,
			database = %config.database.url,
			"starting snag-server"
	);

	// Create database pool and run migrations
	let pool = snag_server_db::create_pool(&config.database.url).await?;
	snag_server_db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config);

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	// Start server
	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	// Run server with graceful shutdown
	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
