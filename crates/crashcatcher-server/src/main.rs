// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! crashcatcher server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use crashcatcher_pipeline::RecoveryScanner;
use crashcatcher_server::{build_processor, create_app_state, create_router, ServerConfig};
use crashcatcher_store::{CrashStore, FsCrashStore};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// crashcatcher - collect and process Breakpad minidumps.
#[derive(Parser, Debug)]
#[command(name = "crashcatcher-server", about = "Breakpad crash collection server", version)]
struct Args {
	/// Path to a TOML config file (defaults to /etc/crashcatcher/server.toml)
	#[arg(long, global = true, env = "CRASHCATCHER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Accept crash uploads over HTTP (default)
	Serve {
		/// Store crashes without analyzing them
		#[arg(long)]
		collect_only: bool,
	},
	/// Process crashes left in `incoming` by an earlier run, then exit
	Recover,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Load .env file if present
	dotenvy::dotenv().ok();

	let mut config = match &args.config {
		Some(path) => crashcatcher_server_config::load_config_with_file(path)?,
		None => crashcatcher_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	match args.command.unwrap_or(Command::Serve { collect_only: false }) {
		Command::Serve { collect_only } => {
			if collect_only {
				config.processing.collect_only = true;
			}
			serve(config).await
		}
		Command::Recover => recover(config).await,
	}
}

async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		data_dir = %config.storage.data_dir.display(),
		collect_only = config.processing.collect_only,
		"starting crashcatcher-server"
	);
	if config.processing.collect_only {
		tracing::info!("collect-only mode, crashes will not be processed");
	}

	let state = create_app_state(&config).await?;
	let app = create_router(state).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	axum::serve(listener, app)
		.with_graceful_shutdown(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!(error = %e, "failed to listen for shutdown signal");
				std::future::pending::<()>().await;
			}
			tracing::info!("received shutdown signal");
		})
		.await?;

	tracing::info!("server shutdown complete");
	Ok(())
}

async fn recover(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
	tracing::info!(
		data_dir = %config.storage.data_dir.display(),
		max_concurrent = config.processing.max_concurrent,
		"processing pending crashes"
	);

	let store: Arc<dyn CrashStore> = Arc::new(FsCrashStore::open(&config.storage.data_dir).await?);
	let processor = build_processor(Arc::clone(&store), &config.processing);
	let report = RecoveryScanner::new(store, processor).recover_pending().await?;

	if report.pending > 0 || report.panicked > 0 {
		tracing::warn!(
			pending = report.pending,
			panicked = report.panicked,
			"some crashes are still pending"
		);
	}
	Ok(())
}
