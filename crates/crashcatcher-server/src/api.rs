// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use std::sync::Arc;

use axum::{
	extract::DefaultBodyLimit,
	routing::{get, post},
	Router,
};
use crashcatcher_pipeline::{CommandAnalyzer, CrashProcessor, ProcessingLimiter};
use crashcatcher_server_config::{ProcessingConfig, ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use crashcatcher_store::{CrashStore, FsCrashStore};

use crate::error::ServerError;
use crate::routes;

/// Shared state for every request handler.
#[derive(Clone)]
pub struct AppState {
	pub store: Arc<dyn CrashStore>,
	pub processor: Arc<CrashProcessor>,
	/// Store uploads without analyzing them.
	pub collect_only: bool,
	pub max_upload_bytes: usize,
}

impl AppState {
	pub fn new(store: Arc<dyn CrashStore>, processor: Arc<CrashProcessor>) -> Self {
		Self {
			store,
			processor,
			collect_only: false,
			max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
		}
	}

	pub fn with_collect_only(mut self, collect_only: bool) -> Self {
		self.collect_only = collect_only;
		self
	}

	pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
		self.max_upload_bytes = max_upload_bytes;
		self
	}

	pub fn mode(&self) -> &'static str {
		if self.collect_only {
			"collect_only"
		} else {
			"serve"
		}
	}
}

/// Wire the configured analyzer, limiter and failure policy to `store`.
pub fn build_processor(store: Arc<dyn CrashStore>, config: &ProcessingConfig) -> Arc<CrashProcessor> {
	let analyzer = CommandAnalyzer::new(&config.analyzer_path).with_args(config.analyzer_args.clone());
	Arc::new(CrashProcessor::new(
		store,
		Arc::new(analyzer),
		ProcessingLimiter::new(config.max_concurrent),
		config.failure_policy,
	))
}

/// Open the crash store and build the processing pipeline from `config`.
pub async fn create_app_state(config: &ServerConfig) -> Result<AppState, ServerError> {
	let store: Arc<dyn CrashStore> = Arc::new(FsCrashStore::open(&config.storage.data_dir).await?);
	let processor = build_processor(Arc::clone(&store), &config.processing);

	Ok(AppState::new(store, processor)
		.with_collect_only(config.processing.collect_only)
		.with_max_upload_bytes(config.http.max_upload_bytes))
}

pub fn create_router(state: AppState) -> Router {
	let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

	Router::new()
		.route("/submit", post(routes::submit::submit_crash))
		.route("/health", get(routes::health::health_check))
		.layer(body_limit)
		.with_state(state)
}
