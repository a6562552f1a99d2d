// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Health check handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crashcatcher_core::Stage;
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
	Healthy,
	Unhealthy,
}

/// Whether each stage directory is usable.
#[derive(Debug, Serialize)]
pub struct StoreHealth {
	pub incoming: bool,
	pub raw: bool,
	pub processed: bool,
}

impl StoreHealth {
	fn all_ok(&self) -> bool {
		self.incoming && self.raw && self.processed
	}
}

#[derive(Debug, Serialize)]
pub struct LimiterHealth {
	pub capacity: usize,
	pub available: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub timestamp: String,
	pub mode: &'static str,
	pub store: StoreHealth,
	/// Crashes waiting in `incoming`; absent when the listing failed.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pending: Option<usize>,
	pub limiter: LimiterHealth,
}

async fn stage_ok(state: &AppState, stage: Stage) -> bool {
	match state.store.check_stage(stage).await {
		Ok(()) => true,
		Err(e) => {
			tracing::warn!(stage = %stage, error = %e, "stage directory check failed");
			false
		}
	}
}

/// GET /health - store and processing status.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let (incoming, raw, processed) = tokio::join!(
		stage_ok(&state, Stage::Incoming),
		stage_ok(&state, Stage::Raw),
		stage_ok(&state, Stage::Processed),
	);
	let store = StoreHealth {
		incoming,
		raw,
		processed,
	};

	let pending = state.store.list_pending().await.ok().map(|ids| ids.len());
	let limiter = state.processor.limiter();

	let status = if store.all_ok() {
		HealthStatus::Healthy
	} else {
		HealthStatus::Unhealthy
	};

	let response = HealthResponse {
		status,
		timestamp: chrono::Utc::now().to_rfc3339(),
		mode: state.mode(),
		store,
		pending,
		limiter: LimiterHealth {
			capacity: limiter.capacity(),
			available: limiter.available(),
		},
	};

	let http_status = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(http_status, Json(response))
}
