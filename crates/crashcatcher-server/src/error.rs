// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	extract::multipart::MultipartError,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use crashcatcher_store::StoreError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// The upload was not a usable crash report.
	#[error("Invalid request: {0}")]
	BadRequest(String),

	/// The multipart body could not be read.
	#[error("Multipart error: {0}")]
	Multipart(#[from] MultipartError),

	/// Crash storage failed.
	#[error("Storage error: {0}")]
	Store(#[from] StoreError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, body) = match &self {
			ServerError::BadRequest(msg) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse {
					error: "bad_request".to_string(),
					message: msg.clone(),
				},
			),
			ServerError::Multipart(e) => (
				e.status(),
				ErrorResponse {
					error: "invalid_multipart".to_string(),
					message: e.body_text(),
				},
			),
			ServerError::Store(e) => {
				tracing::error!(error = %e, "storage error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse {
						error: "storage_error".to_string(),
						message: "The crash could not be stored".to_string(),
					},
				)
			}
		};

		(status, Json(body)).into_response()
	}
}
