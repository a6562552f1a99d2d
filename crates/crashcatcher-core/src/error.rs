// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for crash core types.

use thiserror::Error;

/// Errors that can occur when parsing or converting core crash types.
#[derive(Debug, Error)]
pub enum CrashError {
	#[error("invalid crash id: {0}")]
	InvalidCrashId(String),

	#[error("invalid stage: {0}")]
	InvalidStage(String),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for crash core operations.
pub type Result<T> = std::result::Result<T, CrashError>;
