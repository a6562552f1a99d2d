// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the processing pipeline.

use std::process::ExitStatus;

use crashcatcher_store::StoreError;
use thiserror::Error;

/// A failed analyzer run.
#[derive(Debug, Error)]
pub enum AnalyzerError {
	#[error("failed to launch analyzer {program}: {source}")]
	Launch {
		program: String,
		#[source]
		source: std::io::Error,
	},

	/// The analyzer ran but exited unsuccessfully. Whatever it printed is kept.
	#[error("analyzer exited with {status}")]
	ExitStatus {
		status: ExitStatus,
		stdout: Vec<u8>,
		stderr: Vec<u8>,
	},
}

impl AnalyzerError {
	/// Standard output captured before the failure, if the analyzer ran at all.
	pub fn captured_stdout(&self) -> &[u8] {
		match self {
			AnalyzerError::Launch { .. } => &[],
			AnalyzerError::ExitStatus { stdout, .. } => stdout,
		}
	}
}

/// Errors surfaced by pipeline entry points.
#[derive(Debug, Error)]
pub enum PipelineError {
	#[error("store error: {0}")]
	Store(#[from] StoreError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
