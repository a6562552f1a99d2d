// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for crash store operations.

use std::path::PathBuf;

use crashcatcher_core::{CrashError, CrashId, Stage};
use thiserror::Error;

use crate::layout::ArtifactKind;

/// Errors that can occur in crash store operations.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("crash {id} not found in {stage}")]
	NotFound { id: CrashId, stage: Stage },

	#[error("cannot move crash from {from} to {to}")]
	InvalidTransition { from: Stage, to: Stage },

	#[error("{kind} artifacts are not stored in {stage}")]
	WrongStage { kind: ArtifactKind, stage: Stage },

	#[error("crash {id} already present in {stage}")]
	Conflict { id: CrashId, stage: Stage },

	#[error("invalid metadata record: {0}")]
	Metadata(#[from] CrashError),
}

impl StoreError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		StoreError::Io {
			path: path.into(),
			source,
		}
	}
}

/// Result type for crash store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
