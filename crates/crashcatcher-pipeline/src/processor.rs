// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Analyze, persist, archive.

use std::fmt;
use std::sync::Arc;

use crashcatcher_core::{CrashId, Stage};
use crashcatcher_store::{CrashStore, StoreError};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::analyzer::Analyzer;
use crate::limiter::ProcessingLimiter;

/// What to do when the analyzer cannot be launched or exits non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerFailurePolicy {
	/// Write nothing and leave the crash in `incoming` for a later recovery run.
	#[default]
	Retry,
	/// Keep whatever the analyzer printed (possibly nothing) and archive.
	BestEffort,
}

impl fmt::Display for AnalyzerFailurePolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AnalyzerFailurePolicy::Retry => write!(f, "retry"),
			AnalyzerFailurePolicy::BestEffort => write!(f, "best_effort"),
		}
	}
}

/// Why a crash is still in `incoming` after processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingReason {
	LookupFailed,
	/// The dump is in both `incoming` and `raw`; left for an operator.
	Conflict,
	AnalyzerFailed,
	PersistFailed,
	ArchiveFailed,
}

/// Terminal result of one processing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
	/// Analysis written to `processed`, dump and metadata moved to `raw`.
	Archived { bytes: usize },
	/// The crash was not pending; nothing was touched.
	Skipped,
	/// The crash is still pending and will be picked up by recovery.
	Pending(PendingReason),
}

impl ProcessOutcome {
	pub fn is_archived(&self) -> bool {
		matches!(self, ProcessOutcome::Archived { .. })
	}
}

/// Runs the analyzer over pending crashes, one limiter slot per run.
pub struct CrashProcessor {
	store: Arc<dyn CrashStore>,
	analyzer: Arc<dyn Analyzer>,
	limiter: ProcessingLimiter,
	policy: AnalyzerFailurePolicy,
}

impl CrashProcessor {
	pub fn new(
		store: Arc<dyn CrashStore>,
		analyzer: Arc<dyn Analyzer>,
		limiter: ProcessingLimiter,
		policy: AnalyzerFailurePolicy,
	) -> Self {
		Self {
			store,
			analyzer,
			limiter,
			policy,
		}
	}

	pub fn store(&self) -> &Arc<dyn CrashStore> {
		&self.store
	}

	pub fn limiter(&self) -> &ProcessingLimiter {
		&self.limiter
	}

	pub fn policy(&self) -> AnalyzerFailurePolicy {
		self.policy
	}

	/// Process one crash to a terminal outcome. Failures are logged and
	/// reported through the outcome; this never errors.
	#[instrument(skip(self), fields(crash_id = %id))]
	pub async fn process(&self, id: CrashId) -> ProcessOutcome {
		match self.store.locate(id).await {
			Ok(Some(Stage::Incoming)) => {}
			Ok(stage) => {
				debug!(?stage, "crash is not pending, skipping");
				return ProcessOutcome::Skipped;
			}
			Err(e @ StoreError::Conflict { .. }) => {
				error!(error = %e, "crash is both pending and archived, not processing");
				return ProcessOutcome::Pending(PendingReason::Conflict);
			}
			Err(e) => {
				warn!(error = %e, "could not locate crash, leaving it for recovery");
				return ProcessOutcome::Pending(PendingReason::LookupFailed);
			}
		}

		let _permit = self.limiter.acquire().await;
		debug!(available = self.limiter.available(), "acquired processing slot");

		let dump_path = self.store.dump_path(Stage::Incoming, id);
		let analysis = match self.analyzer.analyze(&dump_path).await {
			Ok(output) => output,
			Err(e) => match self.policy {
				AnalyzerFailurePolicy::Retry => {
					error!(error = %e, "analyzer failed, crash stays pending");
					return ProcessOutcome::Pending(PendingReason::AnalyzerFailed);
				}
				AnalyzerFailurePolicy::BestEffort => {
					warn!(error = %e, "analyzer failed, keeping captured output");
					e.captured_stdout().to_vec()
				}
			},
		};

		if let Err(e) = self.store.put_analysis(id, &analysis).await {
			error!(error = %e, "failed to write analysis");
			return ProcessOutcome::Pending(PendingReason::PersistFailed);
		}

		if let Err(e) = self.store.archive(id).await {
			error!(error = %e, "failed to archive crash");
			return ProcessOutcome::Pending(PendingReason::ArchiveFailed);
		}

		info!(bytes = analysis.len(), "crash processed");
		ProcessOutcome::Archived {
			bytes: analysis.len(),
		}
	}

	/// Run [`CrashProcessor::process`] on its own task.
	pub fn spawn(self: &Arc<Self>, id: CrashId) -> JoinHandle<ProcessOutcome> {
		let processor = Arc::clone(self);
		tokio::spawn(async move { processor.process(id).await })
	}
}

impl fmt::Debug for CrashProcessor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CrashProcessor")
			.field("limiter", &self.limiter)
			.field("policy", &self.policy)
			.finish_non_exhaustive()
	}
}
