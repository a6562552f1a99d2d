// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resubmission of crashes left pending by an earlier run.

use std::sync::Arc;

use crashcatcher_store::CrashStore;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::processor::{CrashProcessor, ProcessOutcome};

/// Tally of one recovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryReport {
	pub found: usize,
	pub archived: usize,
	pub pending: usize,
	pub skipped: usize,
	pub panicked: usize,
}

impl RecoveryReport {
	fn record(&mut self, outcome: &ProcessOutcome) {
		match outcome {
			ProcessOutcome::Archived { .. } => self.archived += 1,
			ProcessOutcome::Pending(_) => self.pending += 1,
			ProcessOutcome::Skipped => self.skipped += 1,
		}
	}
}

/// Finds every pending crash and drives it through the processor.
pub struct RecoveryScanner {
	store: Arc<dyn CrashStore>,
	processor: Arc<CrashProcessor>,
}

impl RecoveryScanner {
	pub fn new(store: Arc<dyn CrashStore>, processor: Arc<CrashProcessor>) -> Self {
		Self { store, processor }
	}

	/// Submit every pending crash and wait until each one has reached a
	/// terminal outcome. Concurrency is bounded by the processor's limiter.
	///
	/// Only a failure to list `incoming` is an error.
	#[instrument(skip_all)]
	pub async fn recover_pending(&self) -> Result<RecoveryReport> {
		let pending = self.store.list_pending().await?;
		let mut report = RecoveryReport {
			found: pending.len(),
			..Default::default()
		};
		info!(count = report.found, "recovering pending crashes");

		let handles: Vec<_> = pending
			.into_iter()
			.map(|id| (id, self.processor.spawn(id)))
			.collect();

		for (id, handle) in handles {
			match handle.await {
				Ok(outcome) => report.record(&outcome),
				Err(e) => {
					error!(crash_id = %id, error = %e, "processing task panicked");
					report.panicked += 1;
				}
			}
		}

		info!(
			found = report.found,
			archived = report.archived,
			pending = report.pending,
			skipped = report.skipped,
			panicked = report.panicked,
			"recovery complete"
		);
		Ok(report)
	}
}
