// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The crash store contract.

use std::path::PathBuf;

use async_trait::async_trait;
use crashcatcher_core::{Crash, CrashId, CrashMetadata, Stage};

use crate::error::Result;

/// Storage for crash artifacts, organised in stages.
///
/// The pipeline only talks to this trait, so a backend that is not a local
/// directory tree (a database, an object store) can stand in as long as it
/// keeps these guarantees:
///
/// - a crash is pending iff its dump is in [`Stage::Incoming`]
/// - [`CrashStore::move_crash`] moves the metadata before the dump and can be
///   re-run after an interruption
/// - writes are never observable half-done
#[async_trait]
pub trait CrashStore: Send + Sync {
	/// Write the metadata record for `id` into `stage`.
	async fn put_metadata(&self, stage: Stage, id: CrashId, metadata: &CrashMetadata) -> Result<()>;

	/// Write the dump for `id` into `stage`.
	async fn put_dump(&self, stage: Stage, id: CrashId, dump: &[u8]) -> Result<()>;

	/// Write analyzer output for `id` into [`Stage::Processed`], replacing any
	/// earlier output.
	async fn put_analysis(&self, id: CrashId, analysis: &[u8]) -> Result<()>;

	async fn read_dump(&self, stage: Stage, id: CrashId) -> Result<Vec<u8>>;

	/// Metadata is best-effort: `None` when no record exists.
	async fn read_metadata(&self, stage: Stage, id: CrashId) -> Result<Option<CrashMetadata>>;

	async fn read_analysis(&self, id: CrashId) -> Result<Option<Vec<u8>>>;

	/// The stage currently holding the dump for `id`, if any.
	///
	/// A dump present in both `incoming` and `raw` is a
	/// [`StoreError::Conflict`](crate::StoreError::Conflict).
	async fn locate(&self, id: CrashId) -> Result<Option<Stage>>;

	/// Move the dump and metadata for `id` between `incoming` and `raw`.
	async fn move_crash(&self, id: CrashId, from: Stage, to: Stage) -> Result<()>;

	/// Every crash id whose dump is in `stage` (analysis outputs for
	/// [`Stage::Processed`]), sorted.
	async fn list(&self, stage: Stage) -> Result<Vec<CrashId>>;

	/// Remove the artifacts `id` has in `stage`. Missing files are ignored.
	async fn discard(&self, stage: Stage, id: CrashId) -> Result<()>;

	/// Check that `stage` is reachable and usable.
	async fn check_stage(&self, stage: Stage) -> Result<()>;

	/// Local filesystem path of the dump handed to the analyzer.
	fn dump_path(&self, stage: Stage, id: CrashId) -> PathBuf;

	/// Archive an analyzed crash: `incoming` -> `raw`.
	async fn archive(&self, id: CrashId) -> Result<()> {
		self.move_crash(id, Stage::Incoming, Stage::Raw).await
	}

	/// Crashes awaiting analysis.
	async fn list_pending(&self) -> Result<Vec<CrashId>> {
		self.list(Stage::Incoming).await
	}

	/// Rebuild the full crash record held in `stage`.
	async fn load(&self, stage: Stage, id: CrashId) -> Result<Crash> {
		let dump = self.read_dump(stage, id).await?;
		let metadata = self.read_metadata(stage, id).await?.unwrap_or_default();
		let mut crash = Crash::from_parts(id, metadata, dump);
		crash.analysis = self.read_analysis(id).await?;
		Ok(crash)
	}
}
