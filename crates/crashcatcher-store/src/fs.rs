// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filesystem-backed crash store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use crashcatcher_core::{CrashId, CrashMetadata, Stage};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use crate::error::{Result, StoreError};
use crate::layout::{classify, temp_name, ArtifactKind, EntryName};
use crate::store::CrashStore;

#[cfg(unix)]
const FILE_MODE: u32 = 0o600;
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// Crash store rooted at a local directory with one subdirectory per stage.
#[derive(Debug, Clone)]
pub struct FsCrashStore {
	root: PathBuf,
}

/// What a single rename found.
#[derive(Debug, PartialEq, Eq)]
enum MoveResult {
	Moved,
	/// Source gone, destination present: an earlier run got here first.
	AlreadyMoved,
	/// Neither source nor destination exists.
	Missing,
}

impl FsCrashStore {
	/// Open the store at `root`, creating the stage directories if needed.
	pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
		let store = Self { root: root.into() };
		for stage in Stage::ALL {
			let dir = store.stage_dir(stage);
			let mut builder = tokio::fs::DirBuilder::new();
			builder.recursive(true);
			#[cfg(unix)]
			builder.mode(DIR_MODE);
			builder
				.create(&dir)
				.await
				.map_err(|e| StoreError::io(&dir, e))?;
		}
		debug!(root = %store.root.display(), "opened crash store");
		Ok(store)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn stage_dir(&self, stage: Stage) -> PathBuf {
		self.root.join(stage.dir_name())
	}

	fn artifact_path(&self, stage: Stage, id: CrashId, kind: ArtifactKind) -> PathBuf {
		self.stage_dir(stage).join(kind.file_name(id))
	}

	fn checked_path(&self, stage: Stage, id: CrashId, kind: ArtifactKind) -> Result<PathBuf> {
		if !kind.allowed_in(stage) {
			return Err(StoreError::WrongStage { kind, stage });
		}
		Ok(self.artifact_path(stage, id, kind))
	}
}

#[async_trait]
impl CrashStore for FsCrashStore {
	#[instrument(skip_all, fields(crash_id = %id, stage = %stage))]
	async fn put_metadata(&self, stage: Stage, id: CrashId, metadata: &CrashMetadata) -> Result<()> {
		let path = self.checked_path(stage, id, ArtifactKind::Metadata)?;
		let bytes = metadata.to_json_vec()?;
		write_atomic(&path, &bytes).await
	}

	#[instrument(skip_all, fields(crash_id = %id, stage = %stage, size = dump.len()))]
	async fn put_dump(&self, stage: Stage, id: CrashId, dump: &[u8]) -> Result<()> {
		let path = self.checked_path(stage, id, ArtifactKind::Dump)?;
		write_atomic(&path, dump).await
	}

	#[instrument(skip_all, fields(crash_id = %id, size = analysis.len()))]
	async fn put_analysis(&self, id: CrashId, analysis: &[u8]) -> Result<()> {
		let path = self.artifact_path(Stage::Processed, id, ArtifactKind::Analysis);
		write_atomic(&path, analysis).await
	}

	async fn read_dump(&self, stage: Stage, id: CrashId) -> Result<Vec<u8>> {
		let path = self.checked_path(stage, id, ArtifactKind::Dump)?;
		match tokio::fs::read(&path).await {
			Ok(bytes) => Ok(bytes),
			Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound { id, stage }),
			Err(e) => Err(StoreError::io(path, e)),
		}
	}

	async fn read_metadata(&self, stage: Stage, id: CrashId) -> Result<Option<CrashMetadata>> {
		let path = self.checked_path(stage, id, ArtifactKind::Metadata)?;
		match read_optional(&path).await? {
			Some(bytes) => Ok(Some(CrashMetadata::from_json_slice(&bytes)?)),
			None => Ok(None),
		}
	}

	async fn read_analysis(&self, id: CrashId) -> Result<Option<Vec<u8>>> {
		let path = self.artifact_path(Stage::Processed, id, ArtifactKind::Analysis);
		read_optional(&path).await
	}

	async fn locate(&self, id: CrashId) -> Result<Option<Stage>> {
		let incoming = exists(&self.artifact_path(Stage::Incoming, id, ArtifactKind::Dump)).await?;
		let raw = exists(&self.artifact_path(Stage::Raw, id, ArtifactKind::Dump)).await?;
		match (incoming, raw) {
			(true, true) => Err(StoreError::Conflict {
				id,
				stage: Stage::Raw,
			}),
			(true, false) => Ok(Some(Stage::Incoming)),
			(false, true) => Ok(Some(Stage::Raw)),
			(false, false) => Ok(None),
		}
	}

	#[instrument(skip_all, fields(crash_id = %id, from = %from, to = %to))]
	async fn move_crash(&self, id: CrashId, from: Stage, to: Stage) -> Result<()> {
		if from == to || !from.holds_dumps() || !to.holds_dumps() {
			return Err(StoreError::InvalidTransition { from, to });
		}

		let src = self.artifact_path(from, id, ArtifactKind::Dump);
		let dst = self.artifact_path(to, id, ArtifactKind::Dump);
		if exists(&src).await? && exists(&dst).await? {
			return Err(StoreError::Conflict { id, stage: to });
		}

		// Metadata first, dump last: the dump decides whether the crash is
		// still pending, so an interruption between the two renames leaves
		// it in `from` and a re-run completes the move.
		let meta_result = move_artifact(
			&self.artifact_path(from, id, ArtifactKind::Metadata),
			&self.artifact_path(to, id, ArtifactKind::Metadata),
		)
		.await?;
		if meta_result == MoveResult::Missing {
			warn!(crash_id = %id, "no metadata record to move");
		}

		match move_artifact(&src, &dst).await? {
			MoveResult::Moved => debug!("moved crash"),
			MoveResult::AlreadyMoved => debug!("crash already moved"),
			MoveResult::Missing => return Err(StoreError::NotFound { id, stage: from }),
		}
		Ok(())
	}

	async fn list(&self, stage: Stage) -> Result<Vec<CrashId>> {
		let dir = self.stage_dir(stage);
		let wanted = if stage == Stage::Processed {
			ArtifactKind::Analysis
		} else {
			ArtifactKind::Dump
		};

		let mut entries = tokio::fs::read_dir(&dir)
			.await
			.map_err(|e| StoreError::io(&dir, e))?;
		let mut ids = Vec::new();
		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StoreError::io(&dir, e))?
		{
			let name = entry.file_name();
			let name = name.to_string_lossy();
			match classify(&name) {
				EntryName::Artifact(id, kind) if kind == wanted => ids.push(id),
				EntryName::Artifact(..) | EntryName::Hidden => {}
				EntryName::Foreign => {
					if name.ends_with(wanted.extension()) {
						warn!(stage = %stage, file = %name, "ignoring file without a valid crash id");
					}
				}
			}
		}
		ids.sort();
		Ok(ids)
	}

	#[instrument(skip_all, fields(crash_id = %id, stage = %stage))]
	async fn discard(&self, stage: Stage, id: CrashId) -> Result<()> {
		let kinds: &[ArtifactKind] = if stage.holds_dumps() {
			&[ArtifactKind::Metadata, ArtifactKind::Dump]
		} else {
			&[ArtifactKind::Analysis]
		};
		for kind in kinds {
			let path = self.artifact_path(stage, id, *kind);
			match tokio::fs::remove_file(&path).await {
				Ok(()) => debug!(kind = %kind, "discarded artifact"),
				Err(e) if e.kind() == ErrorKind::NotFound => {}
				Err(e) => return Err(StoreError::io(path, e)),
			}
		}
		Ok(())
	}

	async fn check_stage(&self, stage: Stage) -> Result<()> {
		let dir = self.stage_dir(stage);
		let meta = tokio::fs::metadata(&dir)
			.await
			.map_err(|e| StoreError::io(&dir, e))?;
		if !meta.is_dir() {
			return Err(StoreError::io(
				&dir,
				std::io::Error::new(ErrorKind::Other, "stage path is not a directory"),
			));
		}
		if meta.permissions().readonly() {
			return Err(StoreError::io(
				&dir,
				std::io::Error::new(ErrorKind::PermissionDenied, "stage directory is read-only"),
			));
		}
		Ok(())
	}

	fn dump_path(&self, stage: Stage, id: CrashId) -> PathBuf {
		self.artifact_path(stage, id, ArtifactKind::Dump)
	}
}

/// Write `data` to `path` through a synced temp file in the same directory.
///
/// Readers see either the previous file or the complete new one.
async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
	let dir = path.parent().unwrap_or_else(|| Path::new("."));
	let final_name = path
		.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_default();
	let tmp = dir.join(temp_name(&final_name));

	let mut options = tokio::fs::OpenOptions::new();
	options.write(true).create_new(true);
	#[cfg(unix)]
	options.mode(FILE_MODE);

	let mut file = options
		.open(&tmp)
		.await
		.map_err(|e| StoreError::io(&tmp, e))?;
	let written = async {
		file.write_all(data).await?;
		file.sync_all().await
	}
	.await;
	drop(file);
	if let Err(e) = written {
		let _ = tokio::fs::remove_file(&tmp).await;
		return Err(StoreError::io(&tmp, e));
	}

	if let Err(e) = tokio::fs::rename(&tmp, path).await {
		let _ = tokio::fs::remove_file(&tmp).await;
		return Err(StoreError::io(path, e));
	}
	sync_dir(dir).await;
	Ok(())
}

async fn move_artifact(src: &Path, dst: &Path) -> Result<MoveResult> {
	match tokio::fs::rename(src, dst).await {
		Ok(()) => {
			if let Some(dir) = dst.parent() {
				sync_dir(dir).await;
			}
			Ok(MoveResult::Moved)
		}
		Err(e) if e.kind() == ErrorKind::NotFound => {
			if exists(dst).await? {
				Ok(MoveResult::AlreadyMoved)
			} else {
				Ok(MoveResult::Missing)
			}
		}
		Err(e) => Err(StoreError::io(src, e)),
	}
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
	match tokio::fs::read(path).await {
		Ok(bytes) => Ok(Some(bytes)),
		Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
		Err(e) => Err(StoreError::io(path, e)),
	}
}

async fn exists(path: &Path) -> Result<bool> {
	tokio::fs::try_exists(path)
		.await
		.map_err(|e| StoreError::io(path, e))
}

/// Best-effort fsync of a directory so renames survive power loss.
async fn sync_dir(dir: &Path) {
	if let Ok(handle) = tokio::fs::File::open(dir).await {
		let _ = handle.sync_all().await;
	}
}
