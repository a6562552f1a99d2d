// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! File naming for crash artifacts.

use std::fmt;

use crashcatcher_core::{CrashId, Stage};

/// The kinds of file kept per crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
	Metadata,
	Dump,
	Analysis,
}

impl ArtifactKind {
	pub fn extension(&self) -> &'static str {
		match self {
			ArtifactKind::Metadata => "json",
			ArtifactKind::Dump => "dump",
			ArtifactKind::Analysis => "txt",
		}
	}

	/// Whether files of this kind may live in `stage`.
	pub fn allowed_in(&self, stage: Stage) -> bool {
		match self {
			ArtifactKind::Metadata | ArtifactKind::Dump => stage.holds_dumps(),
			ArtifactKind::Analysis => stage == Stage::Processed,
		}
	}

	pub fn file_name(&self, id: CrashId) -> String {
		format!("{}.{}", id, self.extension())
	}

	fn from_extension(ext: &str) -> Option<Self> {
		match ext {
			"json" => Some(ArtifactKind::Metadata),
			"dump" => Some(ArtifactKind::Dump),
			"txt" => Some(ArtifactKind::Analysis),
			_ => None,
		}
	}
}

impl fmt::Display for ArtifactKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ArtifactKind::Metadata => f.write_str("metadata"),
			ArtifactKind::Dump => f.write_str("dump"),
			ArtifactKind::Analysis => f.write_str("analysis"),
		}
	}
}

/// Outcome of classifying a directory entry name.
#[derive(Debug, PartialEq, Eq)]
pub enum EntryName {
	/// A crash artifact with a canonical id stem.
	Artifact(CrashId, ArtifactKind),
	/// Hidden files, including in-flight temp files.
	Hidden,
	/// Anything else.
	Foreign,
}

/// Classify a file name found in a stage directory.
pub fn classify(name: &str) -> EntryName {
	if name.starts_with('.') {
		return EntryName::Hidden;
	}
	let Some((stem, ext)) = name.rsplit_once('.') else {
		return EntryName::Foreign;
	};
	let Some(kind) = ArtifactKind::from_extension(ext) else {
		return EntryName::Foreign;
	};
	match stem.parse::<CrashId>() {
		Ok(id) => EntryName::Artifact(id, kind),
		Err(_) => EntryName::Foreign,
	}
}

/// Name of the temp file a write to `final_name` goes through.
pub fn temp_name(final_name: &str) -> String {
	format!(".{}.{}.tmp", final_name, uuid::Uuid::new_v4().simple())
}
