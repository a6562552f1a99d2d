// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The crash record.

use crate::id::CrashId;
use crate::metadata::CrashMetadata;

/// One reported crash: a minidump, the form fields that came with it and,
/// once the analyzer has run, its textual output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crash {
	pub id: CrashId,
	pub metadata: CrashMetadata,
	pub dump: Vec<u8>,
	/// Absent until processing succeeds.
	pub analysis: Option<Vec<u8>>,
}

impl Crash {
	/// A freshly received crash with a newly assigned id.
	pub fn new(metadata: CrashMetadata, dump: Vec<u8>) -> Self {
		Self {
			id: CrashId::generate(),
			metadata,
			dump,
			analysis: None,
		}
	}

	/// A crash rebuilt from artifacts already on disk.
	pub fn from_parts(id: CrashId, metadata: CrashMetadata, dump: Vec<u8>) -> Self {
		Self {
			id,
			metadata,
			dump,
			analysis: None,
		}
	}

	pub fn is_analyzed(&self) -> bool {
		self.analysis.is_some()
	}
}
