// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage stages a crash moves through.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CrashError;

/// A storage area holding crash artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
	/// Received, not yet analyzed. Dump and metadata.
	Incoming,
	/// Analyzed and archived. Dump and metadata.
	Raw,
	/// Analyzer output.
	Processed,
}

impl Stage {
	pub const ALL: [Stage; 3] = [Stage::Incoming, Stage::Raw, Stage::Processed];

	/// Directory name of this stage inside the data root.
	pub fn dir_name(&self) -> &'static str {
		match self {
			Stage::Incoming => "incoming",
			Stage::Raw => "raw",
			Stage::Processed => "processed",
		}
	}

	/// Whether this stage holds a crash's dump and metadata.
	pub fn holds_dumps(&self) -> bool {
		matches!(self, Stage::Incoming | Stage::Raw)
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.dir_name())
	}
}

impl FromStr for Stage {
	type Err = CrashError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"incoming" => Ok(Stage::Incoming),
			"raw" => Ok(Stage::Raw),
			"processed" => Ok(Stage::Processed),
			_ => Err(CrashError::InvalidStage(s.to_string())),
		}
	}
}
