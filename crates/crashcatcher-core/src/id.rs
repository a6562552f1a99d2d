// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash identity generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CrashError;

/// Prefix Breakpad clients expect in front of a crash id in the submit response.
pub const CRASH_ID_PREFIX: &str = "bp-";

/// Unique identifier for a crash.
///
/// Always rendered as the 36-character lowercase hyphenated form
/// (`8-4-4-4-12`). The id doubles as the file stem of every artifact the
/// store keeps for the crash, so parsing only accepts that exact spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CrashId(Uuid);

impl CrashId {
	/// Generate a fresh random (version 4) crash id.
	///
	/// # Panics
	///
	/// Panics if the operating system's randomness source is unavailable.
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}

	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}

	/// The value returned to Breakpad clients, e.g. `bp-6f1c...`.
	pub fn to_breakpad_string(&self) -> String {
		format!("{CRASH_ID_PREFIX}{}", self)
	}
}

/// Assign a new crash id.
pub fn new_crash_id() -> CrashId {
	CrashId::generate()
}

impl fmt::Display for CrashId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.hyphenated())
	}
}

impl FromStr for CrashId {
	type Err = CrashError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let uuid = Uuid::try_parse(s).map_err(|_| CrashError::InvalidCrashId(s.to_string()))?;
		let id = Self(uuid);
		// Uuid also accepts braced, urn, simple and uppercase spellings.
		if id.to_string() != s {
			return Err(CrashError::InvalidCrashId(s.to_string()));
		}
		Ok(id)
	}
}

impl TryFrom<String> for CrashId {
	type Error = CrashError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<CrashId> for String {
	fn from(id: CrashId) -> Self {
		id.to_string()
	}
}
