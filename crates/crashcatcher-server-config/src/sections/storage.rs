// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash storage configuration section.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfigLayer {
	pub data_dir: Option<PathBuf>,
}

impl StorageConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.data_dir.is_some() {
			self.data_dir = other.data_dir;
		}
	}

	pub fn finalize(self) -> StorageConfig {
		StorageConfig {
			data_dir: self.data_dir.unwrap_or_else(|| PathBuf::from("./crashdata")),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
	/// Root holding the `incoming`, `raw` and `processed` directories.
	pub data_dir: PathBuf,
}

impl Default for StorageConfig {
	fn default() -> Self {
		StorageConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_data_dir() {
		assert_eq!(StorageConfig::default().data_dir, PathBuf::from("./crashdata"));
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = StorageConfigLayer::default();
		base.merge(StorageConfigLayer {
			data_dir: Some(PathBuf::from("/var/lib/crashcatcher")),
		});
		assert_eq!(
			base.finalize().data_dir,
			PathBuf::from("/var/lib/crashcatcher")
		);
	}
}
