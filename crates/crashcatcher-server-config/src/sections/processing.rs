// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash processing configuration section.

use std::path::PathBuf;

use crashcatcher_pipeline::AnalyzerFailurePolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessingConfigLayer {
	pub analyzer_path: Option<PathBuf>,
	pub analyzer_args: Option<Vec<String>>,
	pub max_concurrent: Option<usize>,
	pub failure_policy: Option<AnalyzerFailurePolicy>,
	pub collect_only: Option<bool>,
}

impl ProcessingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.analyzer_path.is_some() {
			self.analyzer_path = other.analyzer_path;
		}
		if other.analyzer_args.is_some() {
			self.analyzer_args = other.analyzer_args;
		}
		if other.max_concurrent.is_some() {
			self.max_concurrent = other.max_concurrent;
		}
		if other.failure_policy.is_some() {
			self.failure_policy = other.failure_policy;
		}
		if other.collect_only.is_some() {
			self.collect_only = other.collect_only;
		}
	}

	pub fn finalize(self) -> ProcessingConfig {
		ProcessingConfig {
			analyzer_path: self
				.analyzer_path
				.unwrap_or_else(|| PathBuf::from("./build/breakpad/bin/minidump_stackwalk")),
			analyzer_args: self
				.analyzer_args
				.unwrap_or_else(|| vec!["-m".to_string()]),
			max_concurrent: self.max_concurrent.unwrap_or(1),
			failure_policy: self.failure_policy.unwrap_or_default(),
			collect_only: self.collect_only.unwrap_or(false),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessingConfig {
	/// The stackwalk binary, run as `analyzer_path [analyzer_args...] <dump>`.
	pub analyzer_path: PathBuf,
	pub analyzer_args: Vec<String>,
	/// Maximum number of analyzer processes running at once.
	pub max_concurrent: usize,
	pub failure_policy: AnalyzerFailurePolicy,
	/// Accept and store crashes without analyzing them.
	pub collect_only: bool,
}

impl Default for ProcessingConfig {
	fn default() -> Self {
		ProcessingConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = ProcessingConfig::default();
		assert_eq!(
			config.analyzer_path,
			PathBuf::from("./build/breakpad/bin/minidump_stackwalk")
		);
		assert_eq!(config.analyzer_args, vec!["-m".to_string()]);
		assert_eq!(config.max_concurrent, 1);
		assert_eq!(config.failure_policy, AnalyzerFailurePolicy::Retry);
		assert!(!config.collect_only);
	}

	#[test]
	fn test_deserialize_failure_policy() {
		let layer: ProcessingConfigLayer = toml::from_str(
			r#"
failure_policy = "best_effort"
max_concurrent = 4
"#,
		)
		.unwrap();
		assert_eq!(layer.failure_policy, Some(AnalyzerFailurePolicy::BestEffort));
		assert_eq!(layer.max_concurrent, Some(4));
		assert!(layer.analyzer_path.is_none());
	}

	#[test]
	fn test_unknown_failure_policy_rejected() {
		let result: Result<ProcessingConfigLayer, _> = toml::from_str(r#"failure_policy = "ignore""#);
		assert!(result.is_err());
	}

	#[test]
	fn test_empty_args_override_default() {
		let mut base = ProcessingConfigLayer::default();
		base.merge(ProcessingConfigLayer {
			analyzer_args: Some(Vec::new()),
			..Default::default()
		});
		assert!(base.finalize().analyzer_args.is_empty());
	}
}
