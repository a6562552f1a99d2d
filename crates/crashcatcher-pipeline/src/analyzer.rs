// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The external symbolication step.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::AnalyzerError;

/// Turns a dump file into human-readable analysis text.
#[async_trait]
pub trait Analyzer: Send + Sync {
	/// Analyze the dump at `dump`, returning the analysis bytes.
	async fn analyze(&self, dump: &Path) -> Result<Vec<u8>, AnalyzerError>;
}

/// Runs an external program (typically `minidump_stackwalk`) as
/// `program [args...] <dump>` and captures its standard output.
///
/// No timeout is applied: a hung analyzer holds its processing slot until it
/// exits.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
	program: PathBuf,
	args: Vec<String>,
}

impl CommandAnalyzer {
	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
			args: Vec::new(),
		}
	}

	/// Arguments placed before the dump path, e.g. `-m` for machine-readable
	/// stackwalk output.
	pub fn with_args<I, S>(mut self, args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.args = args.into_iter().map(Into::into).collect();
		self
	}

	pub fn program(&self) -> &Path {
		&self.program
	}

	pub fn args(&self) -> &[String] {
		&self.args
	}
}

#[async_trait]
impl Analyzer for CommandAnalyzer {
	async fn analyze(&self, dump: &Path) -> Result<Vec<u8>, AnalyzerError> {
		let mut cmd = Command::new(&self.program);
		cmd.args(&self.args)
			.arg(dump)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped());

		trace!(
			program = %self.program.display(),
			args = ?self.args,
			dump = %dump.display(),
			"running analyzer"
		);

		let output = cmd.output().await.map_err(|e| AnalyzerError::Launch {
			program: self.program.display().to_string(),
			source: e,
		})?;

		if !output.stderr.is_empty() {
			debug!(
				stderr = %String::from_utf8_lossy(&output.stderr).trim_end(),
				"analyzer stderr"
			);
		}

		if output.status.success() {
			Ok(output.stdout)
		} else {
			Err(AnalyzerError::ExitStatus {
				status: output.status,
				stdout: output.stdout,
				stderr: output.stderr,
			})
		}
	}
}

#[cfg(all(test, unix))]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[tokio::test]
	async fn test_captures_stdout() {
		let dir = tempdir().unwrap();
		let dump = dir.path().join("crash.dump");
		std::fs::write(&dump, b"MDMP contents").unwrap();

		let analyzer = CommandAnalyzer::new("cat");
		let output = analyzer.analyze(&dump).await.unwrap();
		assert_eq!(output, b"MDMP contents");
	}

	#[tokio::test]
	async fn test_dump_path_is_last_argument() {
		let dir = tempdir().unwrap();
		let dump = dir.path().join("crash.dump");
		std::fs::write(&dump, b"").unwrap();

		let analyzer =
			CommandAnalyzer::new("sh").with_args(["-c", "printf '%s|%s' \"$0\" \"$1\"", "-m"]);
		let output = analyzer.analyze(&dump).await.unwrap();
		assert_eq!(
			String::from_utf8(output).unwrap(),
			format!("-m|{}", dump.display())
		);
	}

	#[tokio::test]
	async fn test_nonzero_exit_keeps_partial_output() {
		let dir = tempdir().unwrap();
		let dump = dir.path().join("crash.dump");
		std::fs::write(&dump, b"").unwrap();

		let analyzer = CommandAnalyzer::new("sh").with_args(["-c", "printf partial; echo oops >&2; exit 3", "sh"]);
		let err = analyzer.analyze(&dump).await.unwrap_err();
		match &err {
			AnalyzerError::ExitStatus { status, stderr, .. } => {
				assert_eq!(status.code(), Some(3));
				assert_eq!(stderr, b"oops\n");
			}
			other => panic!("expected ExitStatus, got {other:?}"),
		}
		assert_eq!(err.captured_stdout(), b"partial");
	}

	#[tokio::test]
	async fn test_missing_program_is_launch_error() {
		let dir = tempdir().unwrap();
		let analyzer = CommandAnalyzer::new(dir.path().join("no-such-stackwalk"));
		let err = analyzer
			.analyze(&dir.path().join("crash.dump"))
			.await
			.unwrap_err();
		assert!(matches!(err, AnalyzerError::Launch { .. }));
		assert!(err.captured_stdout().is_empty());
	}
}
