// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash processing pipeline for crashcatcher.
//!
//! This crate provides:
//!
//! - [`ProcessingLimiter`] - caps how many analyzer subprocesses run at once
//! - [`Analyzer`] / [`CommandAnalyzer`] - the external symbolication step
//! - [`CrashProcessor`] - analyze, persist output, archive
//! - [`RecoveryScanner`] - resubmit crashes a previous run left in `incoming`

pub mod analyzer;
pub mod error;
pub mod limiter;
pub mod processor;
pub mod recovery;

pub use analyzer::{Analyzer, CommandAnalyzer};
pub use error::{AnalyzerError, PipelineError, Result};
pub use limiter::{ProcessingLimiter, ProcessingPermit};
pub use processor::{AnalyzerFailurePolicy, CrashProcessor, PendingReason, ProcessOutcome};
pub use recovery::{RecoveryReport, RecoveryScanner};
