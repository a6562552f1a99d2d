// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod http;
mod logging;
mod processing;
mod storage;

pub use http::{HttpConfig, HttpConfigLayer, DEFAULT_MAX_UPLOAD_BYTES};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use processing::{ProcessingConfig, ProcessingConfigLayer};
pub use storage::{StorageConfig, StorageConfigLayer};
