// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Staged crash storage for crashcatcher.
//!
//! This crate provides:
//!
//! - [`CrashStore`] - the storage contract the pipeline is written against
//! - [`FsCrashStore`] - the filesystem backend
//!
//! # Layout
//!
//! ```text
//! <root>/incoming/<id>.json   metadata, not yet analyzed
//! <root>/incoming/<id>.dump   minidump, not yet analyzed
//! <root>/raw/<id>.json        metadata, archived
//! <root>/raw/<id>.dump        minidump, archived
//! <root>/processed/<id>.txt   analyzer output
//! ```
//!
//! Other tooling reads this layout directly, so file names are part of the
//! external contract.

pub mod error;
pub mod fs;
pub mod layout;
pub mod store;

pub use error::{Result, StoreError};
pub use fs::FsCrashStore;
pub use layout::ArtifactKind;
pub use store::CrashStore;
