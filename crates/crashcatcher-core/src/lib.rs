// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the crashcatcher pipeline.
//!
//! This crate provides the types shared by the store, the processing pipeline
//! and the HTTP server:
//!
//! - [`CrashId`] - the unguessable identity assigned to every incoming crash
//! - [`Stage`] - the storage area a crash's artifacts currently live in
//! - [`CrashMetadata`] - free-form key/value fields sent by the uploader
//! - [`Crash`] - a dump, its metadata and (eventually) its analysis output
//!
//! # Lifecycle
//!
//! ```text
//! incoming --(analysis written to processed)--> raw
//! ```
//!
//! A crash's dump and metadata live in exactly one of `incoming` or `raw`.
//! Analysis output is written once to `processed` and never moved.

pub mod crash;
pub mod error;
pub mod id;
pub mod metadata;
pub mod stage;

pub use crash::Crash;
pub use error::{CrashError, Result};
pub use id::{new_crash_id, CrashId, CRASH_ID_PREFIX};
pub use metadata::CrashMetadata;
pub use stage::Stage;
