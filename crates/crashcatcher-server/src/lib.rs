// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breakpad crash collection server.
//!
//! Accepts minidump uploads on `POST /submit`, stages them in a
//! [`crashcatcher_store::CrashStore`] and hands them to the processing
//! pipeline.

pub mod api;
pub mod error;
pub mod routes;

pub use api::{build_processor, create_app_state, create_router, AppState};
pub use crashcatcher_server_config::ServerConfig;
pub use error::ServerError;
