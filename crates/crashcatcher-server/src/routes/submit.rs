// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breakpad crash upload handler.

use axum::{
	extract::{multipart::MultipartRejection, Multipart, Query, State},
	http::header,
	response::IntoResponse,
};
use crashcatcher_core::{CrashId, CrashMetadata, Stage};
use tracing::{debug, error, info, instrument, warn};

use crate::api::AppState;
use crate::error::ServerError;

/// Multipart field carrying the minidump, as sent by Breakpad clients.
pub const DUMP_FIELD: &str = "upload_file_minidump";

struct Upload {
	metadata: CrashMetadata,
	dump: Vec<u8>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ServerError> {
	let mut metadata = CrashMetadata::new();
	let mut dump = None;

	while let Some(field) = multipart.next_field().await? {
		let Some(name) = field.name().map(str::to_string) else {
			debug!("skipping unnamed multipart field");
			continue;
		};

		if name == DUMP_FIELD {
			let bytes = field.bytes().await?;
			if dump.is_some() {
				warn!("duplicate minidump field, keeping the first");
				continue;
			}
			dump = Some(bytes.to_vec());
		} else {
			let bytes = field.bytes().await?;
			metadata.append(name, String::from_utf8_lossy(&bytes));
		}
	}

	let dump = dump.ok_or_else(|| {
		ServerError::BadRequest(format!("missing '{DUMP_FIELD}' field"))
	})?;
	Ok(Upload { metadata, dump })
}

/// Write metadata and dump into `incoming`, removing both if either write
/// fails so the crash never looks half-accepted.
async fn stage_crash(state: &AppState, id: CrashId, upload: &Upload) -> Result<(), ServerError> {
	let meta_result = state
		.store
		.put_metadata(Stage::Incoming, id, &upload.metadata)
		.await;
	let dump_result = state.store.put_dump(Stage::Incoming, id, &upload.dump).await;

	if let Err(e) = meta_result.and(dump_result) {
		error!(crash_id = %id, error = %e, "failed to store crash, rolling back");
		if let Err(cleanup) = state.store.discard(Stage::Incoming, id).await {
			warn!(crash_id = %id, error = %cleanup, "rollback left files in incoming");
		}
		return Err(e.into());
	}
	Ok(())
}

/// POST /submit - accept a Breakpad crash report.
///
/// Responds with `CrashID=bp-<id>` once the crash is durably stored.
#[instrument(skip_all)]
pub async fn submit_crash(
	State(state): State<AppState>,
	Query(params): Query<Vec<(String, String)>>,
	multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let mut multipart = multipart.map_err(|e| ServerError::BadRequest(e.body_text()))?;
	let mut upload = read_upload(&mut multipart).await?;
	for (key, value) in params {
		upload.metadata.append(key, value);
	}

	let id = CrashId::generate();
	info!(
		crash_id = %id,
		dump_bytes = upload.dump.len(),
		fields = upload.metadata.len(),
		"crash received"
	);

	stage_crash(&state, id, &upload).await?;

	if state.collect_only {
		info!(crash_id = %id, "collect-only mode, not processing");
	} else {
		state.processor.spawn(id);
		debug!(crash_id = %id, "crash sent to processor");
	}

	Ok((
		[(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
		format!("CrashID={}", id.to_breakpad_string()),
	))
}
