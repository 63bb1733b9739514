//! UniDoc builder submission and slot preview.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use super::download::Download;
use crate::api::{ApiClient, FormPayload};
use crate::app::{App, StatusKind};
use crate::error::{ClientError, Result};
use crate::mode::Mode;
use crate::store::UniDocStore;

/// How long a preview copy stays on disk before it is removed, matching
/// the page's 30-second object-URL revocation.
pub const PREVIEW_TTL: Duration = Duration::from_secs(30);

/// Build the `/combine-unidoc` payload: every slot's files flattened into
/// repeated `files` parts, then the six metadata fields.
pub fn unidoc_payload(store: &UniDocStore) -> FormPayload {
    let mut payload = FormPayload::new();
    for file in store.flattened() {
        payload.file("files", file);
    }
    for (name, value) in store.metadata().fields() {
        payload.text(name, value);
    }
    payload
}

/// Validate, submit, and name the result `unidoc_combined_<epoch-ms>.pdf`.
pub async fn submit_unidoc(app: &mut App, api: &ApiClient) -> Result<Download> {
    if app.unidoc.is_empty() {
        let message = "Please upload at least one file";
        app.report(Mode::UniDoc, StatusKind::Error, message);
        return Err(ClientError::Validation(message.to_string()));
    }
    if !app.begin_submit(Mode::UniDoc) {
        return Err(ClientError::Validation(
            "a submission is already in progress".to_string(),
        ));
    }
    app.report(
        Mode::UniDoc,
        StatusKind::Processing,
        "Merging Uni Docs into PDF...",
    );

    let payload = unidoc_payload(&app.unidoc);
    let result = api.combine_unidoc(payload).await;
    app.finish_submit(Mode::UniDoc);

    match result {
        Ok(bytes) => {
            app.report(
                Mode::UniDoc,
                StatusKind::Success,
                "UniDocs merged successfully!",
            );
            Ok(Download::timestamped("unidoc_combined", "pdf", bytes))
        }
        Err(err) => {
            app.report(Mode::UniDoc, StatusKind::Error, format!("Error: {}", err));
            Err(err)
        }
    }
}

/// Open the first file stored under a slot in the system viewer. The file
/// is written to a transient copy that is deleted after [`PREVIEW_TTL`],
/// whether or not the viewer is still open.
pub async fn preview_slot(store: &UniDocStore, key: &str) -> Result<PathBuf> {
    preview_with_ttl(store, key, PREVIEW_TTL).await
}

async fn preview_with_ttl(store: &UniDocStore, key: &str, ttl: Duration) -> Result<PathBuf> {
    let file = store
        .slot(key)
        .and_then(|slot| slot.first())
        .ok_or_else(|| ClientError::Validation(format!("no file stored for slot {}", key)))?;

    let dir = tempfile::Builder::new().prefix("fcomb-preview-").tempdir()?;
    // keep() detaches the directory from the guard; the cleanup task below
    // owns its lifetime from here
    let dir = dir.keep();
    let path = dir.join(file.name());
    tokio::fs::write(&path, file.bytes()).await?;

    match system_opener() {
        Some(opener) => {
            debug!(path = %path.display(), opener = %opener.display(), "opening preview");
            std::process::Command::new(opener).arg(&path).spawn()?;
        }
        None => warn!("no system opener found; preview written but not opened"),
    }

    let cleanup_dir = dir.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        if let Err(err) = tokio::fs::remove_dir_all(&cleanup_dir).await {
            debug!(error = %err, "preview cleanup failed");
        }
    });

    Ok(path)
}

fn system_opener() -> Option<PathBuf> {
    ["xdg-open", "open", "explorer"]
        .iter()
        .find_map(|candidate| which::which(candidate).ok())
}

/// Reset every slot and file-picker, optionally clearing the metadata
/// text fields as well.
pub fn reset_all(app: &mut App, clear_metadata: bool) {
    app.unidoc.reset_all(clear_metadata);
    app.report(Mode::UniDoc, StatusKind::Success, "All UniDoc inputs cleared.");
}
