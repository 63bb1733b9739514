//! Checklist-mode submission: per-section file fields plus the
//! `checklist_data` JSON side channel.
//!
//! Section indices in the field keys count over *qualifying* sections
//! only, restarting from zero: the server needs section grouping, not
//! the store's stable ids, so empty sections simply vanish from the wire.

use super::download::Download;
use crate::api::types::ChecklistEntry;
use crate::api::{ApiClient, FormPayload};
use crate::app::{App, StatusKind};
use crate::error::{ClientError, Result};
use crate::mode::Mode;
use crate::store::ChecklistStore;

/// Build the `/combine-checklist` payload from the qualifying sections.
/// Returns `None` when no section has files.
pub fn checklist_payload(store: &ChecklistStore) -> Option<FormPayload> {
    let qualifying = store.qualifying();
    if qualifying.is_empty() {
        return None;
    }

    let mut payload = FormPayload::new();
    let mut entries = Vec::with_capacity(qualifying.len());
    for (section_index, section) in qualifying.iter().enumerate() {
        let mut keys = Vec::with_capacity(section.files().len());
        for (file_index, file) in section.files().iter().enumerate() {
            let key = format!("checklist_{}_file_{}", section_index, file_index);
            payload.file(&key, file);
            keys.push(key);
        }
        entries.push(ChecklistEntry {
            name: section.name().to_string(),
            files: keys,
        });
    }

    let data = serde_json::to_string(&entries).expect("checklist entries serialize");
    payload.text("checklist_data", data);
    Some(payload)
}

/// Validate, submit, and name the result `checklist_combined_<epoch-ms>.pdf`.
pub async fn submit_checklist(app: &mut App, api: &ApiClient) -> Result<Download> {
    let payload = match checklist_payload(&app.checklist) {
        Some(payload) => payload,
        None => {
            let message = "Please add files to at least one checklist section";
            app.report(Mode::Checklist, StatusKind::Error, message);
            return Err(ClientError::Validation(message.to_string()));
        }
    };
    if !app.begin_submit(Mode::Checklist) {
        return Err(ClientError::Validation(
            "a submission is already in progress".to_string(),
        ));
    }
    app.report(
        Mode::Checklist,
        StatusKind::Processing,
        "Generating PDF with dividers...",
    );

    let result = api.combine_checklist(payload).await;
    app.finish_submit(Mode::Checklist);

    match result {
        Ok(bytes) => {
            app.report(
                Mode::Checklist,
                StatusKind::Success,
                "PDF with dividers generated successfully!",
            );
            Ok(Download::timestamped("checklist_combined", "pdf", bytes))
        }
        Err(err) => {
            app.report(Mode::Checklist, StatusKind::Error, format!("Error: {}", err));
            Err(err)
        }
    }
}

/// The clear action: drop every section and any status message.
pub fn clear_checklist(app: &mut App) {
    app.checklist.clear();
    app.hide_status(Mode::Checklist);
}
