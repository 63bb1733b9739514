//! Page-cutter workflows: fetch page metadata, then extract with the
//! marked pages removed.
//!
//! Both variants are two-step: `load_*` posts the upload to
//! `/get-page-info` and installs the returned metadata in the store, then
//! `extract_*` posts the removal request. The single-file variant drives
//! the store's phase machine; mix mode validates against its selection
//! sets directly.

use super::download::Download;
use crate::api::{ApiClient, FormPayload};
use crate::app::{App, StatusKind};
use crate::error::{ClientError, Result};
use crate::mode::Mode;
use crate::store::{FileHandle, MixCutter, SingleCutter};

/// `/get-page-info` payload for one upload batch.
pub fn page_info_payload<'a>(files: impl IntoIterator<Item = &'a FileHandle>) -> FormPayload {
    let mut payload = FormPayload::new();
    for file in files {
        payload.file("files", file);
    }
    payload
}

/// `/extract-pages-single` payload: the file plus the selection as CSV.
pub fn extract_single_payload(cutter: &SingleCutter, file: &FileHandle) -> FormPayload {
    let mut payload = FormPayload::new();
    payload.file("file", file);
    payload.text("pages_to_remove", cutter.pages_csv());
    payload
}

/// `/extract-pages-mix` payload: every file under repeated `files` plus
/// the `removal_data` JSON object.
pub fn extract_mix_payload(cutter: &MixCutter) -> FormPayload {
    let mut payload = FormPayload::new();
    for file in cutter.files() {
        payload.file("files", file);
    }
    payload.text("removal_data", cutter.removal_data().to_string());
    payload
}

/// Fetch page metadata for one file and install it in the single cutter.
pub async fn load_single(app: &mut App, api: &ApiClient, file: FileHandle) -> Result<()> {
    app.report(Mode::Cutter, StatusKind::Processing, "Loading page previews...");

    let payload = page_info_payload([&file]);
    let records = match api.get_page_info(payload, false).await {
        Ok(records) => records,
        Err(err) => {
            app.report(Mode::Cutter, StatusKind::Error, format!("Error: {}", err));
            return Err(err);
        }
    };
    let metadata = records.into_iter().next().ok_or_else(|| {
        ClientError::Validation("server returned no page info for the upload".to_string())
    })?;

    app.cutter_single.load(file, metadata)?;
    app.hide_status(Mode::Cutter);
    Ok(())
}

/// Extract the single cutter's file with the selected pages removed.
/// Names the result `extracted_<epoch-ms>.pdf`.
pub async fn extract_single(app: &mut App, api: &ApiClient) -> Result<Download> {
    if let Err(err) = app.cutter_single.begin_extract() {
        app.report(Mode::Cutter, StatusKind::Error, err.to_string());
        return Err(err);
    }
    if !app.begin_submit(Mode::Cutter) {
        app.cutter_single.finish_extract(false);
        return Err(ClientError::Validation(
            "a submission is already in progress".to_string(),
        ));
    }
    app.report(Mode::Cutter, StatusKind::Processing, "Removing selected pages...");

    // begin_extract guarantees the file is present
    let payload = app
        .cutter_single
        .file()
        .map(|file| extract_single_payload(&app.cutter_single, file));
    let payload = match payload {
        Some(payload) => payload,
        None => {
            app.finish_submit(Mode::Cutter);
            app.cutter_single.finish_extract(false);
            return Err(ClientError::Validation(
                "please upload a file first".to_string(),
            ));
        }
    };
    let result = api.extract_pages_single(payload).await;
    app.finish_submit(Mode::Cutter);
    app.cutter_single.finish_extract(result.is_ok());

    match result {
        Ok(bytes) => {
            app.report(
                Mode::Cutter,
                StatusKind::Success,
                "Pages removed successfully!",
            );
            Ok(Download::timestamped("extracted", "pdf", bytes))
        }
        Err(err) => {
            app.report(Mode::Cutter, StatusKind::Error, format!("Error: {}", err));
            Err(err)
        }
    }
}

/// Fetch page metadata for a batch of files and install them in the mix
/// cutter. Uses the extended page-info timeout.
pub async fn load_mix(app: &mut App, api: &ApiClient, files: Vec<FileHandle>) -> Result<()> {
    if files.is_empty() {
        let message = "Please upload at least one file";
        app.report(Mode::Cutter, StatusKind::Error, message);
        return Err(ClientError::Validation(message.to_string()));
    }
    app.report(Mode::Cutter, StatusKind::Processing, "Loading page previews...");

    let payload = page_info_payload(&files);
    let records = match api.get_page_info(payload, true).await {
        Ok(records) => records,
        Err(err) => {
            app.report(Mode::Cutter, StatusKind::Error, format!("Error: {}", err));
            return Err(err);
        }
    };

    app.cutter_mix.load(files, records)?;
    app.hide_status(Mode::Cutter);
    Ok(())
}

/// Extract across the mix batch, removing each file's marked pages and
/// combining the remainder. Names the result `mix_extracted_<epoch-ms>.pdf`.
pub async fn extract_mix(app: &mut App, api: &ApiClient) -> Result<Download> {
    if app.cutter_mix.is_empty() {
        let message = "please upload a file first";
        app.report(Mode::Cutter, StatusKind::Error, message);
        return Err(ClientError::Validation(message.to_string()));
    }
    if !app.cutter_mix.has_any_selection() {
        let message = "please select at least one page to remove";
        app.report(Mode::Cutter, StatusKind::Error, message);
        return Err(ClientError::Validation(message.to_string()));
    }
    if !app.begin_submit(Mode::Cutter) {
        return Err(ClientError::Validation(
            "a submission is already in progress".to_string(),
        ));
    }
    app.report(Mode::Cutter, StatusKind::Processing, "Removing selected pages...");

    let payload = extract_mix_payload(&app.cutter_mix);
    let result = api.extract_pages_mix(payload).await;
    app.finish_submit(Mode::Cutter);

    match result {
        Ok(bytes) => {
            app.report(
                Mode::Cutter,
                StatusKind::Success,
                "Pages removed successfully!",
            );
            Ok(Download::timestamped("mix_extracted", "pdf", bytes))
        }
        Err(err) => {
            app.report(Mode::Cutter, StatusKind::Error, format!("Error: {}", err));
            Err(err)
        }
    }
}

/// The clear action for whichever cutter variant is active.
pub fn clear_cutters(app: &mut App) {
    app.cutter_single.clear();
    app.cutter_mix.clear();
    app.hide_status(Mode::Cutter);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::testing::MockTransport;
    use crate::config::Settings;
    use crate::store::CutterPhase;

    fn api(transport: Arc<MockTransport>) -> ApiClient {
        let settings = Settings {
            api_base: "http://combiner.test".to_string(),
            ..Settings::default()
        };
        ApiClient::with_transport(&settings, transport)
    }

    fn file(name: &str) -> FileHandle {
        FileHandle::new(name, vec![0u8; 8])
    }

    fn page_info_body(entries: &[(&str, u32)]) -> Vec<u8> {
        let records: Vec<serde_json::Value> = entries
            .iter()
            .map(|(name, pages)| {
                serde_json::json!({"original_name": name, "page_count": pages, "previews": []})
            })
            .collect();
        serde_json::to_vec(&records).unwrap()
    }

    #[tokio::test]
    async fn load_single_installs_metadata() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(200, &page_info_body(&[("doc.pdf", 4)]));
        let mut app = App::empty();

        load_single(&mut app, &api(transport.clone()), file("doc.pdf"))
            .await
            .unwrap();
        assert_eq!(app.cutter_single.phase(), CutterPhase::Loaded);
        assert_eq!(app.cutter_single.metadata().unwrap().page_count, 4);

        let requests = transport.take_requests();
        assert_eq!(requests[0].url, "http://combiner.test/get-page-info");
        // single-file lookups keep the default timeout
        assert_eq!(requests[0].timeout, std::time::Duration::from_secs(120));
    }

    #[tokio::test]
    async fn extract_single_posts_file_and_csv() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(200, &page_info_body(&[("doc.pdf", 5)]));
        let mut app = App::empty();
        load_single(&mut app, &api(transport.clone()), file("doc.pdf"))
            .await
            .unwrap();
        app.cutter_single.toggle_page(3);
        app.cutter_single.toggle_page(1);

        let download = extract_single(&mut app, &api(transport.clone()))
            .await
            .unwrap();
        assert!(download.filename.starts_with("extracted_"));
        assert_eq!(app.cutter_single.phase(), CutterPhase::Loaded);
        assert!(app.cutter_single.selected_pages().is_empty());

        let requests = transport.take_requests();
        let extract = &requests[1];
        assert_eq!(extract.url, "http://combiner.test/extract-pages-single");
        let payload = extract.payload.as_ref().unwrap();
        assert_eq!(payload.file_names("file"), ["doc.pdf"]);
        assert_eq!(payload.text_value("pages_to_remove"), Some("1,3"));
    }

    #[tokio::test]
    async fn extract_single_without_selection_makes_no_call() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(200, &page_info_body(&[("doc.pdf", 2)]));
        let mut app = App::empty();
        load_single(&mut app, &api(transport.clone()), file("doc.pdf"))
            .await
            .unwrap();

        let err = extract_single(&mut app, &api(transport.clone()))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(transport.request_count(), 1); // only the page-info call
    }

    #[tokio::test]
    async fn failed_extract_keeps_selection_for_retry() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(200, &page_info_body(&[("doc.pdf", 3)]));
        transport.enqueue(500, b"boom");
        let mut app = App::empty();
        load_single(&mut app, &api(transport.clone()), file("doc.pdf"))
            .await
            .unwrap();
        app.cutter_single.toggle_page(2);

        let err = extract_single(&mut app, &api(transport)).await.unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 500 }));
        assert_eq!(app.cutter_single.pages_csv(), "2");
        assert!(!app.is_busy(Mode::Cutter));
    }

    #[tokio::test]
    async fn load_mix_uses_extended_timeout_and_checks_counts() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(200, &page_info_body(&[("a.pdf", 2), ("b.pdf", 3)]));
        let mut app = App::empty();

        load_mix(
            &mut app,
            &api(transport.clone()),
            vec![file("a.pdf"), file("b.pdf")],
        )
        .await
        .unwrap();
        assert_eq!(app.cutter_mix.files().len(), 2);

        let requests = transport.take_requests();
        assert_eq!(requests[0].timeout, std::time::Duration::from_secs(180));
    }

    #[tokio::test]
    async fn load_mix_rejects_mismatched_record_count() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(200, &page_info_body(&[("a.pdf", 2)]));
        let mut app = App::empty();

        let err = load_mix(
            &mut app,
            &api(transport),
            vec![file("a.pdf"), file("b.pdf")],
        )
        .await
        .unwrap_err();
        assert!(err.is_validation());
        assert!(app.cutter_mix.is_empty());
    }

    #[tokio::test]
    async fn extract_mix_posts_all_files_and_removal_data() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(200, &page_info_body(&[("a.pdf", 3), ("b.pdf", 2)]));
        let mut app = App::empty();
        load_mix(
            &mut app,
            &api(transport.clone()),
            vec![file("a.pdf"), file("b.pdf")],
        )
        .await
        .unwrap();
        app.cutter_mix.toggle_page(0, 1);

        let download = extract_mix(&mut app, &api(transport.clone())).await.unwrap();
        assert!(download.filename.starts_with("mix_extracted_"));

        let requests = transport.take_requests();
        let extract = &requests[1];
        assert_eq!(extract.url, "http://combiner.test/extract-pages-mix");
        let payload = extract.payload.as_ref().unwrap();
        assert_eq!(payload.file_names("files"), ["a.pdf", "b.pdf"]);
        let removal: serde_json::Value =
            serde_json::from_str(payload.text_value("removal_data").unwrap()).unwrap();
        // files with nothing marked still appear, with an empty list
        assert_eq!(removal, serde_json::json!({"file_0": [1], "file_1": []}));
    }

    #[tokio::test]
    async fn extract_mix_without_selection_makes_no_call() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(200, &page_info_body(&[("a.pdf", 2)]));
        let mut app = App::empty();
        load_mix(&mut app, &api(transport.clone()), vec![file("a.pdf")])
            .await
            .unwrap();

        let err = extract_mix(&mut app, &api(transport.clone())).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(transport.request_count(), 1);
    }
}
