//! Standard-mode submission: every selected file under the repeated
//! `files` field, combined in selection order.

use tracing::warn;

use super::download::Download;
use crate::api::types::OutputFormat;
use crate::api::{ApiClient, FormPayload};
use crate::app::{App, StatusKind};
use crate::error::{ClientError, Result};
use crate::mode::Mode;
use crate::store::StandardStore;

/// Build the `/combine` payload: repeated `files` parts in selection
/// order, plus `output_format` when not the default.
pub fn standard_payload(store: &StandardStore, format: OutputFormat) -> FormPayload {
    let mut payload = FormPayload::new();
    for file in store.files() {
        if !file.is_allowed() {
            warn!(name = file.name(), "file type not in the accepted list");
        }
        payload.file("files", file);
    }
    if format != OutputFormat::Pdf {
        payload.text("output_format", format.as_str());
    }
    payload
}

/// Validate, submit, and name the result `combined_<epoch-ms>.<ext>`.
pub async fn submit_standard(
    app: &mut App,
    api: &ApiClient,
    format: OutputFormat,
) -> Result<Download> {
    if app.standard.is_empty() {
        let message = "Please upload at least one file";
        app.report(Mode::Standard, StatusKind::Error, message);
        return Err(ClientError::Validation(message.to_string()));
    }
    if !app.begin_submit(Mode::Standard) {
        return Err(ClientError::Validation(
            "a submission is already in progress".to_string(),
        ));
    }
    app.report(Mode::Standard, StatusKind::Processing, "Processing files...");

    let payload = standard_payload(&app.standard, format);
    let result = api.combine(payload).await;

    // guaranteed cleanup: the lock is released on every path
    app.finish_submit(Mode::Standard);

    match result {
        Ok(bytes) => {
            app.report(
                Mode::Standard,
                StatusKind::Success,
                "Files combined successfully!",
            );
            Ok(Download::timestamped("combined", format.as_str(), bytes))
        }
        Err(err) => {
            app.report(Mode::Standard, StatusKind::Error, format!("Error: {}", err));
            Err(err)
        }
    }
}

/// The clear action: empty the store and drop any status message. The
/// host UI also resets its file-picker value so the same file can be
/// re-selected.
pub fn clear_standard(app: &mut App) {
    app.standard.clear();
    app.hide_status(Mode::Standard);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::testing::MockTransport;
    use crate::config::Settings;
    use crate::store::FileHandle;

    fn api(transport: Arc<MockTransport>) -> ApiClient {
        let settings = Settings {
            api_base: "http://combiner.test".to_string(),
            ..Settings::default()
        };
        ApiClient::with_transport(&settings, transport)
    }

    #[tokio::test]
    async fn empty_store_reports_error_without_network() {
        let transport = Arc::new(MockTransport::new());
        let mut app = App::empty();

        let err = submit_standard(&mut app, &api(transport.clone()), OutputFormat::Pdf)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(transport.request_count(), 0);
        assert_eq!(app.status(Mode::Standard).unwrap().kind, StatusKind::Error);
    }

    #[tokio::test]
    async fn two_files_become_two_repeated_parts_in_order() {
        let transport = Arc::new(MockTransport::new());
        let mut app = App::empty();
        app.standard.add([
            FileHandle::new("a.pdf", vec![1]),
            FileHandle::new("b.docx", vec![2]),
        ]);

        let download = submit_standard(&mut app, &api(transport.clone()), OutputFormat::Pdf)
            .await
            .unwrap();
        assert!(download.filename.starts_with("combined_"));

        let requests = transport.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://combiner.test/combine");
        let payload = requests[0].payload.as_ref().unwrap();
        assert_eq!(payload.file_names("files"), ["a.pdf", "b.docx"]);
        assert_eq!(payload.text_value("output_format"), None);
    }

    #[tokio::test]
    async fn non_default_format_is_posted_and_named() {
        let transport = Arc::new(MockTransport::new());
        let mut app = App::empty();
        app.standard.add([FileHandle::new("a.pdf", vec![1])]);

        let download = submit_standard(&mut app, &api(transport.clone()), OutputFormat::Docx)
            .await
            .unwrap();
        assert!(download.filename.ends_with(".docx"));

        let requests = transport.take_requests();
        let payload = requests[0].payload.as_ref().unwrap();
        assert_eq!(payload.text_value("output_format"), Some("docx"));
    }

    #[tokio::test]
    async fn server_failure_reports_and_releases_the_lock() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(500, b"boom");
        let mut app = App::empty();
        app.standard.add([FileHandle::new("a.pdf", vec![1])]);

        let err = submit_standard(&mut app, &api(transport), OutputFormat::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Server { status: 500 }));
        assert_eq!(app.status(Mode::Standard).unwrap().kind, StatusKind::Error);
        assert!(!app.is_busy(Mode::Standard));
    }

    #[test]
    fn clear_resets_store_and_status() {
        let mut app = App::empty();
        app.standard.add([FileHandle::new("a.pdf", vec![1])]);
        app.report(Mode::Standard, StatusKind::Success, "done");
        clear_standard(&mut app);
        assert!(app.standard.is_empty());
        assert!(app.status(Mode::Standard).is_none());
    }
}
