//! Typed client for the combining service endpoints.
//!
//! Each method takes a prebuilt [`FormPayload`] from a submission handler,
//! posts it to the matching endpoint, and maps non-2xx statuses into
//! [`crate::error::ClientError::Server`]. Binary endpoints hand back the
//! raw body; `/get-page-info` decodes its JSON array.

pub mod http;
pub mod payload;
pub mod types;

pub use http::{HttpTransport, RawResponse, Transport};
pub use payload::{FormPayload, Part, PartBody};

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use types::PageMetadata;

/// Client bound to one service base URL.
#[derive(Clone)]
pub struct ApiClient {
    base: String,
    transport: Arc<dyn Transport>,
    request_timeout: Duration,
    page_info_timeout: Duration,
}

impl ApiClient {
    /// Build a client over the real HTTP transport.
    pub fn new(settings: &Settings) -> Self {
        Self::with_transport(settings, Arc::new(HttpTransport::new()))
    }

    /// Build a client over any transport. Tests pass a mock here.
    pub fn with_transport(settings: &Settings, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: settings.api_base.trim_end_matches('/').to_string(),
            transport,
            request_timeout: Duration::from_secs(settings.request_timeout),
            page_info_timeout: Duration::from_secs(settings.page_info_timeout),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post_binary(&self, path: &str, payload: FormPayload) -> Result<Vec<u8>> {
        let response = self
            .transport
            .post_form(&self.url(path), payload, self.request_timeout)
            .await?;
        response.success_body()
    }

    /// `POST /combine` - returns the combined document.
    pub async fn combine(&self, payload: FormPayload) -> Result<Vec<u8>> {
        self.post_binary("/combine", payload).await
    }

    /// `POST /combine-checklist` - returns the divider-separated document.
    pub async fn combine_checklist(&self, payload: FormPayload) -> Result<Vec<u8>> {
        self.post_binary("/combine-checklist", payload).await
    }

    /// `POST /combine-unidoc` - returns the assembled UniDoc.
    pub async fn combine_unidoc(&self, payload: FormPayload) -> Result<Vec<u8>> {
        self.post_binary("/combine-unidoc", payload).await
    }

    /// `POST /get-page-info` - one metadata record per uploaded file, in
    /// input order. Multi-file calls get the extended timeout.
    pub async fn get_page_info(
        &self,
        payload: FormPayload,
        multi_file: bool,
    ) -> Result<Vec<PageMetadata>> {
        let timeout = if multi_file {
            self.page_info_timeout
        } else {
            self.request_timeout
        };
        let response = self
            .transport
            .post_form(&self.url("/get-page-info"), payload, timeout)
            .await?;
        let body = response.success_body()?;
        let records: Vec<PageMetadata> = serde_json::from_slice(&body)?;
        info!(files = records.len(), "page info received");
        Ok(records)
    }

    /// `POST /extract-pages-single` - returns the trimmed document.
    pub async fn extract_pages_single(&self, payload: FormPayload) -> Result<Vec<u8>> {
        self.post_binary("/extract-pages-single", payload).await
    }

    /// `POST /extract-pages-mix` - returns the combined trimmed document.
    pub async fn extract_pages_mix(&self, payload: FormPayload) -> Result<Vec<u8>> {
        self.post_binary("/extract-pages-mix", payload).await
    }

    /// `GET /health` - service liveness.
    pub async fn health(&self) -> bool {
        match self
            .transport
            .get(&self.url("/health"), self.request_timeout)
            .await
        {
            Ok(response) => response.is_success(),
            Err(_) => false,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MockTransport;
    use super::*;

    fn client(transport: Arc<MockTransport>) -> ApiClient {
        let settings = Settings {
            api_base: "http://combiner.test".to_string(),
            ..Settings::default()
        };
        ApiClient::with_transport(&settings, transport)
    }

    #[tokio::test]
    async fn combine_posts_to_the_combine_endpoint() {
        let transport = Arc::new(MockTransport::new());
        let api = client(transport.clone());

        let body = api.combine(FormPayload::new()).await.unwrap();
        assert!(body.starts_with(b"%PDF"));

        let requests = transport.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://combiner.test/combine");
        assert_eq!(requests[0].timeout, Duration::from_secs(120));
    }

    #[tokio::test]
    async fn multi_file_page_info_uses_extended_timeout() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(200, br#"[{"original_name":"a.pdf","page_count":1,"previews":[]}]"#);
        let api = client(transport.clone());

        let records = api.get_page_info(FormPayload::new(), true).await.unwrap();
        assert_eq!(records[0].page_count, 1);

        let requests = transport.take_requests();
        assert_eq!(requests[0].timeout, Duration::from_secs(180));
    }

    #[tokio::test]
    async fn non_2xx_maps_to_server_error() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue(500, b"internal error");
        let api = client(transport);

        match api.combine(FormPayload::new()).await {
            Err(crate::error::ClientError::Server { status }) => assert_eq!(status, 500),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn health_swallows_transport_failures() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_err(crate::error::ClientError::Network("down".to_string()));
        let api = client(transport);
        assert!(!api.health().await);
    }
}
