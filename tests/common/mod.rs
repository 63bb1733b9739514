//! Shared test fixtures: a recording transport and client builders.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use filecombine::api::{ApiClient, FormPayload, RawResponse, Transport};
use filecombine::error::{ClientError, Result};
use filecombine::Settings;

pub const TEST_BASE: &str = "http://combiner.test";

/// One captured request.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: &'static str,
    pub url: String,
    pub payload: Option<FormPayload>,
    pub timeout: Duration,
}

/// Transport that records every request and replays queued responses.
/// With nothing queued it answers 200 with a PDF-ish body.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<Captured>>,
    responses: Mutex<Vec<Result<RawResponse>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, status: u16, body: &[u8]) {
        self.responses.lock().unwrap().push(Ok(RawResponse {
            status,
            body: body.to_vec(),
        }));
    }

    pub fn enqueue_err(&self, err: ClientError) {
        self.responses.lock().unwrap().push(Err(err));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn take_requests(&self) -> Vec<Captured> {
        std::mem::take(&mut self.requests.lock().unwrap())
    }

    fn next_response(&self) -> Result<RawResponse> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(RawResponse {
                status: 200,
                body: b"%PDF-1.7 test".to_vec(),
            })
        } else {
            responses.remove(0)
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post_form(
        &self,
        url: &str,
        payload: FormPayload,
        timeout: Duration,
    ) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(Captured {
            method: "POST",
            url: url.to_string(),
            payload: Some(payload),
            timeout,
        });
        self.next_response()
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(Captured {
            method: "GET",
            url: url.to_string(),
            payload: None,
            timeout,
        });
        self.next_response()
    }
}

pub fn test_settings() -> Settings {
    Settings {
        api_base: TEST_BASE.to_string(),
        ..Settings::default()
    }
}

pub fn client(transport: Arc<RecordingTransport>) -> ApiClient {
    ApiClient::with_transport(&test_settings(), transport)
}
