// API client module: a small blocking HTTP client for the image analyzer
// service. One request per invocation, no retries.

use crate::config::Config;
use crate::error::{ClientError, Result};
use reqwest::blocking::{multipart, Body, Client};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";
pub const ANALYZE_JSON_PATH: &str = "/analyze-json";
pub const ANALYZE_FORM_PATH: &str = "/analyze";

/// Holds a reqwest blocking client, the analyzer base URL and the access
/// token forwarded on every call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

/// What the analyzer answers on both endpoints. Exactly one of the two
/// fields is set in practice; the service reports a failed model call as
/// `error` with a 200 status.
#[derive(Deserialize, Debug, PartialEq, Eq)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw reply as received. The body bytes are kept undecoded so the caller
/// can echo them exactly before deciding whether the call succeeded.
#[derive(Debug, Clone)]
pub struct AnalysisReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl AnalysisReply {
    /// Body parsed as an `AnalysisResponse`, if it is one.
    pub fn parsed(&self) -> Option<AnalysisResponse> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Turn non-2xx statuses and upstream error bodies into errors.
    pub fn check(&self) -> Result<()> {
        if !self.status.is_success() {
            return Err(ClientError::Status {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            });
        }
        match self.parsed() {
            Some(AnalysisResponse { error: Some(message), .. }) => {
                Err(ClientError::Upstream(message))
            }
            _ => Ok(()),
        }
    }
}

impl ApiClient {
    /// Build a client for `config.base_url`. A missing timeout means the
    /// request may wait on the server indefinitely.
    pub fn new(config: &Config, token: &str) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(ApiClient {
            client,
            base_url: config.base_url.clone(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a staged JSON payload to `/analyze-json`. The body is streamed
    /// from `payload` with its length taken from the file metadata.
    pub fn analyze_json(&self, payload: File) -> Result<AnalysisReply> {
        let url = self.url(ANALYZE_JSON_PATH);
        let len = payload.metadata()?.len();
        info!(%url, bytes = len, "sending JSON analysis request");
        let res = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCESS_TOKEN_HEADER, &self.token)
            .body(Body::sized(payload, len))
            .send()?;
        Self::read_reply(res)
    }

    /// Upload the image as `multipart/form-data` to `/analyze`, streamed
    /// straight from disk.
    pub fn analyze_multipart(&self, image_path: &Path) -> Result<AnalysisReply> {
        let url = self.url(ANALYZE_FORM_PATH);
        let file = File::open(image_path)?;
        let file_name = image_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("image.jpg")
            .to_string();
        let mime = mime_for_path(image_path);
        info!(%url, file = %file_name, mime, "sending multipart analysis request");

        let part = multipart::Part::reader(file)
            .file_name(file_name)
            .mime_str(mime)?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.token)
            .multipart(form)
            .send()?;
        Self::read_reply(res)
    }

    fn read_reply(res: reqwest::blocking::Response) -> Result<AnalysisReply> {
        let status = res.status();
        let body = res.bytes()?.to_vec();
        debug!(%status, bytes = body.len(), "received reply");
        Ok(AnalysisReply { status, body })
    }
}

/// MIME type for the multipart part, guessed from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
