use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client};
use shared::{
    domain::SessionId,
    protocol::{AskResponse, ErrorBody, UploadAck},
};
use tracing::{debug, info, warn};

pub mod config;
pub mod error;

pub use error::{
    AskError, UploadError, ASK_FAILED_NOTICE, EMPTY_QUESTION_NOTICE, UNSUPPORTED_FILE_NOTICE,
    UPLOAD_FAILED_NOTICE,
};

/// Placeholder stored when the backend's ask response carries no answer
/// field.
pub const NO_ANSWER_PLACEHOLDER: &str = "No answer.";

/// The backend only ingests plain-text documents.
pub const SUPPORTED_EXTENSION: &str = "txt";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
// Answering runs retrieval plus an LLM call on the backend, so it gets a
// longer budget than the upload.
const ASK_TIMEOUT: Duration = Duration::from_secs(120);

/// Returns true when `filename` ends in `.txt`, compared case-insensitively.
pub fn is_supported_document(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SUPPORTED_EXTENSION))
}

/// Client-side surface of the document-QA backend. Object-safe so UI
/// workers and tests can substitute the transport.
#[async_trait]
pub trait QaBackend: Send + Sync {
    /// Uploads one document for this session. Validation failures are
    /// reported without any request being made.
    async fn upload_document(&self, filename: &str, content: Vec<u8>) -> Result<(), UploadError>;

    /// Asks one question against the session's uploaded document and
    /// returns the answer text.
    async fn ask(&self, question: &str) -> Result<String, AskError>;
}

/// HTTP client for the document-QA backend. Holds the session identifier
/// for the lifetime of the process; every request carries it.
pub struct DocQaClient {
    http: Client,
    server_url: String,
    session_id: SessionId,
}

impl DocQaClient {
    pub fn new(server_url: impl Into<String>, session_id: SessionId) -> Result<Self> {
        let server_url = normalize_server_url(&server_url.into())?;
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            server_url,
            session_id,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

#[async_trait]
impl QaBackend for DocQaClient {
    async fn upload_document(&self, filename: &str, content: Vec<u8>) -> Result<(), UploadError> {
        if !is_supported_document(filename) {
            return Err(UploadError::UnsupportedFileType {
                filename: filename.to_string(),
            });
        }

        let file_part = multipart::Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str("text/plain")
            .map_err(UploadError::Transport)?;
        let form = multipart::Form::new()
            .part("file", file_part)
            .text("session_id", self.session_id.as_str().to_string());

        debug!(
            filename,
            session_id = self.session_id.as_str(),
            "uploading document"
        );
        let response = self
            .http
            .post(format!("{}/upload", self.server_url))
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            if let Ok(ErrorBody { error }) = serde_json::from_slice::<ErrorBody>(&body) {
                warn!(%status, error, "upload rejected by server");
                return Err(UploadError::Rejected { message: error });
            }
            warn!(%status, "upload failed without a usable error body");
            return Err(UploadError::Status { status });
        }

        let ack: UploadAck = response.json().await?;
        info!(
            filename,
            message = ack.message.as_deref().unwrap_or(""),
            "document uploaded"
        );
        Ok(())
    }

    async fn ask(&self, question: &str) -> Result<String, AskError> {
        if question.trim().is_empty() {
            return Err(AskError::EmptyQuestion);
        }

        let form = multipart::Form::new()
            .text("question", question.to_string())
            .text("session_id", self.session_id.as_str().to_string());

        debug!(session_id = self.session_id.as_str(), "asking question");
        let response = self
            .http
            .post(format!("{}/ask", self.server_url))
            .multipart(form)
            .timeout(ASK_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "ask request failed");
            return Err(AskError::Status { status });
        }

        let body: AskResponse = response.json().await?;
        Ok(body
            .answer
            .unwrap_or_else(|| NO_ANSWER_PLACEHOLDER.to_string()))
    }
}

fn normalize_server_url(raw: &str) -> Result<String> {
    let parsed = url::Url::parse(raw).with_context(|| format!("invalid server url '{raw}'"))?;
    let mut normalized = parsed.to_string();
    while normalized.ends_with('/') {
        normalized.pop();
    }
    Ok(normalized)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
