use serde::{Deserialize, Serialize};

/// Success body of `POST /upload`. Informational only; the client treats
/// any ok status as a completed upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Success body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// Error body the backend attaches to non-ok responses. The message is
/// shown to the user verbatim when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
