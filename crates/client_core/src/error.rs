use reqwest::StatusCode;
use thiserror::Error;

/// Shown when a selected file does not have a `.txt` extension.
pub const UNSUPPORTED_FILE_NOTICE: &str = "Only .txt files are supported.";
/// Shown when a question is empty or whitespace-only.
pub const EMPTY_QUESTION_NOTICE: &str = "Please enter a question.";
/// Generic notice for upload failures without a server-provided message.
pub const UPLOAD_FAILED_NOTICE: &str = "Upload failed.";
/// Generic notice for ask failures.
pub const ASK_FAILED_NOTICE: &str = "Failed to fetch answer.";

#[derive(Debug, Error)]
pub enum UploadError {
    /// Rejected locally; no request was made.
    #[error("unsupported file type: '{filename}'")]
    UnsupportedFileType { filename: String },
    /// The backend refused the upload and said why.
    #[error("upload rejected by server: {message}")]
    Rejected { message: String },
    /// Non-ok status without a usable error body.
    #[error("upload failed with status {status}")]
    Status { status: StatusCode },
    /// The request never completed, or the success body was malformed.
    #[error("upload transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl UploadError {
    /// Text shown to the user for this failure. Server-provided messages
    /// are surfaced verbatim; everything else collapses to a fixed notice.
    pub fn user_notice(&self) -> String {
        match self {
            Self::UnsupportedFileType { .. } => UNSUPPORTED_FILE_NOTICE.to_string(),
            Self::Rejected { message } => message.clone(),
            Self::Status { .. } | Self::Transport(_) => UPLOAD_FAILED_NOTICE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AskError {
    /// Rejected locally; no request was made.
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("ask failed with status {status}")]
    Status { status: StatusCode },
    #[error("ask transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AskError {
    pub fn user_notice(&self) -> &'static str {
        match self {
            Self::EmptyQuestion => EMPTY_QUESTION_NOTICE,
            Self::Status { .. } | Self::Transport(_) => ASK_FAILED_NOTICE,
        }
    }
}
