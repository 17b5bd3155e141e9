//! UI/backend events and error modeling for the desktop controller.

use client_core::{AskError, UploadError};

pub enum UiEvent {
    /// The worker built its runtime and client; carries the session id for
    /// the status footer.
    BackendReady {
        session_id: String,
    },
    Info(String),
    UploadFinished {
        generation: u64,
        outcome: Result<(), UiError>,
    },
    AskFinished {
        outcome: Result<String, UiError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Server,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Upload,
    Ask,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    notice: String,
}

impl UiError {
    /// Classifies flow errors from their type rather than message sniffing.
    pub fn from_upload_error(err: &UploadError) -> Self {
        let category = match err {
            UploadError::UnsupportedFileType { .. } => UiErrorCategory::Validation,
            UploadError::Rejected { .. } | UploadError::Status { .. } => UiErrorCategory::Server,
            UploadError::Transport(_) => UiErrorCategory::Transport,
        };
        Self {
            category,
            context: UiErrorContext::Upload,
            notice: err.user_notice(),
        }
    }

    pub fn from_ask_error(err: &AskError) -> Self {
        let category = match err {
            AskError::EmptyQuestion => UiErrorCategory::Validation,
            AskError::Status { .. } => UiErrorCategory::Server,
            AskError::Transport(_) => UiErrorCategory::Transport,
        };
        Self {
            category,
            context: UiErrorContext::Ask,
            notice: err.user_notice().to_string(),
        }
    }

    pub fn validation(context: UiErrorContext, notice: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context,
            notice: notice.into(),
        }
    }

    /// Fallback for errors that only exist as text (startup failures,
    /// file-read problems).
    pub fn from_message(context: UiErrorContext, notice: impl Into<String>) -> Self {
        let notice = notice.into();
        let lower = notice.to_ascii_lowercase();
        let category = if lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("unreachable")
        {
            UiErrorCategory::Transport
        } else if lower.contains("invalid") || lower.contains("unsupported") {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };
        Self {
            category,
            context,
            notice,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn notice(&self) -> &str {
        &self.notice
    }
}
