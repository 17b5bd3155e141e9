//! Reducer-style state machines for the two backend flows.
//!
//! Each flow is a small FSM so contradictory flag combinations (uploading
//! and uploaded at the same time) cannot be represented.

use crate::controller::events::UiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    InFlight { generation: u64, filename: String },
    Succeeded { filename: String },
    Failed { notice: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    InFlight,
    Answered { answer: String },
    Failed { notice: String },
}

#[derive(Debug)]
pub struct FlowState {
    upload: UploadPhase,
    query: QueryPhase,
    next_generation: u64,
}

impl FlowState {
    pub fn new() -> Self {
        Self {
            upload: UploadPhase::Idle,
            query: QueryPhase::Idle,
            next_generation: 0,
        }
    }

    pub fn upload(&self) -> &UploadPhase {
        &self.upload
    }

    pub fn query(&self) -> &QueryPhase {
        &self.query
    }

    pub fn uploading(&self) -> bool {
        matches!(self.upload, UploadPhase::InFlight { .. })
    }

    pub fn uploaded(&self) -> bool {
        matches!(self.upload, UploadPhase::Succeeded { .. })
    }

    pub fn answer_loading(&self) -> bool {
        matches!(self.query, QueryPhase::InFlight)
    }

    /// Ask is only available once a document upload has succeeded for this
    /// session and no question is currently outstanding.
    pub fn can_ask(&self) -> bool {
        self.uploaded() && !self.answer_loading()
    }

    /// Records a new file selection. A later selection supersedes any
    /// in-flight upload; the superseded response is dropped by generation
    /// compare in [`FlowState::finish_upload`].
    pub fn begin_upload(&mut self, filename: String) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.upload = UploadPhase::InFlight {
            generation,
            filename,
        };
        generation
    }

    /// Marks a locally rejected selection without starting an upload.
    pub fn reject_upload(&mut self, notice: impl Into<String>) {
        self.upload = UploadPhase::Failed {
            notice: notice.into(),
        };
    }

    pub fn finish_upload(&mut self, generation: u64, outcome: Result<(), UiError>) {
        let (current, filename) = match &self.upload {
            UploadPhase::InFlight {
                generation,
                filename,
            } => (*generation, filename.clone()),
            _ => return,
        };
        if current != generation {
            tracing::debug!(
                stale = generation,
                current,
                "dropping upload response for superseded selection"
            );
            return;
        }
        self.upload = match outcome {
            Ok(()) => UploadPhase::Succeeded { filename },
            Err(err) => UploadPhase::Failed {
                notice: err.notice().to_string(),
            },
        };
    }

    /// A new question always clears the previous answer first.
    pub fn begin_ask(&mut self) {
        self.query = QueryPhase::InFlight;
    }

    pub fn finish_ask(&mut self, outcome: Result<String, UiError>) {
        self.query = match outcome {
            Ok(answer) => QueryPhase::Answered { answer },
            Err(err) => QueryPhase::Failed {
                notice: err.notice().to_string(),
            },
        };
    }
}
