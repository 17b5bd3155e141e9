//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

pub enum BackendCommand {
    UploadDocument {
        path: PathBuf,
        /// Selection generation. Terminal events echo it back so the UI can
        /// drop responses that belong to a superseded file selection.
        generation: u64,
    },
    Ask {
        question: String,
    },
}
