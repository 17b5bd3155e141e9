//! Backend worker: owns the tokio runtime and the HTTP client, drains the
//! UI command queue sequentially, and reports outcomes as UI events.

use std::thread;

use client_core::{DocQaClient, QaBackend};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::SessionId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let session_id = SessionId::generate();
            let client = match DocQaClient::new(server_url, session_id.clone()) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err:#}"),
                    )));
                    tracing::error!("failed to build backend client: {err:#}");
                    return;
                }
            };
            tracing::info!(session_id = session_id.as_str(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::BackendReady {
                session_id: session_id.as_str().to_string(),
            });

            process_commands(&client, cmd_rx, ui_tx).await;
        });
    });
}

async fn process_commands(
    backend: &dyn QaBackend,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            BackendCommand::UploadDocument { path, generation } => {
                let filename = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or_default()
                    .to_string();

                let outcome = if !client_core::is_supported_document(&filename) {
                    Err(UiError::validation(
                        UiErrorContext::Upload,
                        client_core::UNSUPPORTED_FILE_NOTICE,
                    ))
                } else {
                    match tokio::fs::read(&path).await {
                        Ok(content) => backend
                            .upload_document(&filename, content)
                            .await
                            .map_err(|err| UiError::from_upload_error(&err)),
                        Err(err) => {
                            tracing::warn!(path = %path.display(), "failed to read selected file: {err}");
                            Err(UiError::from_message(
                                UiErrorContext::Upload,
                                format!("Failed to read '{}': {err}", path.display()),
                            ))
                        }
                    }
                };
                let _ = ui_tx.try_send(UiEvent::UploadFinished { generation, outcome });
            }
            BackendCommand::Ask { question } => {
                let outcome = backend
                    .ask(&question)
                    .await
                    .map_err(|err| UiError::from_ask_error(&err));
                let _ = ui_tx.try_send(UiEvent::AskFinished { outcome });
            }
        }
    }
}
