//! App shell: renders the upload and ask panels from the flow state
//! machines and wires user actions onto the backend command queue.

use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiErrorCategory, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{FlowState, QueryPhase, UploadPhase};

const OK_GREEN: egui::Color32 = egui::Color32::from_rgb(0x2e, 0xcc, 0x71);
const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(0xe7, 0x4c, 0x3c);

fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

fn err_scope(context: UiErrorContext) -> &'static str {
    match context {
        UiErrorContext::BackendStartup => "startup",
        UiErrorContext::Upload => "upload",
        UiErrorContext::Ask => "ask",
        UiErrorContext::General => "app",
    }
}

pub struct DocQaApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    server_url: String,
    session_id: Option<String>,
    backend_ready: bool,

    flows: FlowState,
    question: String,

    status: String,
}

impl DocQaApp {
    pub fn new(
        server_url: String,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            server_url,
            session_id: None,
            backend_ready: false,
            flows: FlowState::new(),
            question: String::new(),
            status: "Starting...".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::BackendReady { session_id } => {
                    self.backend_ready = true;
                    self.session_id = Some(session_id);
                    self.status = "Ready".to_string();
                }
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::UploadFinished {
                    generation,
                    outcome,
                } => {
                    self.flows.finish_upload(generation, outcome);
                    match self.flows.upload() {
                        UploadPhase::Succeeded { filename } => {
                            self.status = format!("Uploaded '{filename}'");
                        }
                        UploadPhase::Failed { notice } => {
                            self.status = notice.clone();
                        }
                        // A stale response was dropped; a newer upload is
                        // still outstanding.
                        _ => {}
                    }
                }
                UiEvent::AskFinished { outcome } => {
                    self.flows.finish_ask(outcome);
                    if let QueryPhase::Failed { notice } = self.flows.query() {
                        self.status = notice.clone();
                    } else {
                        self.status = "Ready".to_string();
                    }
                }
                UiEvent::Error(err) => {
                    self.status = format!(
                        "{} error during {}: {}",
                        err_label(err.category()),
                        err_scope(err.context()),
                        err.notice()
                    );
                }
            }
        }
    }

    fn pick_document(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Text document", &["txt"])
            .pick_file()
        else {
            return;
        };
        self.handle_picked_document(path);
    }

    fn handle_picked_document(&mut self, path: PathBuf) {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        // The picker filters to .txt, but nothing stops a manually typed
        // path, so the selection is validated again here.
        if !client_core::is_supported_document(&filename) {
            self.flows.reject_upload(client_core::UNSUPPORTED_FILE_NOTICE);
            self.status = client_core::UNSUPPORTED_FILE_NOTICE.to_string();
            return;
        }

        let generation = self.flows.begin_upload(filename);
        self.status = "Uploading...".to_string();
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::UploadDocument { path, generation },
            &mut self.status,
        );
    }

    fn submit_question(&mut self) {
        if !self.flows.can_ask() {
            return;
        }
        let question = self.question.trim().to_string();
        if question.is_empty() {
            self.status = client_core::EMPTY_QUESTION_NOTICE.to_string();
            return;
        }
        self.flows.begin_ask();
        self.status = "Waiting for answer...".to_string();
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Ask { question },
            &mut self.status,
        );
    }

    fn show_upload_section(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Upload a .txt file").strong());
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            // The picker stays enabled during an in-flight upload so a new
            // selection can supersede it; the generation guard drops the
            // stale response.
            let picker_enabled = self.backend_ready;
            if ui
                .add_enabled(picker_enabled, egui::Button::new("Choose file..."))
                .clicked()
            {
                self.pick_document();
            }
            match self.flows.upload() {
                UploadPhase::Idle => {
                    ui.weak("No document selected");
                }
                UploadPhase::InFlight { filename, .. } => {
                    ui.spinner();
                    ui.label(format!("Uploading '{filename}'..."));
                }
                UploadPhase::Succeeded { filename } => {
                    ui.colored_label(OK_GREEN, format!("Upload complete: {filename}"));
                }
                UploadPhase::Failed { notice } => {
                    ui.colored_label(ERROR_RED, notice);
                }
            }
        });
    }

    fn show_ask_section(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Ask a question").strong());
        ui.add_space(4.0);
        let ask_enabled = self.flows.can_ask();
        ui.horizontal(|ui| {
            let hint = if self.flows.uploaded() {
                "e.g. What is LangChain?"
            } else {
                "Please upload a file first"
            };
            let input = egui::TextEdit::singleline(&mut self.question)
                .hint_text(hint)
                .desired_width((ui.available_width() - 72.0).max(120.0));
            let response = ui.add_enabled(ask_enabled, input);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui
                .add_enabled(ask_enabled, egui::Button::new("Ask"))
                .clicked();
            if submitted || clicked {
                self.submit_question();
            }
        });
    }

    fn show_answer_block(&mut self, ui: &mut egui::Ui) {
        match self.flows.query() {
            QueryPhase::Idle => {}
            QueryPhase::InFlight => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak("Thinking...");
                });
            }
            QueryPhase::Answered { answer } => {
                let answer = answer.clone();
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.weak("Answer:");
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, true])
                        .max_height(220.0)
                        .show(ui, |ui| {
                            ui.label(answer);
                        });
                });
            }
            QueryPhase::Failed { notice } => {
                let notice = notice.clone();
                ui.colored_label(ERROR_RED, notice);
            }
        }
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(session_id) = &self.session_id {
                        let short = session_id.get(..8).unwrap_or(session_id);
                        ui.weak(format!("session {short}"));
                    }
                    ui.weak(self.server_url.clone());
                });
            });
        });
    }
}

impl eframe::App for DocQaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Document Q&A");
            ui.add_space(12.0);
            self.show_upload_section(ui);
            ui.add_space(12.0);
            ui.separator();
            ui.add_space(8.0);
            self.show_ask_section(ui);
            ui.add_space(8.0);
            self.show_answer_block(ui);
        });

        // Keep polling the worker's event queue while requests are in
        // flight; otherwise a lazy repaint cadence is enough.
        if self.flows.uploading() || self.flows.answer_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(150));
        }
    }
}
