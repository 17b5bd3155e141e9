use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct MockBackendState {
    upload_hits: Arc<AtomicUsize>,
    ask_hits: Arc<AtomicUsize>,
    upload_status: StatusCode,
    upload_body: String,
    ask_status: StatusCode,
    ask_body: String,
    seen_session_ids: Arc<Mutex<Vec<String>>>,
    seen_filenames: Arc<Mutex<Vec<String>>>,
    seen_questions: Arc<Mutex<Vec<String>>>,
}

impl MockBackendState {
    fn ok() -> Self {
        Self {
            upload_hits: Arc::new(AtomicUsize::new(0)),
            ask_hits: Arc::new(AtomicUsize::new(0)),
            upload_status: StatusCode::OK,
            upload_body: r#"{"message":"Uploaded and embedded"}"#.to_string(),
            ask_status: StatusCode::OK,
            ask_body: r#"{"answer":"stub answer"}"#.to_string(),
            seen_session_ids: Arc::new(Mutex::new(Vec::new())),
            seen_filenames: Arc::new(Mutex::new(Vec::new())),
            seen_questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_upload_response(mut self, status: StatusCode, body: impl Into<String>) -> Self {
        self.upload_status = status;
        self.upload_body = body.into();
        self
    }

    fn with_ask_response(mut self, status: StatusCode, body: impl Into<String>) -> Self {
        self.ask_status = status;
        self.ask_body = body.into();
        self
    }

    fn upload_hits(&self) -> usize {
        self.upload_hits.load(Ordering::SeqCst)
    }

    fn ask_hits(&self) -> usize {
        self.ask_hits.load(Ordering::SeqCst)
    }
}

async fn record_fields(state: &MockBackendState, mut multipart: Multipart) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let text = field.text().await.unwrap_or_default();
        match name.as_deref() {
            Some("file") => {
                if let Some(file_name) = file_name {
                    state.seen_filenames.lock().await.push(file_name);
                }
            }
            Some("session_id") => state.seen_session_ids.lock().await.push(text),
            Some("question") => state.seen_questions.lock().await.push(text),
            _ => {}
        }
    }
}

async fn handle_upload(
    State(state): State<MockBackendState>,
    multipart: Multipart,
) -> impl IntoResponse {
    state.upload_hits.fetch_add(1, Ordering::SeqCst);
    record_fields(&state, multipart).await;
    (
        state.upload_status,
        [(header::CONTENT_TYPE, "application/json")],
        state.upload_body.clone(),
    )
}

async fn handle_ask(
    State(state): State<MockBackendState>,
    multipart: Multipart,
) -> impl IntoResponse {
    state.ask_hits.fetch_add(1, Ordering::SeqCst);
    record_fields(&state, multipart).await;
    (
        state.ask_status,
        [(header::CONTENT_TYPE, "application/json")],
        state.ask_body.clone(),
    )
}

async fn spawn_mock_backend(state: MockBackendState) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/upload", post(handle_upload))
        .route("/ask", post(handle_ask))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn test_client(server_url: &str) -> DocQaClient {
    DocQaClient::new(server_url, SessionId::from_raw("test-session")).expect("client")
}

#[test]
fn supported_document_check_is_case_insensitive() {
    assert!(is_supported_document("notes.txt"));
    assert!(is_supported_document("NOTES.TXT"));
    assert!(is_supported_document("report.v2.Txt"));
    assert!(!is_supported_document("image.png"));
    assert!(!is_supported_document("archive.txt.gz"));
    assert!(!is_supported_document("no_extension"));
    assert!(!is_supported_document(""));
}

#[test]
fn server_url_is_normalized_and_validated() {
    let client = test_client("http://127.0.0.1:8000/");
    assert_eq!(client.server_url(), "http://127.0.0.1:8000");

    assert!(DocQaClient::new("not a url", SessionId::generate()).is_err());
}

#[tokio::test]
async fn upload_sends_file_and_session_id_as_multipart() {
    let state = MockBackendState::ok();
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    client
        .upload_document("notes.txt", b"LangChain is a framework.".to_vec())
        .await
        .expect("upload");

    assert_eq!(state.upload_hits(), 1);
    assert_eq!(
        state.seen_filenames.lock().await.as_slice(),
        ["notes.txt".to_string()]
    );
    assert_eq!(
        state.seen_session_ids.lock().await.as_slice(),
        ["test-session".to_string()]
    );
}

#[tokio::test]
async fn upload_accepts_uppercase_extension() {
    let state = MockBackendState::ok();
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    client
        .upload_document("NOTES.TXT", b"content".to_vec())
        .await
        .expect("upload");
    assert_eq!(state.upload_hits(), 1);
}

#[tokio::test]
async fn upload_rejects_unsupported_extension_without_network() {
    let state = MockBackendState::ok();
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    let err = client
        .upload_document("image.png", b"\x89PNG".to_vec())
        .await
        .expect_err("must reject");

    assert!(matches!(err, UploadError::UnsupportedFileType { .. }));
    assert_eq!(err.user_notice(), "Only .txt files are supported.");
    assert_eq!(state.upload_hits(), 0);
}

#[tokio::test]
async fn upload_surfaces_server_error_message() {
    let state = MockBackendState::ok().with_upload_response(
        StatusCode::BAD_REQUEST,
        r#"{"error":"Parsed document is empty. Please check file content."}"#,
    );
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    let err = client
        .upload_document("notes.txt", Vec::new())
        .await
        .expect_err("must fail");

    assert_eq!(
        err.user_notice(),
        "Parsed document is empty. Please check file content."
    );
    assert!(matches!(err, UploadError::Rejected { .. }));
}

#[tokio::test]
async fn upload_maps_missing_error_body_to_generic_notice() {
    let state =
        MockBackendState::ok().with_upload_response(StatusCode::INTERNAL_SERVER_ERROR, "");
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    let err = client
        .upload_document("notes.txt", b"content".to_vec())
        .await
        .expect_err("must fail");

    assert!(matches!(err, UploadError::Status { .. }));
    assert_eq!(err.user_notice(), "Upload failed.");
}

#[tokio::test]
async fn upload_maps_unreachable_backend_to_generic_notice() {
    // Port 1 on localhost refuses connections.
    let client = test_client("http://127.0.0.1:1");

    let err = client
        .upload_document("notes.txt", b"content".to_vec())
        .await
        .expect_err("must fail");

    assert!(matches!(err, UploadError::Transport(_)));
    assert_eq!(err.user_notice(), "Upload failed.");
}

#[tokio::test]
async fn ask_returns_answer_verbatim() {
    let state = MockBackendState::ok()
        .with_ask_response(StatusCode::OK, r#"{"answer":"A framework for LLM apps."}"#);
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    let answer = client.ask("What is LangChain?").await.expect("ask");

    assert_eq!(answer, "A framework for LLM apps.");
    assert_eq!(state.ask_hits(), 1);
    assert_eq!(
        state.seen_questions.lock().await.as_slice(),
        ["What is LangChain?".to_string()]
    );
    assert_eq!(
        state.seen_session_ids.lock().await.as_slice(),
        ["test-session".to_string()]
    );
}

#[tokio::test]
async fn ask_falls_back_when_answer_field_is_missing() {
    let state = MockBackendState::ok().with_ask_response(StatusCode::OK, "{}");
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    let answer = client.ask("Anything in there?").await.expect("ask");
    assert_eq!(answer, NO_ANSWER_PLACEHOLDER);
}

#[tokio::test]
async fn ask_rejects_blank_questions_without_network() {
    let state = MockBackendState::ok();
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    for question in ["", "   ", "\t\n"] {
        let err = client.ask(question).await.expect_err("must reject");
        assert!(matches!(err, AskError::EmptyQuestion));
        assert_eq!(err.user_notice(), "Please enter a question.");
    }
    assert_eq!(state.ask_hits(), 0);
}

#[tokio::test]
async fn ask_maps_non_ok_status_to_generic_notice() {
    let state = MockBackendState::ok().with_ask_response(StatusCode::BAD_GATEWAY, "");
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    let err = client
        .ask("What is LangChain?")
        .await
        .expect_err("must fail");

    assert!(matches!(err, AskError::Status { .. }));
    assert_eq!(err.user_notice(), "Failed to fetch answer.");
}

#[tokio::test]
async fn session_id_is_reused_across_both_flows() {
    let state = MockBackendState::ok();
    let server_url = spawn_mock_backend(state.clone()).await.expect("spawn");
    let client = test_client(&server_url);

    client
        .upload_document("notes.txt", b"content".to_vec())
        .await
        .expect("upload");
    client.ask("What is LangChain?").await.expect("ask");
    client.ask("And again?").await.expect("ask");

    let seen = state.seen_session_ids.lock().await;
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|id| id == client.session_id().as_str()));
}
