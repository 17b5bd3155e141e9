use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{config, DocQaClient, QaBackend};
use shared::domain::SessionId;

#[derive(Parser, Debug)]
#[command(about = "Terminal client for the document Q&A backend")]
struct Args {
    /// Backend base URL; overrides docqa.toml and DOCQA_SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Text document to upload before asking questions.
    #[arg(long)]
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    let session_id = SessionId::generate();
    let client = DocQaClient::new(settings.server_url, session_id.clone())?;

    let filename = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .context("file path has no usable filename")?
        .to_string();
    let content = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read '{}'", args.file.display()))?;

    upload_document(&client, &filename, content).await?;
    println!("Uploaded '{filename}' (session {})", session_id.short());

    println!("Type a question and press ENTER. Type 'exit' to quit.");
    let stdin = io::stdin();
    loop {
        print!("Q: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") {
            break;
        }
        // Failures are terminal for this attempt only; the loop keeps going.
        match client.ask(question).await {
            Ok(answer) => println!("A: {answer}\n"),
            Err(err) => eprintln!("{}", err.user_notice()),
        }
    }

    Ok(())
}

/// Maps upload failures to their user notice so the process reports the
/// failure exactly once on exit.
async fn upload_document(
    backend: &dyn QaBackend,
    filename: &str,
    content: Vec<u8>,
) -> Result<()> {
    backend
        .upload_document(filename, content)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_notice()))
}
