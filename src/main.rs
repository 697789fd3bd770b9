use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use papyrus::session::{Conversation, FileHandle, UploadSession};
use papyrus::types::Sender;
use papyrus::util::RandomIds;
use papyrus::{Config, HttpBackend};

fn print_usage() {
    println!("commands:");
    println!("  open <path>   select a document (.pdf, .txt, .doc, .docx)");
    println!("  remove        discard the selected document");
    println!("  upload        upload the selected document");
    println!("  quit          exit");
    println!("anything else is asked as a question once a document is uploaded");
}

/// Maps a file extension onto the declared media type a browser picker would
/// have attached to the handle.
fn media_type_for_path(path: &Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        "doc" => Some("application/msword"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => None,
    }
}

fn open_file(session: &mut UploadSession, raw_path: &str) {
    let path = Path::new(raw_path.trim());
    let Some(media_type) = media_type_for_path(path) else {
        println!("Please upload PDF, DOCX or TXT file.");
        return;
    };
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(err) => {
            println!("could not read {}: {}", path.display(), err);
            return;
        }
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw_path.trim().to_string());
    match session.select(FileHandle {
        name,
        media_type: media_type.to_string(),
        data,
    }) {
        Ok(()) => {
            if let Some(file) = session.file() {
                println!("selected {} ({})", file.name, file.size);
            }
        }
        Err(err) => println!("{err}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let config = Config::from_env();
    let backend = HttpBackend::new(config.endpoint.clone());
    let mut upload = UploadSession::new();
    let mut chat = Conversation::new();
    let mut ids = RandomIds;

    println!("papyrus - upload a document, then ask anything about it");
    println!("backend: {}", config.endpoint);
    print_usage();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => {}
            "quit" | "exit" => break,
            "help" => print_usage(),
            "remove" => match upload.remove() {
                Ok(()) => println!("file removed"),
                Err(err) => println!("{err}"),
            },
            "upload" => match upload.upload(&backend).await {
                Ok(file_id) => println!("uploaded, file id: {file_id}"),
                Err(err) => println!("upload failed: {err}"),
            },
            _ if line.starts_with("open ") => open_file(&mut upload, &line[5..]),
            question => {
                let Some(file_id) = upload.file_id().map(str::to_string) else {
                    println!("upload a document first");
                    continue;
                };
                let before = chat.messages().len();
                if chat.ask(&backend, &file_id, question, &mut ids).await.is_none() {
                    continue;
                }
                for msg in &chat.messages()[before..] {
                    let who = match msg.sender {
                        Sender::User => "you",
                        Sender::Assistant => "papyrus",
                    };
                    println!("[{}] {}: {}", msg.timestamp, who, msg.text);
                }
            }
        }
    }

    Ok(())
}
