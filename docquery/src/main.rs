use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docquery::{ApiClient, ChatController, Config, DocumentStore, QueryResponse, UploadFlow};

#[derive(Parser)]
#[command(name = "docquery")]
#[command(about = "Upload documents and ask questions against a retrieval Q&A backend")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all indexed documents
    List,
    /// Show a single document's content
    Show { id: i64 },
    /// Upload a .md or .txt file for indexing
    Upload { path: PathBuf },
    /// Delete a document by id
    Delete { id: i64 },
    /// Ask a single question
    Ask {
        question: String,
        /// Maximum number of source excerpts to return
        #[arg(long)]
        top_k: Option<u32>,
        /// Skip the server-side second-pass relevance rerank
        #[arg(long)]
        no_rerank: bool,
    },
    /// Interactive question loop (empty line to exit)
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docquery=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::debug!(base_url = %config.base_url, "using backend");

    let client = Arc::new(ApiClient::new(&config)?);

    match args.command {
        Command::List => {
            let store = DocumentStore::new(client);
            store.initialize().await?;
            let snapshot = store.snapshot();
            if snapshot.documents.is_empty() {
                println!("No documents uploaded yet.");
            }
            for doc in snapshot.documents {
                println!(
                    "{:>6}  {}  (uploaded {})",
                    doc.id,
                    doc.filename,
                    doc.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Show { id } => {
            let doc = client.get_document(id).await?;
            println!("# {} (id {})", doc.filename, doc.id);
            println!("{}", doc.content);
        }
        Command::Upload { path } => {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let bytes = std::fs::read(&path)?;

            let store = DocumentStore::new(client.clone());
            let flow = UploadFlow::new(client);
            flow.select(filename, bytes);
            let doc = flow.submit(&store).await?;
            if let Some(doc) = doc {
                println!("Uploaded {} as document {}", doc.filename, doc.id);
            }
        }
        Command::Delete { id } => {
            let store = DocumentStore::new(client);
            store.initialize().await?;
            store.remove_document(id).await?;
            println!("Deleted document {id}");
        }
        Command::Ask {
            question,
            top_k,
            no_rerank,
        } => {
            let chat = ChatController::new(
                client,
                top_k.unwrap_or(config.top_k),
                !no_rerank && config.rerank,
            );
            chat.set_input(question);
            if let Some(response) = chat.submit().await? {
                print_response(&response);
            }
        }
        Command::Chat => {
            let chat = ChatController::new(client, config.top_k, config.rerank);
            run_chat_loop(&chat).await?;
        }
    }

    Ok(())
}

async fn run_chat_loop(chat: &ChatController) -> anyhow::Result<()> {
    let stdin = io::stdin();
    loop {
        print!("? ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            break;
        }

        chat.set_input(line.trim());
        // Errors are recorded on the controller; the loop stays alive so
        // the user can retry or ask something else.
        match chat.submit().await {
            Ok(Some(response)) => print_response(&response),
            Ok(None) => {}
            Err(_) => {
                if let Some(message) = chat.snapshot().error {
                    eprintln!("error: {message}");
                }
            }
        }
    }
    Ok(())
}

fn print_response(response: &QueryResponse) {
    println!("{}", response.answer);
    if !response.sources.is_empty() {
        println!();
        println!("Sources:");
        for source in &response.sources {
            println!(
                "  [doc {}] relevance {}: {}",
                source.document_id,
                source.score_display(),
                source.text
            );
        }
    }
}
