//! Interactive prompt editor with tag completion
//!
//! Loads the corpus in the background, runs every search on the blocking pool
//! and feeds results back through a channel. On quit the final prompt is
//! printed to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tagcomplete_core::{
    search_tags,
    suggest::SearchTicket,
    tui::{EditorAction, EditorEvent, EventLoop, PromptEditor, TerminalConfig, TerminalManager},
    Corpus, CorpusLoader, SearchResult, SuggestionSettings, TagConfig, TagLibrary,
};
use tokio::sync::mpsc;
use tracing::{debug, error, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tagcomplete-edit")]
#[command(about = "Edit a prompt with tag suggestions", long_about = None)]
#[command(version)]
struct Args {
    /// Initial prompt text
    text: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, env = "TAGCOMPLETE_CONFIG")]
    config: Option<PathBuf>,

    /// Tag table location (file path or http(s) URL), overrides the config
    #[arg(long)]
    source: Option<String>,

    /// Cache database path, overrides the config
    #[arg(long)]
    cache_path: Option<PathBuf>,

    /// Load without the durable cache
    #[arg(long)]
    no_cache: bool,

    /// Set log level (logs go to stderr, below the editor)
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

enum Message {
    Loaded(std::result::Result<Arc<Corpus>, String>),
    Results(SearchTicket, Vec<SearchResult>),
}

fn load_config(args: &Args) -> Result<TagConfig> {
    TagConfig::load(args.config.as_deref())
        .context("Failed to load config")?
        .with_overrides(args.source.clone(), args.cache_path.clone(), args.no_cache)
        .context("Invalid configuration")
}

/// Run a ticket on the blocking pool; the result comes back as a message
fn spawn_search(
    corpus: Arc<Corpus>,
    ticket: SearchTicket,
    limit: usize,
    tx: mpsc::UnboundedSender<Message>,
) {
    tokio::task::spawn_blocking(move || {
        let results = search_tags(&corpus, &ticket.span.token, limit);
        let _ = tx.send(Message::Results(ticket, results));
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::ERROR,
    };

    let filter = EnvFilter::new(format!(
        "tagcomplete_edit={},tagcomplete_core={}",
        level.as_str().to_lowercase(),
        level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Logs to stderr, not stdout
        .init();

    let config = load_config(&args)?;
    let settings = SuggestionSettings::from(&config);

    let library = Arc::new(TagLibrary::new(
        CorpusLoader::from_config(&config)
            .await
            .context("Failed to set up tag loader")?,
    ));

    let (tx, mut rx) = mpsc::unbounded_channel();

    {
        let library = Arc::clone(&library);
        let tx = tx.clone();
        tokio::spawn(async move {
            let loaded = library.corpus().await.map_err(|e| e.to_string());
            let _ = tx.send(Message::Loaded(loaded));
        });
    }

    let mut editor = PromptEditor::new(settings);
    editor.set_status(format!("Loading tags from {}...", config.source));
    if let Some(text) = args.text {
        // No corpus yet; the search is re-issued once it loads
        editor.set_text(text);
    }

    let mut corpus: Option<Arc<Corpus>> = None;
    let mut terminal = TerminalManager::new(TerminalConfig::default())?;
    let events = EventLoop::default();

    loop {
        while let Ok(message) = rx.try_recv() {
            match message {
                Message::Loaded(Ok(loaded)) => {
                    if let EditorAction::Search(ticket) = editor.corpus_loaded(loaded.len()) {
                        spawn_search(Arc::clone(&loaded), ticket, settings.limit, tx.clone());
                    }
                    corpus = Some(loaded);
                }
                Message::Loaded(Err(e)) => {
                    error!("Failed to load tags: {}", e);
                    editor.set_status(format!("Failed to load tags: {}", e));
                }
                Message::Results(ticket, results) => {
                    if !editor.apply_search(ticket, results) {
                        debug!("Dropped stale search results");
                    }
                }
            }
        }

        terminal.draw(|frame| editor.render(frame))?;

        match events.poll_event()? {
            EditorEvent::Quit => break,
            EditorEvent::Key(key) => {
                // Without a corpus the ticket is dropped; loading re-issues it
                let action = editor.handle_key(key);
                if let (EditorAction::Search(ticket), Some(corpus)) = (action, &corpus) {
                    spawn_search(Arc::clone(corpus), ticket, settings.limit, tx.clone());
                }
            }
            EditorEvent::Resize(..) | EditorEvent::Tick => {}
        }
    }

    drop(terminal);
    println!("{}", editor.text());

    Ok(())
}
