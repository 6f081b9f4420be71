//! Tagcomplete - tag search and completion from the command line
//!
//! Scriptable front end over the library: ranked search, token location,
//! escaping, a one-shot completion and cache maintenance.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tagcomplete_core::{
    escape_tag, get_current_token,
    storage::{CORPUS_KEY, VERSION_KEY},
    utils::string::format_count,
    CacheStore, CorpusLoader, SqliteCacheStore, SuggestionController,
    SuggestionSettings, TagConfig, TagLibrary,
};
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "tagcomplete")]
#[command(about = "In-context tag completion over large tag vocabularies", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

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

    /// Set log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search tags by name or alias
    Search {
        /// Query text
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the token under the caret
    Token {
        /// Prompt text
        text: String,

        /// Caret byte offset (defaults to the end of the text)
        #[arg(long)]
        cursor: Option<usize>,

        /// Print the span as JSON
        #[arg(long)]
        json: bool,
    },

    /// Escape a tag name for the prompt syntax
    Escape {
        /// Canonical tag name
        name: String,
    },

    /// Complete the token under the caret and print the resulting text
    Complete {
        /// Prompt text
        text: String,

        /// Caret byte offset (defaults to the end of the text)
        #[arg(long)]
        cursor: Option<usize>,

        /// Index of the suggestion to commit
        #[arg(long, default_value = "0")]
        pick: usize,
    },

    /// Manage the durable tag cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show the cached version and size
    Status,

    /// Remove the cached corpus
    Clear,

    /// Reload from the source and overwrite the cache
    Refresh,
}

fn load_config(cli: &Cli) -> Result<TagConfig> {
    TagConfig::load(cli.config.as_deref())
        .context("Failed to load config")?
        .with_overrides(cli.source.clone(), cli.cache_path.clone(), cli.no_cache)
        .context("Invalid configuration")
}

async fn open_library(config: &TagConfig) -> Result<TagLibrary> {
    let loader = CorpusLoader::from_config(config)
        .await
        .context("Failed to set up tag loader")?;
    Ok(TagLibrary::new(loader))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::new(format!(
        "tagcomplete={},tagcomplete_core={}",
        level.as_str().to_lowercase(),
        level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Logs to stderr, stdout is for results
        .init();

    debug!("tagcomplete v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Search { query, limit, json } => {
            let library = open_library(&config).await?;
            let limit = limit.unwrap_or(config.result_limit);
            let results = library
                .search(&query, limit)
                .await
                .context("Failed to load tags")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
                return Ok(());
            }

            if results.is_empty() {
                println!("No tags match '{}'", query);
            }
            for result in results {
                let entry = &result.entry;
                if entry.aliases.is_empty() {
                    println!(
                        "{:<10} {} ({})",
                        entry.category.label(),
                        entry.name,
                        format_count(entry.popularity)
                    );
                } else {
                    println!(
                        "{:<10} {} ({})  [{}]",
                        entry.category.label(),
                        entry.name,
                        format_count(entry.popularity),
                        entry.aliases
                    );
                }
            }
        }
        Commands::Token { text, cursor, json } => {
            let cursor = cursor.unwrap_or(text.len());
            let span = get_current_token(&text, cursor);
            if json {
                println!("{}", serde_json::to_string(&span)?);
                return Ok(());
            }
            match span {
                Some(span) => println!("{}\t{}\t{}", span.token, span.start, span.end),
                None => println!("no token"),
            }
        }
        Commands::Escape { name } => {
            println!("{}", escape_tag(&name));
        }
        Commands::Complete { text, cursor, pick } => {
            let library = open_library(&config).await?;
            let corpus = library.corpus().await.context("Failed to load tags")?;
            let cursor = cursor.unwrap_or(text.len());

            let mut controller = SuggestionController::new(SuggestionSettings::from(&config));
            if !controller.refresh(&corpus, &text, cursor) {
                bail!("No suggestions at caret position {}", cursor);
            }

            let available = controller.results().len();
            match controller.commit(pick, &text) {
                Some(commit) => println!("{}", commit.text),
                None => bail!("Suggestion {} out of range ({} available)", pick, available),
            }
        }
        Commands::Cache { action } => {
            if !config.cache_enabled {
                bail!("Cache is disabled");
            }
            let path = config.resolved_cache_path();

            match action {
                CacheAction::Status => {
                    let store = SqliteCacheStore::open(&path)
                        .await
                        .with_context(|| format!("Failed to open cache at {}", path.display()))?;
                    println!("Cache:    {}", path.display());
                    match store.get(VERSION_KEY).await? {
                        Some(version) => {
                            let version = String::from_utf8_lossy(&version).to_string();
                            let state = if version == config.version {
                                "current"
                            } else {
                                "stale"
                            };
                            println!("Version:  {} ({})", version, state);
                        }
                        None => println!("Version:  (empty)"),
                    }
                    if let Some(bytes) = store.get(CORPUS_KEY).await? {
                        println!("Size:     {} bytes", bytes.len());
                    }
                }
                CacheAction::Clear => {
                    let store = SqliteCacheStore::open(&path)
                        .await
                        .with_context(|| format!("Failed to open cache at {}", path.display()))?;
                    store.clear().await.context("Failed to clear cache")?;
                    println!("Cleared {}", path.display());
                }
                CacheAction::Refresh => {
                    let library = open_library(&config).await?;
                    let loader = library.loader();
                    if loader.store().is_none() {
                        bail!("Cache at {} is unavailable", path.display());
                    }
                    let corpus = loader.refresh().await.context("Failed to refresh cache")?;
                    println!(
                        "Cached {} tags (version {})",
                        corpus.len(),
                        loader.version()
                    );
                }
            }
        }
    }

    Ok(())
}
