//! feedcycle CLI - relative timestamps and document store access
//!
//! Also the composition root: the database handle provider is created here
//! and only connects when a command actually needs the database.

mod logging;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::debug;

use feedcycle_core::application::{time_ago, DatabaseHandleProvider, RelativeTimeFormatter};
use feedcycle_core::domain::{Collection, Document, DocumentId};
use feedcycle_core::port::id_provider::UuidProvider;
use feedcycle_core::port::time_provider::SystemTimeProvider;
use feedcycle_core::port::{DocumentStore, IdProvider, TimeProvider};
use feedcycle_infra_sqlite::{SqliteConnector, SqliteDocumentStore, ENV_DB_URL};

const DEFAULT_LIST_LIMIT: u32 = 20;
const PREVIEW_WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "feedcycle")]
#[command(about = "News feed cycle utilities", long_about = None)]
#[command(version = feedcycle_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database URL (default: ~/.feedcycle/documents.db)
    #[arg(long, global = true, env = ENV_DB_URL)]
    db_url: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print how long ago a timestamp was (e.g. "2h ago")
    Ago {
        /// RFC 3339 datetime or epoch milliseconds
        timestamp: String,

        /// Reference time (default: now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Document operations
    #[command(subcommand)]
    Doc(DocCommands),

    /// Database operations
    #[command(subcommand)]
    Db(DbCommands),
}

#[derive(Subcommand)]
enum DocCommands {
    /// Store a document (prints its id)
    Put {
        collection: String,

        /// Document body as JSON
        data: String,

        /// Document id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Print a document as JSON
    Get { collection: String, id: String },

    /// List most recently updated documents
    List {
        collection: String,

        #[arg(
            short = 'n',
            long,
            default_value_t = DEFAULT_LIST_LIMIT,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        limit: u32,
    },

    /// Delete a document
    Delete { collection: String, id: String },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Connect and report per-collection document counts
    Status,
}

#[derive(Tabled)]
struct DocumentRow {
    id: String,
    updated: String,
    data: String,
}

#[derive(Tabled)]
struct CollectionRow {
    collection: String,
    documents: u64,
}

/// Application wiring: clock, ids and the lazily connected store
struct App {
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
    database: DatabaseHandleProvider<SqliteConnector>,
}

impl App {
    fn new(db_url: Option<String>) -> Self {
        Self::with_id_provider(db_url, Arc::new(UuidProvider))
    }

    /// `db_url` only replaces the URL; pool settings still come from the environment
    fn with_id_provider(db_url: Option<String>, id_provider: Arc<dyn IdProvider>) -> Self {
        let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
        let connector = match db_url {
            Some(url) => SqliteConnector::from_env_with_url(url, time_provider.clone()),
            None => SqliteConnector::from_env(time_provider.clone()),
        };

        Self {
            time_provider,
            id_provider,
            database: DatabaseHandleProvider::new(connector),
        }
    }

    async fn store(&self) -> Result<Arc<SqliteDocumentStore>> {
        self.database
            .get()
            .await
            .context("Failed to open document database")
    }
}

/// Parse RFC 3339 (`2024-01-05T08:30:00Z`) or epoch milliseconds
fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(millis) = input.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis)
            .with_context(|| format!("Timestamp out of range: {}", millis));
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid timestamp {:?} (expected RFC 3339 or epoch ms)", input))
}

fn preview(value: &serde_json::Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= PREVIEW_WIDTH {
        return text;
    }
    let cut: String = text.chars().take(PREVIEW_WIDTH - 1).collect();
    format!("{}…", cut)
}

fn parse_collection(name: &str) -> Result<Collection> {
    Ok(Collection::new(name)?)
}

fn parse_id(id: &str) -> Result<DocumentId> {
    Ok(DocumentId::new(id)?)
}

async fn run_doc(app: &App, command: DocCommands) -> Result<()> {
    match command {
        DocCommands::Put {
            collection,
            data,
            id,
        } => {
            let collection = parse_collection(&collection)?;
            let data: serde_json::Value =
                serde_json::from_str(&data).context("Invalid JSON document")?;
            let id = match id {
                Some(id) => parse_id(&id)?,
                None => app.id_provider.generate_id(),
            };

            let store = app.store().await?;
            let written = store.set(Document::new(collection, id, data)).await?;
            println!("{}", written.id);
        }

        DocCommands::Get { collection, id } => {
            let collection = parse_collection(&collection)?;
            let id = parse_id(&id)?;

            let store = app.store().await?;
            let document = store
                .get(&collection, &id)
                .await?
                .with_context(|| format!("Document {}/{} not found", collection, id))?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }

        DocCommands::List { collection, limit } => {
            let collection = parse_collection(&collection)?;
            let store = app.store().await?;
            let documents = store.list(&collection, limit).await?;

            if documents.is_empty() {
                println!("{}", format!("No documents in {}", collection).yellow());
                return Ok(());
            }

            let formatter = RelativeTimeFormatter::new(app.time_provider.clone());
            let rows: Vec<DocumentRow> = documents
                .iter()
                .map(|doc| DocumentRow {
                    id: doc.id.to_string(),
                    updated: formatter.format(doc.updated_at),
                    data: preview(&doc.data),
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        DocCommands::Delete { collection, id } => {
            let collection = parse_collection(&collection)?;
            let id = parse_id(&id)?;

            let store = app.store().await?;
            if store.delete(&collection, &id).await? {
                println!("{}", format!("✓ Deleted {}/{}", collection, id).green());
            } else {
                anyhow::bail!("Document {}/{} not found", collection, id);
            }
        }
    }

    Ok(())
}

async fn run_db(app: &App, command: DbCommands) -> Result<()> {
    match command {
        DbCommands::Status => {
            let store = app.store().await?;
            println!("  {} {}", "Status:".bold(), "ONLINE".green());

            let collections = store.collections().await?;
            if collections.is_empty() {
                println!("  {} none", "Collections:".bold());
                return Ok(());
            }

            let mut rows = Vec::with_capacity(collections.len());
            for collection in collections {
                let documents = store.count(&collection).await?;
                rows.push(CollectionRow {
                    collection: collection.to_string(),
                    documents,
                });
            }
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let app = App::new(cli.db_url);

    match cli.command {
        Commands::Ago { timestamp, now } => {
            let timestamp = parse_timestamp(&timestamp)?;
            let now = match now {
                Some(now) => parse_timestamp(&now)?,
                None => app.time_provider.now(),
            };
            println!("{}", time_ago(&timestamp, &now));
        }
        Commands::Doc(command) => run_doc(&app, command).await?,
        Commands::Db(command) => run_db(&app, command).await?,
    }

    debug!(
        database_opened = app.database.is_initialized(),
        "Command finished"
    );

    Ok(())
}
