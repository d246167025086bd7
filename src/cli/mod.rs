//! Command-line interface.

pub mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::{load_settings, Settings};
use crate::history::entry::MIN_TEXT_CHARS;
use crate::history::{
    ContentKind, EntryId, HistoryError, HistoryStore, HttpHistoryClient, NewEntry,
};
use output::{format_entry, ConsoleNotifier, ConsoleView};

#[derive(Parser)]
#[command(name = "verity")]
#[command(version)]
#[command(about = "Browse and manage content-analysis history", long_about = None)]
pub struct Cli {
    /// Base URL of the analysis service
    #[arg(long, env = "VERITY_URL", global = true)]
    pub url: Option<String>,

    /// Session cookie (`name=value`) of a logged-in user
    #[arg(long, env = "VERITY_SESSION", global = true, hide_env_values = true)]
    pub session: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the analysis history, newest first
    List,
    /// Show a single analysis by server id
    Show { id: i64 },
    /// Save an analysis result to the history
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },
    /// Show the verdict summary for the entry at a list position
    Details { index: usize },
    /// Delete the entry at a list position
    Delete { index: usize },
    /// Delete the whole history
    Clear {
        /// Confirm deletion of every entry
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AddTarget {
    /// Analyzed text
    Text {
        text: String,
        #[command(flatten)]
        result: ScoreArgs,
    },
    /// Analyzed image file
    Image {
        path: PathBuf,
        #[command(flatten)]
        result: ScoreArgs,
    },
    /// Analyzed video file
    Video {
        path: PathBuf,
        #[command(flatten)]
        result: ScoreArgs,
    },
}

#[derive(clap::Args)]
pub struct ScoreArgs {
    /// AI-generation score (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub score: u8,
    /// Detector confidence (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub confidence: u8,
}

impl Cli {
    /// Apply command-line overrides on top of configured settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.url {
            settings.base_url = url.clone();
        }
        if let Some(ref session) = self.session {
            settings.session_cookie = Some(session.clone());
        }
    }
}

/// Run a parsed command. Returns whether the action succeeded.
pub async fn run(cli: Cli) -> Result<bool> {
    let mut settings = load_settings().await;
    cli.apply_to_settings(&mut settings);
    debug!("Using history service at {}", settings.base_url);

    let client = HttpHistoryClient::new(&settings).context("failed to create HTTP client")?;
    let view = match cli.command {
        Commands::List => ConsoleView::table(),
        _ => ConsoleView::results_only(),
    };
    let mut store = HistoryStore::new(client)
        .with_notifier(ConsoleNotifier)
        .with_view(view);

    let ok = match cli.command {
        Commands::List => store.refresh().await,
        Commands::Show { id } => match store.fetch(EntryId(id)).await {
            Some(entry) => {
                print!("{}", format_entry(&entry));
                true
            }
            None => false,
        },
        Commands::Add { target } => {
            let entry = new_entry(target).await?;
            store.create(entry).await.is_some()
        }
        Commands::Details { index } => store.refresh().await && store.view_details(index),
        Commands::Delete { index } => store.refresh().await && store.delete(index).await,
        Commands::Clear { yes } => {
            if !store.refresh().await {
                false
            } else if store.is_empty() {
                println!("History is already empty.");
                true
            } else if !yes {
                bail!(
                    "refusing to clear {} entries without --yes (this cannot be undone)",
                    store.len()
                );
            } else {
                store.clear().await
            }
        }
    };

    if let Some(hint) = store.last_failure().and_then(session_hint) {
        eprintln!("{}", hint);
    }
    Ok(ok)
}

/// Advice for failures caused by a missing or expired login.
fn session_hint(err: &HistoryError) -> Option<&'static str> {
    err.is_session_problem().then_some(
        "hint: the service asked for a login; pass --session <name=value> or set VERITY_SESSION",
    )
}

async fn new_entry(target: AddTarget) -> Result<NewEntry> {
    match target {
        AddTarget::Text { text, result } => {
            if text.chars().count() < MIN_TEXT_CHARS {
                bail!(
                    "Please enter at least {} characters for analysis",
                    MIN_TEXT_CHARS
                );
            }
            Ok(NewEntry::text(&text, result.score, result.confidence))
        }
        AddTarget::Image { path, result } => {
            file_entry(ContentKind::Image, &path, result).await
        }
        AddTarget::Video { path, result } => {
            file_entry(ContentKind::Video, &path, result).await
        }
    }
}

async fn file_entry(kind: ContentKind, path: &Path, result: ScoreArgs) -> Result<NewEntry> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a file", path.display());
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(NewEntry::file(
        kind,
        &name,
        metadata.len(),
        result.score,
        result.confidence,
    ))
}
