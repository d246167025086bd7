//! Terminal rendering of history entries and notifications.

use console::{style, truncate_str};

use crate::history::{HistoryEntry, HistoryView, NotificationLevel, Notifier};

const CONTENT_WIDTH: usize = 40;

/// Prints notifications to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Success => eprintln!("{} {}", style("✓").green().bold(), message),
            NotificationLevel::Error => eprintln!("{} {}", style("✗").red().bold(), message),
            NotificationLevel::Info => eprintln!("{} {}", style("i").cyan().bold(), message),
        }
    }
}

/// Prints the history table and new results to stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleView {
    tables: bool,
}

impl ConsoleView {
    /// Print the table on every render.
    pub fn table() -> Self {
        Self { tables: true }
    }

    /// Only print freshly created results.
    pub fn results_only() -> Self {
        Self { tables: false }
    }
}

impl HistoryView for ConsoleView {
    fn render(&self, entries: &[HistoryEntry]) {
        if self.tables {
            print!("{}", format_table(entries));
        }
    }

    fn show_result(&self, entry: &HistoryEntry) {
        print!("{}", format_entry(entry));
    }
}

/// Table of entries with their current positions.
pub fn format_table(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No analysis history yet.\n".to_string();
    }

    let mut out = format!(
        "{}\n",
        style(format!(
            "{:>3}  {:>5}  {:<5}  {:<width$}  {:>5}  {:>4}  {:<22}  {}",
            "#",
            "ID",
            "TYPE",
            "CONTENT",
            "SCORE",
            "CONF",
            "DATE",
            "ANALYSIS",
            width = CONTENT_WIDTH
        ))
        .bold()
    );
    for (index, entry) in entries.iter().enumerate() {
        let id = entry
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        // Newlines would break the row layout
        let content = entry.content.replace(['\n', '\r'], " ");
        out.push_str(&format!(
            "{:>3}  {:>5}  {:<5}  {:<width$}  {:>4}%  {:>3}%  {:<22}  {}\n",
            index,
            id,
            entry.kind.as_str(),
            truncate_str(&content, CONTENT_WIDTH, "..."),
            entry.score,
            entry.confidence,
            entry.date,
            entry.analysis,
            width = CONTENT_WIDTH
        ));
    }
    out
}

/// Multi-line description of one entry.
pub fn format_entry(entry: &HistoryEntry) -> String {
    let id = entry
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "(unsaved)".to_string());
    format!(
        "{} {}\n  Type:       {}\n  Date:       {}\n  AI score:   {}%\n  Confidence: {}%\n  Analysis:   {}\n  Content:    {}\n",
        style("Analysis").bold(),
        id,
        entry.kind,
        entry.date,
        entry.score,
        entry.confidence,
        entry.analysis,
        entry.full_content
    )
}
