//! verity - client for the analysis history of a content-analysis service.
//!
//! The [`history::HistoryStore`] keeps a newest-first local copy of the
//! server's history collection and reconciles it after every mutating call.

pub mod cli;
pub mod config;
pub mod history;

pub use config::Settings;
pub use history::{HistoryEntry, HistoryError, HistoryStore, HttpHistoryClient, NewEntry};
