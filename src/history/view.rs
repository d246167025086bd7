//! Rendering hooks invoked by the store.

use super::entry::HistoryEntry;

pub trait HistoryView: Send + Sync {
    /// Redraw the full history, newest first.
    fn render(&self, entries: &[HistoryEntry]);

    /// Present a freshly created analysis result.
    fn show_result(&self, _entry: &HistoryEntry) {}
}

/// View that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl HistoryView for NullView {
    fn render(&self, _entries: &[HistoryEntry]) {}
}
