//! Client-side cache of the analysis history.
//!
//! The store keeps the entries newest-first and mirrors the server
//! collection. Local state only changes after the server has answered, so a
//! failed or dropped call never leaves a half-applied mutation behind. The
//! one exception is delete, which splices locally and then re-fetches.

use tracing::{debug, info, warn};

use super::client::HistoryApi;
use super::entry::{EntryId, HistoryEntry, NewEntry};
use super::error::{HistoryError, Result};
use super::notify::{NotificationLevel, Notifier, TracingNotifier};
use super::view::{HistoryView, NullView};

/// An entry picked by position, remembered by id.
///
/// Positions shift whenever the history changes, so acting on a selection
/// re-resolves the id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction {
    index: usize,
    id: EntryId,
}

impl PendingAction {
    /// Position at the time of selection.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> EntryId {
        self.id
    }
}

pub struct HistoryStore<A> {
    api: A,
    entries: Vec<HistoryEntry>,
    notifier: Box<dyn Notifier>,
    view: Box<dyn HistoryView>,
    last_failure: Option<HistoryError>,
}

impl<A: HistoryApi> HistoryStore<A> {
    /// Create an empty store that logs notifications and renders nothing.
    pub fn new(api: A) -> Self {
        Self {
            api,
            entries: Vec::new(),
            notifier: Box::new(TracingNotifier),
            view: Box::new(NullView),
            last_failure: None,
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn with_view(mut self, view: impl HistoryView + 'static) -> Self {
        self.view = Box::new(view);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Error behind the most recent failed remote operation, if it failed.
    pub fn last_failure(&self) -> Option<&HistoryError> {
        self.last_failure.as_ref()
    }

    /// Current position of the entry with `id`.
    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == Some(id))
    }

    /// Replace the local history with the server's collection.
    ///
    /// Any failure empties the history. Returns whether the fetch succeeded.
    pub async fn refresh(&mut self) -> bool {
        self.last_failure = None;
        let ok = match self.api.list().await {
            Ok(entries) => {
                debug!("Loaded {} history entries", entries.len());
                self.entries = entries;
                true
            }
            Err(e) => {
                warn!("Error fetching history: {}", e);
                self.notify(
                    NotificationLevel::Error,
                    &format!("Failed to load history: {}", e),
                );
                self.entries.clear();
                self.last_failure = Some(e);
                false
            }
        };
        self.render();
        ok
    }

    /// Submit a new analysis and put it at the front of the history.
    pub async fn create(&mut self, entry: NewEntry) -> Option<EntryId> {
        let kind = entry.kind;
        self.last_failure = None;
        match self.api.create(&entry).await {
            Ok(id) => {
                info!("Saved {} analysis as entry {}", kind, id);
                self.entries.insert(0, HistoryEntry::from_new(entry, id));
                self.render();
                self.view.show_result(&self.entries[0]);
                self.notify(
                    NotificationLevel::Success,
                    &format!("{} analysis completed and saved to history!", kind.label()),
                );
                Some(id)
            }
            Err(e) => {
                warn!("Error saving {} analysis: {}", kind, e);
                self.notify(
                    NotificationLevel::Error,
                    &format!("Error saving analysis: {}", e),
                );
                self.last_failure = Some(e);
                None
            }
        }
    }

    /// Fetch one entry from the server without touching the local history.
    pub async fn fetch(&mut self, id: EntryId) -> Option<HistoryEntry> {
        self.last_failure = None;
        match self.api.get(id).await {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Error fetching entry {}: {}", id, e);
                self.notify(
                    NotificationLevel::Error,
                    &format!("Failed to load analysis: {}", e),
                );
                self.last_failure = Some(e);
                None
            }
        }
    }

    /// Remember the entry at `index` for a later action.
    pub fn select(&self, index: usize) -> Result<PendingAction> {
        let entry = self
            .entries
            .get(index)
            .ok_or(HistoryError::InvalidIndex(index))?;
        let id = entry.id.ok_or(HistoryError::MissingId(index))?;
        Ok(PendingAction { index, id })
    }

    /// Current position of a selected entry, following it if it moved.
    fn resolve(&self, pending: &PendingAction) -> Result<usize> {
        let unmoved = self
            .entries
            .get(pending.index)
            .is_some_and(|e| e.id == Some(pending.id));
        if unmoved {
            return Ok(pending.index);
        }
        self.position_of(pending.id)
            .ok_or(HistoryError::StaleSelection(pending.id))
    }

    /// Delete the entry at `index` on the server, then locally.
    pub async fn delete(&mut self, index: usize) -> bool {
        match self.select(index) {
            Ok(pending) => self.confirm_delete(pending).await,
            Err(e) => {
                self.report_delete_error(e);
                false
            }
        }
    }

    /// Delete a previously selected entry.
    ///
    /// After the server confirms, the entry is spliced out and the history is
    /// re-fetched to reconcile with the server.
    pub async fn confirm_delete(&mut self, pending: PendingAction) -> bool {
        self.last_failure = None;
        let index = match self.resolve(&pending) {
            Ok(index) => index,
            Err(e) => {
                self.report_delete_error(e);
                return false;
            }
        };
        if index != pending.index {
            debug!(
                "Entry {} moved from index {} to {}",
                pending.id, pending.index, index
            );
        }

        if let Err(e) = self.api.delete(pending.id).await {
            self.report_delete_error(e);
            return false;
        }

        debug!("Deletion of entry {} successful, refetching history", pending.id);
        self.entries.remove(index);
        self.render();
        self.notify(
            NotificationLevel::Success,
            "Analysis result deleted successfully",
        );
        self.refresh().await;
        true
    }

    /// Delete the whole history on the server, then locally.
    pub async fn clear(&mut self) -> bool {
        self.last_failure = None;
        if let Err(e) = self.api.clear().await {
            warn!("Error clearing history: {}", e);
            self.notify(
                NotificationLevel::Error,
                &format!("Error clearing history: {}", e),
            );
            self.last_failure = Some(e);
            return false;
        }

        debug!("Clear all successful, refetching history");
        self.entries.clear();
        self.render();
        self.notify(NotificationLevel::Success, "All history cleared successfully");
        self.refresh().await;
        true
    }

    /// Show the verdict summary for the entry at `index`.
    pub fn view_details(&self, index: usize) -> bool {
        match self.entries.get(index) {
            Some(entry) => {
                self.notify(NotificationLevel::Info, &entry.details());
                true
            }
            None => {
                self.notify(
                    NotificationLevel::Error,
                    &HistoryError::InvalidIndex(index).to_string(),
                );
                false
            }
        }
    }

    fn report_delete_error(&mut self, err: HistoryError) {
        warn!("Error deleting entry: {}", err);
        self.notify(
            NotificationLevel::Error,
            &format!("Error deleting entry: {}", err),
        );
        self.last_failure = Some(err);
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        self.notifier.notify(level, message);
    }

    fn render(&self) {
        self.view.render(&self.entries);
    }
}
