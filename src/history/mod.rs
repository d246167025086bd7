//! Analysis history: records, the remote API and the synchronized store.

pub mod client;
pub mod entry;
pub mod error;
pub mod notify;
pub mod store;
pub mod view;

pub use client::{HistoryApi, HttpHistoryClient};
pub use entry::{ContentKind, EntryId, HistoryEntry, NewEntry, Verdict};
pub use error::{HistoryError, Result};
pub use notify::{NotificationLevel, Notifier, TracingNotifier};
pub use store::{HistoryStore, PendingAction};
pub use view::{HistoryView, NullView};
