//! Analysis history records as exchanged with the history API.

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of characters of submitted text kept in the display preview.
pub const TEXT_PREVIEW_CHARS: usize = 70;

/// Shortest text accepted for analysis.
pub const MIN_TEXT_CHARS: usize = 50;

/// Upper bound for score and confidence percentages.
pub const MAX_PERCENT: u8 = 100;

/// Server-assigned identifier of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of content that was analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Video => "video",
        }
    }

    /// Capitalized label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Text => "Text",
            ContentKind::Image => "Image",
            ContentKind::Video => "Video",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification derived from the AI-generation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    LikelyHuman,
    Moderate,
    LikelyAi,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        if score < 30 {
            Verdict::LikelyHuman
        } else if score < 70 {
            Verdict::Moderate
        } else {
            Verdict::LikelyAi
        }
    }

    /// Wording of the verdict for a kind of content.
    pub fn label(&self, kind: ContentKind) -> &'static str {
        match (self, kind) {
            (Verdict::LikelyHuman, ContentKind::Text) => "Likely human-created content",
            (Verdict::LikelyHuman, _) => "Authentic human-created content",
            (Verdict::Moderate, _) => "Moderate AI generation probability",
            (Verdict::LikelyAi, ContentKind::Video) => "Strong deepfake indicators detected",
            (Verdict::LikelyAi, _) => "High probability AI-generated content",
        }
    }
}

/// A stored analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Absent until the server has accepted the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    // The server stores rows with NULL columns; they read as empty values.
    /// Short display string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: u8,
    /// Display-formatted timestamp.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub analysis: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl HistoryEntry {
    /// Attach the server-assigned id to a submitted entry.
    pub fn from_new(entry: NewEntry, id: EntryId) -> Self {
        Self {
            id: Some(id),
            kind: entry.kind,
            content: entry.content,
            full_content: entry.full_content,
            score: entry.score,
            confidence: entry.confidence,
            date: entry.date,
            analysis: entry.analysis,
        }
    }

    /// One-line summary shown by the details action.
    pub fn details(&self) -> String {
        format!(
            "Analysis Details: {} ({}% confidence)",
            self.analysis, self.confidence
        )
    }
}

/// An entry that has not been submitted yet (the POST body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub content: String,
    pub score: u8,
    pub confidence: u8,
    pub date: String,
    pub full_content: String,
    pub analysis: String,
}

impl NewEntry {
    /// Build an entry, clamping percentages and deriving the verdict.
    pub fn new(
        kind: ContentKind,
        content: impl Into<String>,
        full_content: impl Into<String>,
        score: u8,
        confidence: u8,
    ) -> Self {
        let score = score.min(MAX_PERCENT);
        Self {
            kind,
            content: content.into(),
            score,
            confidence: confidence.min(MAX_PERCENT),
            date: display_timestamp(),
            full_content: full_content.into(),
            analysis: Verdict::from_score(score).label(kind).to_string(),
        }
    }

    /// Entry for analyzed text; the display content is a short preview.
    pub fn text(text: &str, score: u8, confidence: u8) -> Self {
        Self::new(ContentKind::Text, text_preview(text), text, score, confidence)
    }

    /// Entry for an analyzed image or video file.
    pub fn file(
        kind: ContentKind,
        file_name: &str,
        size_bytes: u64,
        score: u8,
        confidence: u8,
    ) -> Self {
        let full = format!("{} ({:.2} MB)", file_name, size_bytes as f64 / 1024.0 / 1024.0);
        Self::new(kind, file_name, full, score, confidence)
    }

    /// Override the display timestamp.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }
}

/// First [`TEXT_PREVIEW_CHARS`] characters of `text`, with an ellipsis if cut.
pub fn text_preview(text: &str) -> String {
    match text.char_indices().nth(TEXT_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Current local time in the `10/16/2026, 3:04:05 PM` display format.
pub fn display_timestamp() -> String {
    Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}
