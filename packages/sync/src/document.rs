//! # Document Model
//!
//! A document is mutated only through sync operations; its version counter
//! is monotonic and never rewinds. Versions are immutable snapshots;
//! restoring an old one appends a new version rather than rewriting
//! history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Auto-save intervals below this are clamped up
pub const MIN_AUTO_SAVE_INTERVAL_SECS: u64 = 30;

/// Derived text statistics plus suggestion bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub word_count: usize,
    pub char_count: usize,
    pub paragraph_count: usize,
    pub sentence_count: usize,
    pub suggestions_applied: u64,
    pub suggestions_ignored: u64,
    pub last_saved_at: Option<DateTime<Utc>>,
}

impl DocumentStats {
    /// Recompute the text-derived counts, leaving bookkeeping untouched
    pub fn from_content(content: &str) -> Self {
        Self {
            word_count: content.split_whitespace().count(),
            char_count: content.chars().count(),
            paragraph_count: content
                .split("\n\n")
                .filter(|p| !p.trim().is_empty())
                .count(),
            sentence_count: content
                .split(['.', '!', '?'])
                .filter(|s| !s.trim().is_empty())
                .count(),
            ..Self::default()
        }
    }
}

/// Per-document sync settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub enable_auto_save: bool,

    /// Seconds between auto-save attempts; floor-clamped to
    /// [`MIN_AUTO_SAVE_INTERVAL_SECS`]
    pub auto_save_interval_secs: u64,

    pub enable_version_history: bool,

    pub max_versions: usize,
}

impl DocumentMetadata {
    /// Effective auto-save period after clamping
    pub fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(self.auto_save_interval_secs.max(MIN_AUTO_SAVE_INTERVAL_SECS))
    }
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            enable_auto_save: true,
            auto_save_interval_secs: 60,
            enable_version_history: true,
            max_versions: 50,
        }
    }
}

/// A synchronized document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,

    /// Monotonic; incremented by every successful save
    pub version: u64,

    pub stats: DocumentStats,
    pub metadata: DocumentMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>, metadata: DocumentMetadata) -> Self {
        let content = content.into();
        let now = Utc::now();
        Self {
            id: id.into(),
            stats: DocumentStats::from_content(&content),
            content,
            version: 1,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace content, recomputing text stats but keeping the suggestion
    /// counters and save timestamps
    pub fn update_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        let text_stats = DocumentStats::from_content(&self.content);
        self.stats.word_count = text_stats.word_count;
        self.stats.char_count = text_stats.char_count;
        self.stats.paragraph_count = text_stats.paragraph_count;
        self.stats.sentence_count = text_stats.sentence_count;
        self.updated_at = Utc::now();
    }
}

/// Immutable snapshot of a document at one version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub id: String,
    pub document_id: String,

    /// Document version produced by the save this snapshot records
    pub version: u64,

    pub content: String,
    pub description: String,
    pub is_auto_save: bool,
    pub created_at: DateTime<Utc>,
}

/// Options accompanying a persistence update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveOptions {
    pub is_auto_save: bool,
    pub description: Option<String>,
}
