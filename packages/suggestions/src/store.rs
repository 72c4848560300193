//! # Suggestion Store
//!
//! Holds the suggestions for the current content snapshot.
//!
//! The store is replaced wholesale by every successful check and cleared the
//! instant content changes. Stats are derived and recomputed on *every*
//! mutation, including status changes, so `stats.total` can never drift
//! from `all().len()`.

use crate::model::{
    ProcessedSuggestions, Severity, Suggestion, SuggestionKind, SuggestionStats, SuggestionStatus,
};

/// Current suggestions, partitioned by kind on demand, with derived stats
#[derive(Debug, Default)]
pub struct SuggestionStore {
    suggestions: Vec<Suggestion>,
    stats: SuggestionStats,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically swap in a new suggestion set and recompute stats
    pub fn replace(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
        self.recompute();
    }

    /// Update one suggestion's status.
    ///
    /// Idempotent: setting the status a suggestion already has changes
    /// nothing, not even `updated_at`. A missing id is logged and ignored:
    /// the set may already have been invalidated by a prior edit.
    pub fn set_status(&mut self, id: &str, status: SuggestionStatus) -> bool {
        let Some(suggestion) = self.suggestions.iter_mut().find(|s| s.id == id) else {
            tracing::warn!(id, "status change for unknown suggestion, ignoring");
            return false;
        };
        if suggestion.status != status {
            suggestion.status = status;
            suggestion.updated_at = chrono::Utc::now();
        }
        self.recompute();
        true
    }

    pub fn clear(&mut self) {
        self.suggestions.clear();
        self.recompute();
    }

    pub fn get(&self, id: &str) -> Option<&Suggestion> {
        self.suggestions.iter().find(|s| s.id == id)
    }

    pub fn by_kind(&self, kind: SuggestionKind) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter().filter(move |s| s.kind == kind)
    }

    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.iter().filter(move |s| s.severity == severity)
    }

    pub fn all(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn stats(&self) -> &SuggestionStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Grouped snapshot of the current set
    pub fn snapshot(&self) -> ProcessedSuggestions {
        ProcessedSuggestions::from_list(self.suggestions.clone())
    }

    fn recompute(&mut self) {
        self.stats = SuggestionStats::from_suggestions(&self.suggestions);
    }
}
