//! # Suggestion Data Model
//!
//! Suggestions are position-indexed annotations over a specific content
//! snapshot. A position is only meaningful against the exact string it was
//! computed from; any text mutation invalidates every held suggestion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a writing suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Spelling,
    Grammar,
    Style,
    Punctuation,
    Ai,
}

impl SuggestionKind {
    /// All kinds, in display order
    pub const ALL: [SuggestionKind; 5] = [
        SuggestionKind::Spelling,
        SuggestionKind::Grammar,
        SuggestionKind::Style,
        SuggestionKind::Punctuation,
        SuggestionKind::Ai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Spelling => "spelling",
            SuggestionKind::Grammar => "grammar",
            SuggestionKind::Style => "style",
            SuggestionKind::Punctuation => "punctuation",
            SuggestionKind::Ai => "ai",
        }
    }
}

/// Lifecycle status of a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Active,
    Accepted,
    Ignored,
    Dismissed,
}

/// How strongly the suggestion should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Half-open character offset range `[start, end)` into a content snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

impl Position {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in characters
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `start <= end <= len(content)` holds for this snapshot
    pub fn is_valid_for(&self, content: &str) -> bool {
        self.start <= self.end && self.end <= content.chars().count()
    }

    pub fn overlaps(&self, other: &Position) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Overlap length divided by the length of the shorter span.
    ///
    /// Returns 0.0 when the spans are disjoint; a zero-length span never
    /// overlaps anything.
    pub fn overlap_ratio(&self, other: &Position) -> f32 {
        let overlap = self
            .end
            .min(other.end)
            .saturating_sub(self.start.max(other.start));
        if overlap == 0 {
            return 0.0;
        }
        let shorter = self.len().min(other.len());
        overlap as f32 / shorter as f32
    }
}

/// A single writing suggestion over a content snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,

    pub document_id: String,

    #[serde(rename = "type")]
    pub kind: SuggestionKind,

    /// Text currently occupying `position`
    pub original: String,

    /// Proposed replacement text
    pub suggestion: String,

    pub explanation: String,

    /// Confidence in `[0, 1]`
    pub confidence: f32,

    pub position: Position,

    pub status: SuggestionStatus,

    pub severity: Severity,

    pub rule_id: Option<String>,

    pub category: Option<String>,

    pub is_processed: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Suggestion {
    /// Create an active suggestion with timestamps set to now
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        document_id: impl Into<String>,
        kind: SuggestionKind,
        original: impl Into<String>,
        suggestion: impl Into<String>,
        position: Position,
        confidence: f32,
        severity: Severity,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            document_id: document_id.into(),
            kind,
            original: original.into(),
            suggestion: suggestion.into(),
            explanation: String::new(),
            confidence: confidence.clamp(0.0, 1.0),
            position,
            status: SuggestionStatus::Active,
            severity,
            rule_id: None,
            category: None,
            is_processed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Derived counts over a suggestion list.
///
/// Never authoritative on its own: recomputed from the underlying list on
/// every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionStats {
    pub total: usize,
    pub spelling: usize,
    pub grammar: usize,
    pub style: usize,
    pub punctuation: usize,
    pub ai: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl SuggestionStats {
    pub fn from_suggestions(suggestions: &[Suggestion]) -> Self {
        let mut stats = Self {
            total: suggestions.len(),
            ..Self::default()
        };
        for s in suggestions {
            match s.kind {
                SuggestionKind::Spelling => stats.spelling += 1,
                SuggestionKind::Grammar => stats.grammar += 1,
                SuggestionKind::Style => stats.style += 1,
                SuggestionKind::Punctuation => stats.punctuation += 1,
                SuggestionKind::Ai => stats.ai += 1,
            }
            match s.severity {
                Severity::Low => stats.low += 1,
                Severity::Medium => stats.medium += 1,
                Severity::High => stats.high += 1,
                Severity::Critical => stats.critical += 1,
            }
        }
        stats
    }

    pub fn count_for_kind(&self, kind: SuggestionKind) -> usize {
        match kind {
            SuggestionKind::Spelling => self.spelling,
            SuggestionKind::Grammar => self.grammar,
            SuggestionKind::Style => self.style,
            SuggestionKind::Punctuation => self.punctuation,
            SuggestionKind::Ai => self.ai,
        }
    }
}

/// Snapshot of suggestions grouped by kind, plus the flat list and stats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedSuggestions {
    pub spelling: Vec<Suggestion>,
    pub grammar: Vec<Suggestion>,
    pub style: Vec<Suggestion>,
    pub punctuation: Vec<Suggestion>,
    pub ai: Vec<Suggestion>,
    pub all: Vec<Suggestion>,
    pub stats: SuggestionStats,
}

impl ProcessedSuggestions {
    /// Group a flat list by kind and compute stats
    pub fn from_list(all: Vec<Suggestion>) -> Self {
        let mut grouped = Self {
            stats: SuggestionStats::from_suggestions(&all),
            ..Self::default()
        };
        for s in &all {
            let bucket = match s.kind {
                SuggestionKind::Spelling => &mut grouped.spelling,
                SuggestionKind::Grammar => &mut grouped.grammar,
                SuggestionKind::Style => &mut grouped.style,
                SuggestionKind::Punctuation => &mut grouped.punctuation,
                SuggestionKind::Ai => &mut grouped.ai,
            };
            bucket.push(s.clone());
        }
        grouped.all = all;
        grouped
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}
