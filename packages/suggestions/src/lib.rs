//! # Redline Suggestions
//!
//! Suggestion lifecycle core for the Redline writing editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ checker: text → ProcessedSuggestions        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ suggestions: store + apply                  │
//! │  - SuggestionStore with derived stats       │
//! │  - Overlap dedup for AI candidates          │
//! │  - Accept/ignore, single and bulk           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: new content → next check            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core principles
//!
//! 1. **Positions bind to a snapshot**: a suggestion's `[start, end)` range
//!    is valid only against the exact content it was computed from.
//! 2. **Mutation invalidates**: any text change clears the whole store;
//!    stale positions are never patched.
//! 3. **Stats are derived**: recomputed on every store mutation, never
//!    tracked independently.

mod apply;
mod dedup;
mod error;
mod model;
mod store;

pub use apply::{accept_many, accept_one, ignore_many, ignore_one, ApplyOutcome};
pub use dedup::{confidence_floor, dedup_by_confidence, MAX_OVERLAP_RATIO};
pub use error::SuggestionError;
pub use model::{
    Position, ProcessedSuggestions, Severity, Suggestion, SuggestionKind, SuggestionStats,
    SuggestionStatus,
};
pub use store::SuggestionStore;
