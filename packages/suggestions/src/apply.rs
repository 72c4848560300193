//! # Suggestion Application
//!
//! Applies accept/ignore decisions to the content string and the store.
//!
//! ## Ordering
//!
//! Positions are recorded against the content snapshot the check ran on.
//! Bulk accepts are applied **right-to-left** by `start` descending: a
//! splice at a later position never moves text before it, so every recorded
//! offset stays valid without delta tracking. The result is identical no
//! matter what order the user selected the suggestions in.
//!
//! Accepting always clears the store before the text changes: once the
//! content mutates, every held position is meaningless.

use crate::error::SuggestionError;
use crate::model::{Position, SuggestionStatus};
use crate::store::SuggestionStore;

/// Result of a bulk accept
#[derive(Debug)]
pub struct ApplyOutcome {
    /// Content with every selected suggestion spliced in
    pub content: String,

    /// Ids that were actually applied, in position order
    pub applied: Vec<String>,
}

/// Accept a single suggestion, returning the new content.
///
/// Returns `None` (after a warning) when the id is unknown or its position
/// no longer fits the content, meaning the suggestion set was already
/// invalidated by a prior edit. The store is cleared before the splice either way; the
/// caller must feed the returned content back through the normal edit path
/// so a fresh check runs.
pub fn accept_one(store: &mut SuggestionStore, content: &str, id: &str) -> Option<String> {
    let Some(suggestion) = store.get(id) else {
        tracing::warn!(id, "accept for unknown suggestion, ignoring");
        return None;
    };
    if !suggestion.position.is_valid_for(content) {
        tracing::warn!(
            id,
            start = suggestion.position.start,
            end = suggestion.position.end,
            "suggestion position is stale for current content, clearing set"
        );
        store.clear();
        return None;
    }

    let position = suggestion.position;
    let replacement = suggestion.suggestion.clone();

    store.set_status(id, SuggestionStatus::Accepted);
    store.clear();

    Some(splice(content, &position, &replacement))
}

/// Ignore a single suggestion. Status-only: never touches the text and
/// never clears the store.
///
/// Idempotent: returns true only when the suggestion actually transitioned
/// to ignored, so callers counting ignores see no duplicate side effects.
pub fn ignore_one(store: &mut SuggestionStore, id: &str) -> bool {
    let already_ignored = matches!(
        store.get(id).map(|s| s.status),
        Some(SuggestionStatus::Ignored)
    );
    let found = store.set_status(id, SuggestionStatus::Ignored);
    found && !already_ignored
}

/// Ignore several suggestions, returning how many actually transitioned
pub fn ignore_many<I, S>(store: &mut SuggestionStore, ids: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .filter(|id| ignore_one(store, id.as_ref()))
        .count()
}

/// Accept several suggestions in one batch.
///
/// Every selected, non-overlapping suggestion lands on its originally
/// recorded span regardless of selection order. Unknown or stale ids are
/// skipped with a warning; overlapping selections are rejected up front.
/// The store is cleared after the batch; the caller re-triggers exactly one
/// check against the new content.
pub fn accept_many<S: AsRef<str>>(
    store: &mut SuggestionStore,
    content: &str,
    ids: &[S],
) -> Result<ApplyOutcome, SuggestionError> {
    let mut selected: Vec<(String, Position, String)> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.as_ref();
        match store.get(id) {
            Some(s) if s.position.is_valid_for(content) => {
                selected.push((s.id.clone(), s.position, s.suggestion.clone()));
            }
            Some(s) => {
                tracing::warn!(
                    id,
                    start = s.position.start,
                    end = s.position.end,
                    "skipping suggestion with stale position"
                );
            }
            None => {
                tracing::warn!(id, "bulk accept for unknown suggestion, skipping");
            }
        }
    }

    // Later splices must not overlap earlier spans, or both edits would
    // fight over the same text.
    for (i, (first_id, first_pos, _)) in selected.iter().enumerate() {
        for (second_id, second_pos, _) in &selected[i + 1..] {
            if first_pos.overlaps(second_pos) {
                return Err(SuggestionError::OverlappingSelection {
                    first: first_id.clone(),
                    second: second_id.clone(),
                });
            }
        }
    }

    selected.sort_by(|a, b| b.1.start.cmp(&a.1.start));

    let mut buffer = content.to_string();
    for (_, position, replacement) in &selected {
        buffer = splice(&buffer, position, replacement);
    }

    let mut applied: Vec<String> = selected.into_iter().map(|(id, _, _)| id).collect();
    applied.reverse();
    for id in &applied {
        store.set_status(id, SuggestionStatus::Accepted);
    }
    store.clear();

    Ok(ApplyOutcome {
        content: buffer,
        applied,
    })
}

/// Replace the characters in `[position.start, position.end)` with
/// `replacement`. Offsets are character counts, not bytes.
fn splice(content: &str, position: &Position, replacement: &str) -> String {
    let mut out = String::with_capacity(content.len() + replacement.len());
    out.extend(content.chars().take(position.start));
    out.push_str(replacement);
    out.extend(content.chars().skip(position.end));
    out
}
