//! # Overlap Deduplication
//!
//! AI checks run once per suggestion kind, so several candidates frequently
//! target the same span. Candidates are ranked by confidence and accepted
//! greedily; a candidate overlapping an already-accepted one by more than
//! half of the shorter span is dropped.
//!
//! Quadratic against the accepted set, which stays small (bounded by
//! max-suggestions-per-kind times the number of kinds).

use crate::model::Suggestion;
use std::cmp::Ordering;

/// A candidate overlapping an accepted one by more than this ratio is dropped
pub const MAX_OVERLAP_RATIO: f32 = 0.5;

/// Collapse overlapping candidates, keeping the higher-confidence ones
pub fn dedup_by_confidence(mut candidates: Vec<Suggestion>) -> Vec<Suggestion> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut accepted: Vec<Suggestion> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let conflicts = accepted
            .iter()
            .any(|kept| candidate.position.overlap_ratio(&kept.position) > MAX_OVERLAP_RATIO);
        if conflicts {
            tracing::debug!(
                id = %candidate.id,
                confidence = candidate.confidence,
                "dropping overlapping candidate"
            );
        } else {
            accepted.push(candidate);
        }
    }
    accepted
}

/// Drop candidates below a minimum confidence
pub fn confidence_floor(candidates: Vec<Suggestion>, min_confidence: f32) -> Vec<Suggestion> {
    candidates
        .into_iter()
        .filter(|c| c.confidence >= min_confidence)
        .collect()
}
