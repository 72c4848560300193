//! # Collaborator Contracts
//!
//! Wire-level request/response types for the external text checker and the
//! AI suggestion generator, plus the fan-out helper that issues one AI call
//! per suggestion kind and collapses the results.

use async_trait::async_trait;
use futures::future::join_all;
use redline_suggestions::{
    confidence_floor, dedup_by_confidence, Position, ProcessedSuggestions, Severity, Suggestion,
    SuggestionKind,
};
use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// User preferences forwarded with every check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPreferences {
    /// Suggestion kinds the user wants surfaced
    pub enabled_kinds: Vec<SuggestionKind>,

    pub max_suggestions_per_kind: usize,

    /// Candidates below this confidence are discarded
    pub min_confidence: f32,
}

impl Default for CheckPreferences {
    fn default() -> Self {
        Self {
            enabled_kinds: SuggestionKind::ALL.to_vec(),
            max_suggestions_per_kind: 10,
            min_confidence: 0.3,
        }
    }
}

/// Request sent to the checker service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub text: String,
    pub language: String,
    pub document_id: String,
    #[serde(default)]
    pub manual: bool,
    pub preferences: CheckPreferences,
}

/// Checker service response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub success: bool,
    pub suggestions: ProcessedSuggestions,
    pub error: Option<String>,
}

impl CheckResponse {
    pub fn ok(suggestions: ProcessedSuggestions) -> Self {
        Self {
            success: true,
            suggestions,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            suggestions: ProcessedSuggestions::default(),
            error: Some(error.into()),
        }
    }
}

/// External text-analysis service
#[async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, request: CheckRequest) -> CheckResponse;
}

/// One AI generation request, scoped to a single suggestion kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    pub text: String,
    pub context: String,
    pub user_goals: Vec<String>,
    pub suggestion_type: SuggestionKind,
    pub max_suggestions: usize,
}

/// Raw candidate from the AI generator, before floor and dedup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiCandidate {
    pub original: String,
    pub suggestion: String,
    pub explanation: String,
    pub confidence: f32,
    pub position: Position,
    pub category: Option<String>,
    pub reasoning: Option<String>,
}

/// External AI suggestion generator
#[async_trait]
pub trait AiGenerator: Send + Sync {
    async fn generate(&self, request: AiRequest) -> Result<Vec<AiCandidate>, CheckError>;
}

/// Options for an AI fan-out pass
#[derive(Debug, Clone)]
pub struct AiCheckOptions {
    pub context: String,
    pub user_goals: Vec<String>,
    pub kinds: Vec<SuggestionKind>,
    pub max_suggestions_per_kind: usize,
    pub min_confidence: f32,
}

impl Default for AiCheckOptions {
    fn default() -> Self {
        Self {
            context: String::new(),
            user_goals: Vec::new(),
            kinds: SuggestionKind::ALL.to_vec(),
            max_suggestions_per_kind: 5,
            min_confidence: 0.5,
        }
    }
}

/// Issue one generation request per kind, then apply the confidence floor
/// and overlap dedup.
///
/// A failed call for one kind is logged and skipped; the other kinds still
/// contribute candidates.
pub async fn generate_ai_suggestions(
    generator: &dyn AiGenerator,
    document_id: &str,
    text: &str,
    options: &AiCheckOptions,
) -> Vec<Suggestion> {
    let requests = options.kinds.iter().map(|kind| {
        let request = AiRequest {
            text: text.to_string(),
            context: options.context.clone(),
            user_goals: options.user_goals.clone(),
            suggestion_type: *kind,
            max_suggestions: options.max_suggestions_per_kind,
        };
        async move { (*kind, generator.generate(request).await) }
    });

    let mut candidates: Vec<Suggestion> = Vec::new();
    for (kind, result) in join_all(requests).await {
        match result {
            Ok(batch) => {
                for (i, candidate) in batch.into_iter().enumerate() {
                    candidates.push(candidate_to_suggestion(candidate, kind, document_id, i));
                }
            }
            Err(e) => {
                tracing::warn!(kind = kind.as_str(), error = %e, "ai generation failed for kind");
            }
        }
    }

    dedup_by_confidence(confidence_floor(candidates, options.min_confidence))
}

fn candidate_to_suggestion(
    candidate: AiCandidate,
    kind: SuggestionKind,
    document_id: &str,
    index: usize,
) -> Suggestion {
    let mut suggestion = Suggestion::new(
        format!("ai-{}-{}", kind.as_str(), index),
        document_id,
        kind,
        candidate.original,
        candidate.suggestion,
        candidate.position,
        candidate.confidence,
        Severity::Medium,
    )
    .with_explanation(candidate.explanation);
    if let Some(category) = candidate.category {
        suggestion = suggestion.with_category(category);
    }
    suggestion
}
