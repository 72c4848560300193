//! # Redline Checker
//!
//! Scheduling layer between the editor and the external text-analysis
//! services.
//!
//! The [`CheckScheduler`] owns the debounce timer, the single-flight
//! request slot, and the result cache; it feeds a shared
//! [`redline_suggestions::SuggestionStore`]. The services themselves are
//! reached only through the [`Checker`] and [`AiGenerator`] contracts.

mod config;
mod contract;
mod error;
mod metrics;
mod scheduler;

pub use config::CheckConfig;
pub use contract::{
    generate_ai_suggestions, AiCandidate, AiCheckOptions, AiGenerator, AiRequest, CheckPreferences,
    CheckRequest, CheckResponse, Checker,
};
pub use error::CheckError;
pub use metrics::{CheckMetrics, CheckRecord, HISTORY_LIMIT};
pub use scheduler::CheckScheduler;
