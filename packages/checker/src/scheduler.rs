//! # Check Scheduler
//!
//! Debounces, caches, and cancels text-check requests, and fills the
//! suggestion store with the results.
//!
//! ## Single flight
//!
//! At most one check is ever in flight. Issuing a new check bumps a
//! generation counter and aborts the previous request task; a superseded
//! response is discarded before it can touch any state, and cancellation is
//! never surfaced as an error. The debounce timer collapses bursts of
//! realtime calls into one request carrying the last text seen.
//!
//! ## Cache
//!
//! Results are cached by a SHA-256 fingerprint of the full text. A hit
//! applies the cached suggestions synchronously with no network call.
//!
//! All timers, handles, and the cache live on one scheduler instance;
//! dropping the scheduler cancels everything it owns.

use redline_suggestions::{ProcessedSuggestions, SuggestionStore};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinHandle;

use crate::config::CheckConfig;
use crate::contract::{CheckPreferences, CheckRequest, CheckResponse, Checker};
use crate::metrics::CheckMetrics;

/// Schedules checks against an external [`Checker`] and populates a shared
/// [`SuggestionStore`]
pub struct CheckScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    config: CheckConfig,
    checker: Arc<dyn Checker>,
    store: Arc<Mutex<SuggestionStore>>,
    document_id: String,

    /// Monotonic id of the most recently issued check; stale responses
    /// compare against this and drop themselves
    generation: AtomicU64,

    state: Mutex<SchedulerState>,
}

struct SchedulerState {
    language: String,
    preferences: CheckPreferences,
    debounce: Option<JoinHandle<()>>,
    in_flight: Option<JoinHandle<()>>,
    cache: HashMap<String, ProcessedSuggestions>,
    loading: bool,
    error: Option<String>,
    metrics: CheckMetrics,
}

impl CheckScheduler {
    pub fn new(
        checker: Arc<dyn Checker>,
        store: Arc<Mutex<SuggestionStore>>,
        document_id: impl Into<String>,
        config: CheckConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                checker,
                store,
                document_id: document_id.into(),
                generation: AtomicU64::new(0),
                state: Mutex::new(SchedulerState {
                    language: "en".to_string(),
                    preferences: CheckPreferences::default(),
                    debounce: None,
                    in_flight: None,
                    cache: HashMap::new(),
                    loading: false,
                    error: None,
                    metrics: CheckMetrics::default(),
                }),
            }),
        }
    }

    pub fn with_language(self, language: impl Into<String>) -> Self {
        self.inner.state.lock().unwrap().language = language.into();
        self
    }

    pub fn with_preferences(self, preferences: CheckPreferences) -> Self {
        self.inner.state.lock().unwrap().preferences = preferences;
        self
    }

    /// Debounced entry point for keystroke-driven checking.
    ///
    /// Every call re-arms the single pending timer; after a quiet
    /// `debounce_delay` the check fires with the *last* text seen.
    pub fn check_text_realtime(&self, text: impl Into<String>) {
        if !self.inner.config.enabled {
            return;
        }
        let text = text.into();
        let delay = self.inner.config.debounce_delay;
        let task_inner = Arc::clone(&self.inner);

        let mut state = self.inner.state.lock().unwrap();
        if let Some(handle) = state.debounce.take() {
            handle.abort();
            tracing::debug!("debounce timer re-armed");
        }
        state.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task_inner.begin_check(text, false);
        }));
    }

    /// Check immediately, honoring both length gates
    pub fn check_text(&self, text: impl Into<String>) {
        self.inner.begin_check(text.into(), false);
    }

    /// Check immediately, skipping the maximum-length gate
    pub fn check_text_manual(&self, text: impl Into<String>) {
        self.inner.begin_check(text.into(), true);
    }

    /// Abort the pending timer and any in-flight request. Silent: no error
    /// is recorded.
    pub fn cancel(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.inner.state.lock().unwrap();
        if let Some(handle) = state.debounce.take() {
            handle.abort();
        }
        if let Some(handle) = state.in_flight.take() {
            handle.abort();
        }
        state.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.lock().unwrap().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.state.lock().unwrap().error.clone()
    }

    pub fn metrics(&self) -> CheckMetrics {
        self.inner.state.lock().unwrap().metrics.clone()
    }

    pub fn clear_cache(&self) {
        self.inner.state.lock().unwrap().cache.clear();
    }
}

impl Drop for CheckScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Inner {
    fn begin_check(self: &Arc<Self>, text: String, manual: bool) {
        // Supersede whatever was running, even if this attempt gets gated
        // below: the text has changed, so the old result is stale.
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.lock().unwrap();
        if let Some(handle) = state.in_flight.take() {
            handle.abort();
        }

        let char_len = text.chars().count();
        if char_len < self.config.min_text_length {
            state.loading = false;
            state.error = None;
            drop(state);
            self.store.lock().unwrap().clear();
            return;
        }
        if !manual && char_len > self.config.max_text_length {
            state.loading = false;
            state.error = Some(format!(
                "Text is too long to check ({} characters, limit is {})",
                char_len, self.config.max_text_length
            ));
            return;
        }

        let key = fingerprint(&text);
        if let Some(cached) = state.cache.get(&key).cloned() {
            tracing::debug!(document_id = %self.document_id, "check cache hit");
            state.loading = false;
            state.error = None;
            drop(state);
            self.store.lock().unwrap().replace(cached.all);
            return;
        }

        state.loading = true;
        state.error = None;

        let language = state.language.clone();
        let preferences = state.preferences.clone();
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let request = CheckRequest {
                text,
                language,
                document_id: inner.document_id.clone(),
                manual,
                preferences,
            };
            let response = inner.checker.check(request).await;
            inner.finish_check(generation, key, response, started.elapsed());
        });
        state.in_flight = Some(handle);
    }

    fn finish_check(
        &self,
        generation: u64,
        key: String,
        response: CheckResponse,
        elapsed: std::time::Duration,
    ) {
        let mut state = self.state.lock().unwrap();
        // Checked under the lock: a begin_check that bumped the generation
        // after this task completed must win, even when it gated out early.
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding superseded check response");
            return;
        }

        state.in_flight = None;
        state.loading = false;

        if response.success {
            let suggestions = response.suggestions;
            state.metrics.record(elapsed, suggestions.all.len());
            state.cache.insert(key, suggestions.clone());
            state.error = None;
            drop(state);
            self.store.lock().unwrap().replace(suggestions.all);
        } else {
            // Suggestions stay as last-known-good
            state.error = Some(
                response
                    .error
                    .unwrap_or_else(|| "Check failed".to_string()),
            );
        }
    }
}

/// Cache key: SHA-256 over the full text. A prefix-based key would collide
/// for texts that share an opening.
fn fingerprint(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_differs_beyond_shared_prefix() {
        let prefix = "x".repeat(200);
        let a = format!("{prefix}abc");
        let b = format!("{prefix}xyz");

        assert_ne!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a), fingerprint(&a));
    }
}
