//! # Editor Session
//!
//! One client's editing loop: content edits invalidate the suggestion set
//! and schedule a debounced check; accepting suggestions splices the text
//! and feeds the result back through the same edit path, so every accept,
//! single or bulk, re-triggers exactly one check against the new content.

use redline_checker::{CheckConfig, CheckScheduler, Checker};
use redline_suggestions::{
    accept_many, accept_one, ignore_many, ignore_one, SuggestionError, SuggestionStore,
};
use std::sync::{Arc, Mutex};

/// Editing state for a single document
pub struct EditorSession {
    document_id: String,
    content: String,
    store: Arc<Mutex<SuggestionStore>>,
    scheduler: CheckScheduler,
    applied_total: u64,
    ignored_total: u64,
}

impl EditorSession {
    pub fn new(
        checker: Arc<dyn Checker>,
        document_id: impl Into<String>,
        initial_content: impl Into<String>,
        config: CheckConfig,
    ) -> Self {
        let document_id = document_id.into();
        let store = Arc::new(Mutex::new(SuggestionStore::new()));
        let scheduler =
            CheckScheduler::new(checker, Arc::clone(&store), document_id.clone(), config);
        Self {
            document_id,
            content: initial_content.into(),
            store,
            scheduler,
            applied_total: 0,
            ignored_total: 0,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Shared store handle, for UI reads
    pub fn store(&self) -> Arc<Mutex<SuggestionStore>> {
        Arc::clone(&self.store)
    }

    pub fn scheduler(&self) -> &CheckScheduler {
        &self.scheduler
    }

    pub fn suggestions_applied(&self) -> u64 {
        self.applied_total
    }

    pub fn suggestions_ignored(&self) -> u64 {
        self.ignored_total
    }

    /// Normal edit path. Every content change, typed or spliced,
    /// invalidates the whole suggestion set and schedules one debounced
    /// check.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.store.lock().unwrap().clear();
        self.scheduler.check_text_realtime(self.content.clone());
    }

    /// Run a full check immediately, skipping the debounce and the
    /// maximum-length gate
    pub fn check_now(&self) {
        self.scheduler.check_text_manual(self.content.clone());
    }

    /// Accept one suggestion. Returns false when the id is unknown or
    /// stale.
    pub fn accept(&mut self, id: &str) -> bool {
        let new_content = {
            let mut store = self.store.lock().unwrap();
            accept_one(&mut store, &self.content, id)
        };
        match new_content {
            Some(content) => {
                self.applied_total += 1;
                self.set_content(content);
                true
            }
            None => false,
        }
    }

    /// Accept several suggestions as one batch, re-checking once
    pub fn accept_batch<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<usize, SuggestionError> {
        let outcome = {
            let mut store = self.store.lock().unwrap();
            accept_many(&mut store, &self.content, ids)?
        };
        let applied = outcome.applied.len();
        self.applied_total += applied as u64;
        self.set_content(outcome.content);
        Ok(applied)
    }

    /// Ignore one suggestion: status-only, no text change, no re-check
    pub fn ignore(&mut self, id: &str) -> bool {
        let found = ignore_one(&mut self.store.lock().unwrap(), id);
        if found {
            self.ignored_total += 1;
        }
        found
    }

    pub fn ignore_batch<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        let ignored = ignore_many(&mut self.store.lock().unwrap(), ids.iter().map(|s| s.as_ref()));
        self.ignored_total += ignored as u64;
        ignored
    }
}
