//! # Document Sync Controller
//!
//! Drives the load/save/auto-save state machine for one document.
//!
//! ```text
//! Loading ──load ok──▶ Loaded ◀──save ok── Syncing
//!    │                   │  ▲                 │
//!    └──load err──▶      │  └──save begins────┘
//!                 Error ◀┴────────────save err
//! ```
//!
//! Auto-save and manual save share one mutual-exclusion guard: the
//! `Syncing` state skips re-entrant saves, and auto-save additionally
//! requires two seconds since the previous save of any kind so a manual
//! save immediately before a timer tick cannot double-fire.
//!
//! Realtime pushes from other sessions replace content wholesale
//! (last-writer-wins, no merge), clearing the unsaved-changes flag only
//! when the incoming content matches what this session last persisted.

use futures::StreamExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::document::{Document, DocumentVersion, SaveOptions};
use crate::error::SyncError;
use crate::persistence::Persistence;

/// Minimum gap between consecutive saves of any kind
pub const MIN_SAVE_GAP: Duration = Duration::from_secs(2);

/// Where the controller is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Loading,
    Loaded,
    Syncing,
    Error,
}

/// Sync state machine for a single document
pub struct DocumentSyncController {
    inner: Arc<Inner>,
}

struct Inner {
    persistence: Arc<dyn Persistence>,
    document_id: String,
    state: Mutex<ControllerState>,
}

struct ControllerState {
    sync_state: SyncState,
    document: Option<Document>,
    content: String,
    /// Content as of the last successful save or load; the dirty flag is
    /// always `content != last_persisted`
    last_persisted: String,
    dirty: bool,
    last_save_at: Option<Instant>,
    last_error: Option<String>,
    auto_save: Option<JoinHandle<()>>,
    subscription: Option<JoinHandle<()>>,
}

impl DocumentSyncController {
    pub fn new(persistence: Arc<dyn Persistence>, document_id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                persistence,
                document_id: document_id.into(),
                state: Mutex::new(ControllerState {
                    sync_state: SyncState::Loading,
                    document: None,
                    content: String::new(),
                    last_persisted: String::new(),
                    dirty: false,
                    last_save_at: None,
                    last_error: None,
                    auto_save: None,
                    subscription: None,
                }),
            }),
        }
    }

    /// Fetch the document and start the realtime subscription and (if
    /// enabled) the auto-save timer
    pub async fn load(&self) -> Result<(), SyncError> {
        {
            let mut state = self.inner.state.lock().unwrap();
            state.sync_state = SyncState::Loading;
            state.last_error = None;
        }

        let document = match self.inner.persistence.get(&self.inner.document_id).await {
            Ok(doc) => doc,
            Err(e) => return Err(self.inner.fail(e)),
        };
        let stream = match self.inner.persistence.subscribe(&self.inner.document_id).await {
            Ok(stream) => stream,
            Err(e) => return Err(self.inner.fail(e)),
        };

        let metadata = document.metadata.clone();
        let mut state = self.inner.state.lock().unwrap();
        state.content = document.content.clone();
        state.last_persisted = document.content.clone();
        state.dirty = false;
        state.document = Some(document);
        state.sync_state = SyncState::Loaded;

        let subscriber = Arc::clone(&self.inner);
        if let Some(old) = state.subscription.replace(tokio::spawn(async move {
            let mut stream = stream;
            while let Some(remote) = stream.next().await {
                subscriber.apply_remote(remote);
            }
        })) {
            old.abort();
        }

        if metadata.enable_auto_save {
            let saver = Arc::clone(&self.inner);
            let period = metadata.auto_save_interval();
            if let Some(old) = state.auto_save.replace(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // The first tick completes immediately
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    Inner::auto_save_tick(&saver).await;
                }
            })) {
                old.abort();
            }
        }

        Ok(())
    }

    /// Record a local edit. Runs on every keystroke path, whether or not
    /// auto-save is enabled, so the unsaved-changes flag stays accurate.
    pub fn update_content(&self, content: impl Into<String>) {
        let mut state = self.inner.state.lock().unwrap();
        state.content = content.into();
        state.dirty = state.content != state.last_persisted;
    }

    /// Manual save
    pub async fn save(&self, description: Option<String>) -> Result<(), SyncError> {
        Inner::persist(&self.inner, false, description).await
    }

    /// Save an old version's content as a *new* head version. History is
    /// append-only: the restored version and everything after it stay
    /// untouched.
    pub async fn restore_version(&self, version: &DocumentVersion) -> Result<(), SyncError> {
        self.update_content(version.content.clone());
        self.save(Some(format!("Restored to version {}", version.version)))
            .await
    }

    pub fn state(&self) -> SyncState {
        self.inner.state.lock().unwrap().sync_state
    }

    pub fn content(&self) -> String {
        self.inner.state.lock().unwrap().content.clone()
    }

    pub fn document(&self) -> Option<Document> {
        self.inner.state.lock().unwrap().document.clone()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.inner.state.lock().unwrap().dirty
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.state.lock().unwrap().last_error.clone()
    }

    /// Stop the auto-save timer and the realtime subscription
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock().unwrap();
        if let Some(handle) = state.auto_save.take() {
            handle.abort();
        }
        if let Some(handle) = state.subscription.take() {
            handle.abort();
        }
    }
}

impl Drop for DocumentSyncController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn fail(&self, error: SyncError) -> SyncError {
        let mut state = self.state.lock().unwrap();
        state.sync_state = SyncState::Error;
        state.last_error = Some(error.to_string());
        error
    }

    /// A realtime push replaces content wholesale while staying Loaded
    fn apply_remote(&self, remote: Document) {
        let mut state = self.state.lock().unwrap();
        if state.sync_state == SyncState::Loading {
            return;
        }
        tracing::debug!(
            document_id = %remote.id,
            version = remote.version,
            "applying realtime document update"
        );
        state.content = remote.content.clone();
        if remote.content == state.last_persisted {
            state.dirty = false;
        }
        state.document = Some(remote);
    }

    async fn auto_save_tick(inner: &Arc<Self>) {
        let due = {
            let state = inner.state.lock().unwrap();
            state.sync_state == SyncState::Loaded
                && state.dirty
                && state
                    .last_save_at
                    .map_or(true, |at| at.elapsed() >= MIN_SAVE_GAP)
        };
        if !due {
            return;
        }
        if let Err(e) = Inner::persist(inner, true, None).await {
            tracing::error!(error = %e, "auto-save failed");
        }
    }

    async fn persist(
        inner: &Arc<Self>,
        is_auto_save: bool,
        description: Option<String>,
    ) -> Result<(), SyncError> {
        let (content, enable_history) = {
            let mut state = inner.state.lock().unwrap();
            if state.sync_state == SyncState::Syncing {
                tracing::debug!("save already in progress, skipping");
                return Ok(());
            }
            let Some(document) = state.document.as_ref() else {
                return Err(SyncError::NotLoaded);
            };
            let enable_history = document.metadata.enable_version_history;
            state.sync_state = SyncState::Syncing;
            (state.content.clone(), enable_history)
        };

        let description = description.unwrap_or_else(|| {
            if is_auto_save {
                "Auto-save".to_string()
            } else {
                "Manual save".to_string()
            }
        });

        // Content first, history second: a failed update must not leave a
        // version record for a save that never happened.
        let result = inner
            .persistence
            .update(
                &inner.document_id,
                &content,
                SaveOptions {
                    is_auto_save,
                    description: Some(description.clone()),
                },
            )
            .await;

        if result.is_ok() && enable_history {
            if let Err(e) = inner
                .persistence
                .create_version(&inner.document_id, &content, &description, is_auto_save)
                .await
            {
                tracing::warn!(error = %e, "saved content but failed to record version");
            }
        }

        let mut state = inner.state.lock().unwrap();
        match result {
            Ok(mut updated) => {
                updated.stats.last_saved_at = Some(chrono::Utc::now());
                state.document = Some(updated);
                state.last_persisted = content;
                // Edits made while the save was in flight stay unsaved
                state.dirty = state.content != state.last_persisted;
                state.last_save_at = Some(Instant::now());
                state.sync_state = SyncState::Loaded;
                state.last_error = None;
                Ok(())
            }
            Err(e) => {
                state.sync_state = SyncState::Error;
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
