//! Sync state machine behavior: load, manual save, auto-save clamping and
//! throttling, append-only restore, and realtime replacement.
//!
//! Timing runs on tokio's paused clock.

use async_trait::async_trait;
use futures::StreamExt;
use redline_sync::{
    Document, DocumentMetadata, DocumentStream, DocumentSyncController, DocumentVersion,
    Persistence, SaveOptions, SyncError, SyncState,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// In-memory persistence double. Remote pushes are driven explicitly
/// through [`MemoryPersistence::push`].
struct MemoryPersistence {
    docs: Mutex<HashMap<String, Document>>,
    versions: Mutex<Vec<DocumentVersion>>,
    remote: broadcast::Sender<Document>,
    fail_saves: AtomicBool,
    update_calls: AtomicUsize,
}

impl MemoryPersistence {
    fn with_document(doc: Document) -> Arc<Self> {
        let (remote, _) = broadcast::channel(16);
        let mut docs = HashMap::new();
        docs.insert(doc.id.clone(), doc);
        Arc::new(Self {
            docs: Mutex::new(docs),
            versions: Mutex::new(Vec::new()),
            remote,
            fail_saves: AtomicBool::new(false),
            update_calls: AtomicUsize::new(0),
        })
    }

    fn push(&self, doc: Document) {
        let _ = self.remote.send(doc);
    }

    fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn versions(&self) -> Vec<DocumentVersion> {
        self.versions.lock().unwrap().clone()
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn get(&self, document_id: &str) -> Result<Document, SyncError> {
        self.docs
            .lock()
            .unwrap()
            .get(document_id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(document_id.to_string()))
    }

    async fn update(
        &self,
        document_id: &str,
        content: &str,
        _options: SaveOptions,
    ) -> Result<Document, SyncError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SyncError::SaveFailed("backend unavailable".to_string()));
        }
        let mut docs = self.docs.lock().unwrap();
        let doc = docs
            .get_mut(document_id)
            .ok_or_else(|| SyncError::NotFound(document_id.to_string()))?;
        doc.update_content(content);
        doc.version += 1;
        Ok(doc.clone())
    }

    async fn create_version(
        &self,
        document_id: &str,
        content: &str,
        description: &str,
        is_auto_save: bool,
    ) -> Result<DocumentVersion, SyncError> {
        let docs = self.docs.lock().unwrap();
        let doc = docs
            .get(document_id)
            .ok_or_else(|| SyncError::NotFound(document_id.to_string()))?;
        let mut versions = self.versions.lock().unwrap();
        let version = DocumentVersion {
            id: format!("ver-{}", versions.len() + 1),
            document_id: document_id.to_string(),
            version: doc.version,
            content: content.to_string(),
            description: description.to_string(),
            is_auto_save,
            created_at: chrono::Utc::now(),
        };
        versions.push(version.clone());
        Ok(version)
    }

    async fn subscribe(&self, _document_id: &str) -> Result<DocumentStream, SyncError> {
        let rx = self.remote.subscribe();
        Ok(BroadcastStream::new(rx)
            .filter_map(|item| async move { item.ok() })
            .boxed())
    }
}

fn doc_with(metadata: DocumentMetadata) -> Document {
    Document::new("doc-1", "the original content", metadata)
}

fn no_auto_save() -> DocumentMetadata {
    DocumentMetadata {
        enable_auto_save: false,
        ..DocumentMetadata::default()
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn test_load_reaches_loaded_state() {
    let persistence = MemoryPersistence::with_document(doc_with(no_auto_save()));
    let controller = DocumentSyncController::new(persistence, "doc-1");

    controller.load().await.unwrap();

    assert_eq!(controller.state(), SyncState::Loaded);
    assert_eq!(controller.content(), "the original content");
    assert!(!controller.has_unsaved_changes());
}

#[tokio::test(start_paused = true)]
async fn test_load_missing_document_errors() {
    let persistence = MemoryPersistence::with_document(doc_with(no_auto_save()));
    let controller = DocumentSyncController::new(persistence, "no-such-doc");

    let result = controller.load().await;

    assert!(matches!(result, Err(SyncError::NotFound(_))));
    assert_eq!(controller.state(), SyncState::Error);
    assert!(controller.last_error().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_manual_save_creates_version_and_increments() {
    let persistence = MemoryPersistence::with_document(doc_with(no_auto_save()));
    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    controller.update_content("edited content here");
    assert!(controller.has_unsaved_changes());

    controller.save(None).await.unwrap();

    assert_eq!(controller.state(), SyncState::Loaded);
    assert!(!controller.has_unsaved_changes());

    let document = controller.document().unwrap();
    assert_eq!(document.version, 2);
    assert!(document.stats.last_saved_at.is_some());

    let versions = persistence.versions();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, 2);
    assert_eq!(versions[0].content, "edited content here");
    assert_eq!(versions[0].description, "Manual save");
    assert!(!versions[0].is_auto_save);
}

#[tokio::test(start_paused = true)]
async fn test_auto_save_interval_is_floored_to_thirty_seconds() {
    let metadata = DocumentMetadata {
        enable_auto_save: true,
        auto_save_interval_secs: 5,
        ..DocumentMetadata::default()
    };
    let persistence = MemoryPersistence::with_document(doc_with(metadata));
    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    controller.update_content("unsaved edit");

    // Configured 5s must not fire before the 30s floor
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(persistence.update_calls(), 0);

    tokio::time::sleep(Duration::from_secs(26)).await;
    assert_eq!(persistence.update_calls(), 1);

    let versions = persistence.versions();
    assert_eq!(versions.len(), 1);
    assert!(versions[0].is_auto_save);
    assert_eq!(versions[0].description, "Auto-save");
}

#[tokio::test(start_paused = true)]
async fn test_auto_save_is_noop_without_changes() {
    let metadata = DocumentMetadata {
        enable_auto_save: true,
        auto_save_interval_secs: 30,
        ..DocumentMetadata::default()
    };
    let persistence = MemoryPersistence::with_document(doc_with(metadata));
    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    tokio::time::sleep(Duration::from_secs(70)).await;

    assert_eq!(persistence.update_calls(), 0);
    assert!(persistence.versions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_auto_save_throttled_after_recent_manual_save() {
    let metadata = DocumentMetadata {
        enable_auto_save: true,
        auto_save_interval_secs: 30,
        ..DocumentMetadata::default()
    };
    let persistence = MemoryPersistence::with_document(doc_with(metadata));
    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    // Manual save lands one second before the auto-save tick
    tokio::time::sleep(Duration::from_secs(29)).await;
    controller.update_content("first edit");
    controller.save(None).await.unwrap();
    assert_eq!(persistence.update_calls(), 1);
    controller.update_content("second edit");

    // Tick at t=30 is inside the 2s minimum gap
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(persistence.update_calls(), 1);

    // Tick at t=60 saves normally
    tokio::time::sleep(Duration::from_secs(26)).await;
    assert_eq!(persistence.update_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_save_failure_enters_error_and_retry_recovers() {
    let persistence = MemoryPersistence::with_document(doc_with(no_auto_save()));
    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    controller.update_content("content worth keeping");
    persistence.fail_saves.store(true, Ordering::SeqCst);

    let result = controller.save(None).await;
    assert!(matches!(result, Err(SyncError::SaveFailed(_))));
    assert_eq!(controller.state(), SyncState::Error);
    assert!(controller.has_unsaved_changes());

    persistence.fail_saves.store(false, Ordering::SeqCst);
    controller.save(None).await.unwrap();
    assert_eq!(controller.state(), SyncState::Loaded);
    assert!(!controller.has_unsaved_changes());
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_records_no_version() {
    let persistence = MemoryPersistence::with_document(doc_with(no_auto_save()));
    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    controller.update_content("content worth keeping");
    persistence.fail_saves.store(true, Ordering::SeqCst);

    assert!(controller.save(None).await.is_err());
    assert!(persistence.versions().is_empty());

    // The retry appends exactly one record, numbered by the save it made
    persistence.fail_saves.store(false, Ordering::SeqCst);
    controller.save(None).await.unwrap();

    let versions = persistence.versions();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, 2);
    assert_eq!(controller.document().unwrap().version, 2);
}

#[tokio::test(start_paused = true)]
async fn test_restore_appends_instead_of_rewinding() {
    let persistence = MemoryPersistence::with_document(doc_with(no_auto_save()));
    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    controller.update_content("second revision");
    controller.save(None).await.unwrap();
    controller.update_content("third revision");
    controller.save(None).await.unwrap();

    let versions = persistence.versions();
    assert_eq!(versions.len(), 2);
    let old = versions[0].clone();
    assert_eq!(old.content, "second revision");

    controller.restore_version(&old).await.unwrap();

    // Restore created a new head version; the old record is untouched
    let versions = persistence.versions();
    assert_eq!(versions.len(), 3);
    assert_eq!(versions[0].content, old.content);
    assert_eq!(versions[0].description, old.description);
    assert_eq!(versions[2].content, "second revision");
    assert_eq!(versions[2].description, "Restored to version 2");
    assert!(!versions[2].is_auto_save);
    assert_eq!(versions[2].version, 4);

    assert_eq!(controller.content(), "second revision");
    assert_eq!(controller.document().unwrap().version, 4);
}

#[tokio::test(start_paused = true)]
async fn test_remote_push_replaces_content() {
    let persistence = MemoryPersistence::with_document(doc_with(no_auto_save()));
    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    controller.update_content("a local unsaved edit");
    assert!(controller.has_unsaved_changes());

    // Another session wrote something else entirely
    let mut remote = doc_with(no_auto_save());
    remote.update_content("content from another session");
    remote.version = 5;
    persistence.push(remote);
    settle().await;

    // Content replaced wholesale, but our unsaved edit was lost without
    // ever being persisted, so the dirty flag stays set
    assert_eq!(controller.content(), "content from another session");
    assert!(controller.has_unsaved_changes());
    assert_eq!(controller.state(), SyncState::Loaded);
    assert_eq!(controller.document().unwrap().version, 5);
}

#[tokio::test(start_paused = true)]
async fn test_remote_echo_of_persisted_content_clears_dirty() {
    let persistence = MemoryPersistence::with_document(doc_with(no_auto_save()));
    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    controller.update_content("a local unsaved edit");

    // The backend echoes exactly what we last persisted
    let echo = doc_with(no_auto_save());
    persistence.push(echo);
    settle().await;

    assert_eq!(controller.content(), "the original content");
    assert!(!controller.has_unsaved_changes());
}

#[tokio::test(start_paused = true)]
async fn test_dirty_flag_clears_when_edit_reverts() {
    let persistence = MemoryPersistence::with_document(doc_with(no_auto_save()));
    let controller = DocumentSyncController::new(persistence, "doc-1");
    controller.load().await.unwrap();

    controller.update_content("changed");
    assert!(controller.has_unsaved_changes());

    controller.update_content("the original content");
    assert!(!controller.has_unsaved_changes());
}
