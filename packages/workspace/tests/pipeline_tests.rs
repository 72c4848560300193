//! Full pipeline: suggestion accepts feeding the sync controller, with
//! auto-save persisting the corrected content.

use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;
use redline_checker::{CheckConfig, CheckRequest, CheckResponse, Checker};
use redline_suggestions::{Position, ProcessedSuggestions, Severity, Suggestion, SuggestionKind};
use redline_sync::{
    Document, DocumentMetadata, DocumentStream, DocumentSyncController, DocumentVersion,
    Persistence, SaveOptions, SyncError,
};
use redline_workspace::EditorSession;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct OneShotChecker;

#[async_trait]
impl Checker for OneShotChecker {
    async fn check(&self, request: CheckRequest) -> CheckResponse {
        let suggestions = if request.text.contains("teh") {
            vec![Suggestion::new(
                "fix-teh",
                &request.document_id,
                SuggestionKind::Spelling,
                "teh",
                "the",
                Position::new(0, 3),
                0.95,
                Severity::High,
            )]
        } else {
            vec![]
        };
        CheckResponse::ok(ProcessedSuggestions::from_list(suggestions))
    }
}

/// Minimal persistence double: one document, recorded versions, no remote
/// pushes.
struct RecordingPersistence {
    document: Mutex<Document>,
    versions: Mutex<Vec<DocumentVersion>>,
}

impl RecordingPersistence {
    fn new(document: Document) -> Arc<Self> {
        Arc::new(Self {
            document: Mutex::new(document),
            versions: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Persistence for RecordingPersistence {
    async fn get(&self, _document_id: &str) -> Result<Document, SyncError> {
        Ok(self.document.lock().unwrap().clone())
    }

    async fn update(
        &self,
        _document_id: &str,
        content: &str,
        _options: SaveOptions,
    ) -> Result<Document, SyncError> {
        let mut doc = self.document.lock().unwrap();
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
        let doc = self.document.lock().unwrap();
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
        Ok(stream::pending().boxed())
    }
}

#[tokio::test(start_paused = true)]
async fn test_accepted_suggestion_reaches_persistence_via_auto_save() {
    let metadata = DocumentMetadata {
        enable_auto_save: true,
        auto_save_interval_secs: 30,
        ..DocumentMetadata::default()
    };
    let document = Document::new("doc-1", "teh cat sat", metadata);
    let persistence = RecordingPersistence::new(document);

    let controller = DocumentSyncController::new(persistence.clone(), "doc-1");
    controller.load().await.unwrap();

    let mut session = EditorSession::new(
        Arc::new(OneShotChecker),
        "doc-1",
        controller.content(),
        CheckConfig::default(),
    );

    session.check_now();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(session.accept("fix-teh"));
    assert_eq!(session.content(), "the cat sat");

    // The editor mirrors session content into the sync controller
    controller.update_content(session.content());
    assert!(controller.has_unsaved_changes());

    // Auto-save picks the edit up on the next tick
    tokio::time::sleep(Duration::from_secs(31)).await;

    assert!(!controller.has_unsaved_changes());
    let saved = persistence.document.lock().unwrap().clone();
    assert_eq!(saved.content, "the cat sat");
    assert_eq!(saved.version, 2);

    let versions = persistence.versions.lock().unwrap();
    assert_eq!(versions.len(), 1);
    assert!(versions[0].is_auto_save);
    assert_eq!(versions[0].content, "the cat sat");
}
