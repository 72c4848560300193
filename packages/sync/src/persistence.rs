//! # Persistence Contract
//!
//! The storage and realtime backend, reachable only through this trait.
//! `subscribe` yields full document snapshots pushed by other sessions;
//! dropping the stream unsubscribes.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::document::{Document, DocumentVersion, SaveOptions};
use crate::error::SyncError;

/// Stream of full document snapshots from the realtime backend
pub type DocumentStream = BoxStream<'static, Document>;

#[async_trait]
pub trait Persistence: Send + Sync {
    async fn get(&self, document_id: &str) -> Result<Document, SyncError>;

    /// Persist new content. The backend increments the document version and
    /// returns the updated record.
    async fn update(
        &self,
        document_id: &str,
        content: &str,
        options: SaveOptions,
    ) -> Result<Document, SyncError>;

    /// Append a version snapshot recording the current document version.
    /// Called only after the matching [`Persistence::update`] succeeded.
    async fn create_version(
        &self,
        document_id: &str,
        content: &str,
        description: &str,
        is_auto_save: bool,
    ) -> Result<DocumentVersion, SyncError>;

    async fn subscribe(&self, document_id: &str) -> Result<DocumentStream, SyncError>;
}
