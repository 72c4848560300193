//! Error types for document synchronization

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("document {0} not found")]
    NotFound(String),

    #[error("document is not loaded")]
    NotLoaded,

    #[error("save failed: {0}")]
    SaveFailed(String),
}
