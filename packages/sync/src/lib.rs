//! # Redline Sync
//!
//! Document persistence state machine: load, manual save, throttled
//! auto-save, append-only version history, and realtime replacement from
//! other sessions.
//!
//! Multi-writer conflict resolution is explicitly out of scope: a remote
//! push overwrites local content wholesale (last-writer-wins).

mod controller;
mod document;
mod error;
mod persistence;

pub use controller::{DocumentSyncController, SyncState, MIN_SAVE_GAP};
pub use document::{
    Document, DocumentMetadata, DocumentStats, DocumentVersion, SaveOptions,
    MIN_AUTO_SAVE_INTERVAL_SECS,
};
pub use error::SyncError;
pub use persistence::{DocumentStream, Persistence};
