//! # Redline Workspace
//!
//! Glue between the suggestion engine and the editor: an [`EditorSession`]
//! owns the suggestion store and check scheduler for one document and
//! routes accept/ignore decisions so the edit → check → suggest loop stays
//! consistent.
//!
//! Document persistence runs as an independent pipeline (`redline-sync`);
//! the embedding editor feeds session content into its sync controller.

mod session;

pub use session::EditorSession;
