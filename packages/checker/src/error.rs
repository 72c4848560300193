//! Error types for checking

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("ai generation failed: {0}")]
    Generation(String),
}
