//! Error types for suggestion application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuggestionError {
    #[error("selected suggestions {first} and {second} overlap and cannot be applied together")]
    OverlappingSelection { first: String, second: String },
}
