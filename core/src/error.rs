//! paracmd-core's own error type.
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Unterminated {0} quote in command: {1}")]
    UnterminatedQuote(char, String),

    #[error("Failed to read manifest at {0:?}:\n{1}")]
    ManifestRead(PathBuf, std::io::Error),

    #[error("Failed to parse manifest at {0:?}:\n{1}")]
    ManifestParse(PathBuf, serde_json::Error),

    #[error("I/O error while {0}:\n{1}")]
    Io(String, std::io::Error),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown wildcard sort mode: {0}")]
    UnknownWildcardSort(String),

    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;
