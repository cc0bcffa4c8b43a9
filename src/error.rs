//! Error types for enlighten

use thiserror::Error;

use crate::models::EntryId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed glossary json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("No element matches '{0}'")]
    MissingElement(String),

    #[error("Unknown glossary entry: {0}")]
    UnknownEntry(EntryId),

    #[error("No callback registered as '{0}'")]
    UnknownCallback(String),

    #[error("Invalid callback name '{0}'")]
    InvalidCallback(String),

    #[error("Glossary not ready")]
    NotReady,

    #[error("Glossary source returned no entries")]
    EmptyGlossary,

    #[error("Glossary unavailable ({dropped} deferred operations dropped): {source}")]
    Unavailable {
        dropped: usize,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
