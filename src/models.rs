//! Glossary data models.
//!
//! The remote api answers `GET /api/words/{language}` with:
//!
//! ```json
//! { "data": [ { "id": 38, "title": "Asexual", "matches": ["asexual"], "text": "..." } ] }
//! ```
//!
//! The local cache stores the bare `data` array.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Non-negative for fetched words, negative for words added at runtime.
pub type EntryId = i64;

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GlossaryEntry {
    pub id: EntryId,
    pub title: String,
    /// Raw match patterns, optionally starting and/or ending with `*`.
    pub matches: Vec<String>,
    /// Explanation. May contain markup.
    pub text: String,
}

/// A word added programmatically. It receives its id from the store.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NewEntry {
    pub title: String,
    pub matches: Vec<String>,
    pub text: String,
}

impl NewEntry {
    pub fn new(title: &str, matches: &[&str], text: &str) -> Self {
        Self {
            title: title.to_string(),
            matches: matches.iter().map(|m| (*m).to_string()).collect(),
            text: text.to_string(),
        }
    }

    pub(crate) fn with_id(self, id: EntryId) -> GlossaryEntry {
        GlossaryEntry {
            id,
            title: self.title,
            matches: self.matches,
            text: self.text,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WordsResponse {
    pub data: Vec<GlossaryEntry>,
}

/// Parse a remote payload (`{ "data": [...] }`).
pub fn parse_words_response(body: &str) -> Result<Vec<GlossaryEntry>> {
    let response: WordsResponse = serde_json::from_str(body)?;
    Ok(response.data)
}
