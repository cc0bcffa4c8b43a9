use serde::{Deserialize, Serialize};

use crate::download::{DEFAULT_SOURCE_URL, source_url};
use crate::lang::Lang;
use crate::models::EntryId;

/// Engine configuration. Keys are camelCase so an embedding page can hand its settings object
/// over as json.
///
/// ```json
/// { "language": "sv", "useLocalCache": true, "sourceURL": "words_{language}.json", "exclude": [38] }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub language: Lang,
    /// Trust a cached glossary before the refresh completes.
    pub use_local_cache: bool,
    /// May contain the `{language}` placeholder.
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    pub exclude: Vec<EntryId>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Lang::default(),
            use_local_cache: true,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// The source url with the language substituted.
    pub fn resolved_source_url(&self) -> String {
        source_url(&self.source_url, self.language)
    }

    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(exclude) = update.exclude {
            self.exclude = exclude;
        }
    }
}

/// The settings that may change after construction.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigUpdate {
    pub language: Option<Lang>,
    pub exclude: Option<Vec<EntryId>>,
}
