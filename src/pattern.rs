//! Match patterns.
//!
//! A raw pattern is a literal with an optional leading and/or trailing `*`:
//!
//! | raw      | matches                                        |
//! |----------|------------------------------------------------|
//! | `abc`    | the whole word `abc`                           |
//! | `abc*`   | words starting with `abc`                      |
//! | `*abc`   | words ending with `abc`                        |
//! | `*abc*`  | words containing `abc`                         |
//!
//! A "word" here is a run of letters, see [`LETTER_CLASS`].

use regex::{Match, Regex};

use crate::error::{Error, Result};
use crate::markup;

pub const WILDCARD: char = '*';

/// What counts as a letter when looking for word boundaries.
pub const LETTER_CLASS: &str = "[a-zA-ZåäöÅÄÖ]";

/// A compiled pattern. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    core: String,
    core_lower: String,
    core_len: usize,
    loose_start: bool,
    loose_end: bool,
    // Letter run around the core
    occurrence: Regex,
    // Verbatim spans first, then the letter run as the `word` group
    annotation: Regex,
}

fn build_regex(raw: &str, re: &str) -> Result<Regex> {
    Regex::new(re).map_err(|source| Error::Pattern {
        pattern: raw.to_string(),
        source,
    })
}

impl Pattern {
    /// Compile a raw pattern.
    ///
    /// An empty core (`"*"`, `""`) is not rejected: it matches pervasively.
    pub fn compile(raw: &str) -> Result<Self> {
        let loose_start = raw.starts_with(WILDCARD);
        let loose_end = raw.ends_with(WILDCARD);
        let core = raw.replace(WILDCARD, "");
        let escaped = regex::escape(&core);

        let word = format!("{LETTER_CLASS}*{escaped}{LETTER_CLASS}*");
        let occurrence = build_regex(raw, &format!("(?i){word}"))?;

        let verbatim = markup::VERBATIM.join("|");
        // `core` running into a `>` is the tail of an attribute, not text
        let annotation = build_regex(
            raw,
            &format!(r"(?i)(?s:{verbatim})|{escaped}[^<>\s]*>|(?P<word>{word})"),
        )?;

        Ok(Self {
            raw: raw.to_string(),
            core_lower: core.to_lowercase(),
            core_len: core.chars().count(),
            core,
            loose_start,
            loose_end,
            occurrence,
            annotation,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn core(&self) -> &str {
        &self.core
    }

    /// Length of the core in chars. Longer cores take priority.
    pub const fn core_len(&self) -> usize {
        self.core_len
    }

    pub const fn loose_start(&self) -> bool {
        self.loose_start
    }

    pub const fn loose_end(&self) -> bool {
        self.loose_end
    }

    /// Whether the core equals `keyword`, ignoring case.
    pub fn is_core(&self, keyword: &str) -> bool {
        self.core_lower == keyword.to_lowercase()
    }

    /// Boundary test for a captured letter run.
    ///
    /// The run must start with the core unless the start is loose, and end with it unless the end
    /// is loose.
    pub fn accepts(&self, run: &str) -> bool {
        let run = run.to_lowercase();
        match (self.loose_start, self.loose_end) {
            (false, false) => run == self.core_lower,
            (false, true) => run.starts_with(&self.core_lower),
            (true, false) => run.ends_with(&self.core_lower),
            (true, true) => run.contains(&self.core_lower),
        }
    }

    /// Qualifying occurrences in plain text (no markup).
    pub fn occurrences<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Match<'t>> + 't {
        self.occurrence
            .find_iter(text)
            .filter(|m| self.accepts(m.as_str()))
    }

    pub(crate) const fn annotation_regex(&self) -> &Regex {
        &self.annotation
    }
}
