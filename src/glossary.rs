//! The glossary store: fetched words, words added at runtime, and the rule table derived from
//! both.

use crate::Map;
use crate::error::Result;
use crate::models::{EntryId, GlossaryEntry, NewEntry};
use crate::pattern::Pattern;

/// One pattern of one entry.
#[derive(Debug, Clone)]
pub struct MatchRule {
    pattern: Pattern,
    entry_id: EntryId,
}

impl MatchRule {
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub const fn entry_id(&self) -> EntryId {
        self.entry_id
    }
}

fn compile_rules(entry: &GlossaryEntry) -> Result<Vec<MatchRule>> {
    entry
        .matches
        .iter()
        .map(|raw| {
            Ok(MatchRule {
                pattern: Pattern::compile(raw)?,
                entry_id: entry.id,
            })
        })
        .collect()
}

// Stable: among equally long cores, fetched words come before added ones and each keeps its
// insertion order.
fn sort_rules(rules: &mut [MatchRule]) {
    rules.sort_by_key(|rule| std::cmp::Reverse(rule.pattern.core_len()));
}

#[derive(Debug, Default)]
pub struct GlossaryStore {
    words: Vec<GlossaryEntry>,
    positions: Map<EntryId, usize>,
    extra_words: Vec<GlossaryEntry>,
    rules: Vec<MatchRule>,
}

impl GlossaryStore {
    pub fn from_words(words: Vec<GlossaryEntry>) -> Result<Self> {
        let mut store = Self::default();
        store.replace_words(words)?;
        Ok(store)
    }

    /// Replace the fetched words wholesale. Added words are kept.
    ///
    /// On error the store is left untouched.
    pub fn replace_words(&mut self, words: Vec<GlossaryEntry>) -> Result<()> {
        let mut rules = Vec::new();
        for word in &words {
            rules.extend(compile_rules(word)?);
        }
        // Already compiled, already in insertion order
        rules.extend(
            self.rules
                .iter()
                .filter(|rule| rule.entry_id < 0)
                .cloned(),
        );
        sort_rules(&mut rules);

        self.positions = words
            .iter()
            .enumerate()
            .map(|(pos, word)| (word.id, pos))
            .collect();
        self.words = words;
        self.rules = rules;

        tracing::debug!(
            "Glossary has {} words, {} added words, {} rules",
            self.words.len(),
            self.extra_words.len(),
            self.rules.len()
        );
        Ok(())
    }

    /// Add a word at runtime. Ids go -1, -2, ... in insertion order.
    pub fn add_word(&mut self, word: NewEntry) -> Result<EntryId> {
        let id = -(self.extra_words.len() as EntryId) - 1;
        let word = word.with_id(id);

        self.rules.extend(compile_rules(&word)?);
        sort_rules(&mut self.rules);
        self.extra_words.push(word);

        Ok(id)
    }

    pub fn get(&self, id: EntryId) -> Option<&GlossaryEntry> {
        if id < 0 {
            let pos = usize::try_from(-(id + 1)).ok()?;
            self.extra_words.get(pos)
        } else {
            self.positions.get(&id).and_then(|&pos| self.words.get(pos))
        }
    }

    /// Fetched (or cached) words, without the added ones.
    pub fn words(&self) -> &[GlossaryEntry] {
        &self.words
    }

    pub fn extra_words(&self) -> &[GlossaryEntry] {
        &self.extra_words
    }

    /// Every entry: fetched words first, then added ones.
    pub fn entries(&self) -> impl Iterator<Item = &GlossaryEntry> {
        self.words.iter().chain(&self.extra_words)
    }

    /// All rules, longest core first.
    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    /// First rule, in priority order, whose core is `keyword` (ignoring case).
    pub fn rule_for_keyword(&self, keyword: &str) -> Option<&MatchRule> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_core(keyword))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn entry(id: EntryId, title: &str, matches: &[&str]) -> GlossaryEntry {
        GlossaryEntry {
            id,
            title: title.to_string(),
            matches: matches.iter().map(|m| (*m).to_string()).collect(),
            text: format!("About {title}."),
        }
    }

    pub(crate) fn sample_store() -> GlossaryStore {
        GlossaryStore::from_words(vec![
            entry(38, "Asexual", &["asexual"]),
            entry(54, "Gender", &["gender"]),
            entry(69, "Age", &["age"]),
        ])
        .unwrap()
    }

    fn cores(store: &GlossaryStore) -> Vec<&str> {
        store.rules().iter().map(|r| r.pattern().core()).collect()
    }

    #[test]
    fn rules_sorted_by_core_length() {
        let store = GlossaryStore::from_words(vec![
            entry(1, "Short", &["ab"]),
            entry(2, "Long", &["*abcd"]),
            entry(3, "Mid", &["abc", "xyz"]),
        ])
        .unwrap();
        assert_eq!(cores(&store), vec!["abcd", "abc", "xyz", "ab"]);
    }

    #[test]
    fn wildcards_do_not_count_for_priority() {
        let store = GlossaryStore::from_words(vec![
            entry(1, "Sexual", &["*sexual*"]),
            entry(2, "Asexual", &["asexual"]),
        ])
        .unwrap();
        assert_eq!(store.rules()[0].entry_id(), 2);
    }

    #[test]
    fn added_words_get_negative_ids() {
        let mut store = sample_store();
        let a = store.add_word(NewEntry::new("Dasdas", &["dasdas"], "Weird word.")).unwrap();
        let b = store.add_word(NewEntry::new("Dxsdxs", &["dxsdxs*"], "Another.")).unwrap();
        assert_eq!((a, b), (-1, -2));
        assert_eq!(store.get(-1).unwrap().title, "Dasdas");
        assert_eq!(store.get(-2).unwrap().title, "Dxsdxs");
        assert!(store.get(-3).is_none());
        assert_eq!(store.rules().len(), 5);
    }

    #[test]
    fn lookup_by_id() {
        let store = sample_store();
        assert_eq!(store.get(54).unwrap().title, "Gender");
        assert!(store.get(1).is_none());
    }

    #[test]
    fn replace_keeps_added_words() {
        let mut store = sample_store();
        store.add_word(NewEntry::new("Dasdas", &["dasdas"], "")).unwrap();
        store
            .replace_words(vec![entry(7, "Intergender", &["intergender"])])
            .unwrap();
        assert!(store.get(38).is_none());
        assert_eq!(store.get(7).unwrap().title, "Intergender");
        assert_eq!(store.get(-1).unwrap().title, "Dasdas");
        assert_eq!(cores(&store), vec!["intergender", "dasdas"]);
        assert_eq!(store.entries().count(), 2);
    }

    #[test]
    fn keyword_lookup() {
        let store = GlossaryStore::from_words(vec![
            entry(1, "A", &["gender*"]),
            entry(2, "B", &["gender"]),
        ])
        .unwrap();
        // Same core length, first in priority order wins
        assert_eq!(store.rule_for_keyword("GENDER").unwrap().entry_id(), 1);
        assert!(store.rule_for_keyword("gend").is_none());
    }
}
