//! Rewrite text so that glossary words become clickable markers.

use regex::Captures;

use crate::Set;
use crate::dispatch::{ClickTarget, is_identifier};
use crate::error::{Error, Result};
use crate::glossary::GlossaryStore;
use crate::markup::replace_forced_tags;
use crate::models::EntryId;
use crate::scanner::find_entry_ids;

/// Prefix of the anchor names that word lists emit and index markers link to.
pub const ANCHOR_PREFIX: &str = "ENLIGHT_WORD";
pub const MARKER_CLASS: &str = "enlighten-clickable";

/// Which occurrences of an entry get a marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Occurrences {
    #[default]
    All,
    /// Only the first occurrence of every entry.
    First,
}

pub struct Annotator<'a> {
    store: &'a GlossaryStore,
    exclude: &'a Set<EntryId>,
    handle: &'a str,
}

impl<'a> Annotator<'a> {
    /// `handle` is the name of the click dispatch function embedded in markers.
    pub fn new(
        store: &'a GlossaryStore,
        exclude: &'a Set<EntryId>,
        handle: &'a str,
    ) -> Result<Self> {
        if !is_identifier(handle) {
            return Err(Error::InvalidCallback(handle.to_string()));
        }
        Ok(Self {
            store,
            exclude,
            handle,
        })
    }

    fn marker(&self, id: EntryId, target: &ClickTarget, shown: &str) -> String {
        match target.callback_name() {
            None => format!("<a href='#{ANCHOR_PREFIX}{id}' class='{MARKER_CLASS}'>{shown}</a>"),
            Some(name) => format!(
                "<a onClick='{}({id},\"{name}\")' class='{MARKER_CLASS}'>{shown}</a>",
                self.handle
            ),
        }
    }

    /// Annotate `text`.
    ///
    /// Rules run longest core first, so a longer pattern wraps its span before a shorter one gets
    /// a chance; the resulting marker is an anchor and anchors are never matched into. Anchors,
    /// ignore regions, forced tags and tags are copied verbatim.
    ///
    /// Forced tags are resolved last, by keyword. An unknown (or excluded) keyword leaves the tag
    /// untouched, as do anchors and ignore regions around it.
    pub fn annotate(&self, text: &str, occurrences: Occurrences, target: &ClickTarget) -> String {
        let candidates = find_entry_ids(self.store, text, self.exclude);
        let mut wrapped: Set<EntryId> = Set::default();
        let mut text = text.to_string();

        for rule in self.store.rules() {
            let id = rule.entry_id();
            if !candidates.contains(&id) {
                continue;
            }

            let pattern = rule.pattern();
            let replaced = pattern
                .annotation_regex()
                .replace_all(&text, |caps: &Captures| {
                    let whole = &caps[0];
                    let Some(word) = caps.name("word") else {
                        return whole.to_string();
                    };
                    if occurrences == Occurrences::First && wrapped.contains(&id) {
                        return whole.to_string();
                    }
                    if !pattern.accepts(word.as_str()) {
                        return whole.to_string();
                    }
                    wrapped.insert(id);
                    self.marker(id, target, word.as_str())
                })
                .into_owned();
            text = replaced;
        }

        replace_forced_tags(&text, |tag| {
            if tag.keyword.is_empty() {
                return tag.whole.to_string();
            }
            match self.store.rule_for_keyword(tag.keyword) {
                Some(rule) if !self.exclude.contains(&rule.entry_id()) => {
                    self.marker(rule.entry_id(), target, tag.shown)
                }
                _ => tag.whole.to_string(),
            }
        })
        .into_owned()
    }
}
