//! Index and word list markup built from the entries present in a text.

use crate::Set;
use crate::annotate::ANCHOR_PREFIX;
use crate::glossary::GlossaryStore;
use crate::lang::Lang;
use crate::models::{EntryId, GlossaryEntry};
use crate::scanner::find_entry_ids;

/// Entries present in `text` (all of them if `text` has no text outside markup), sorted by title.
pub fn alphabetized<'a>(
    store: &'a GlossaryStore,
    text: &str,
    exclude: &Set<EntryId>,
    lang: Lang,
) -> Vec<&'a GlossaryEntry> {
    let mut entries: Vec<_> = find_entry_ids(store, text, exclude)
        .into_iter()
        .filter_map(|id| store.get(id))
        .collect();
    entries.sort_by(|a, b| lang.compare(&a.title, &b.title));
    entries
}

/// Ordered list of titles, each linking to its word list anchor when `linked`.
pub fn build_index(
    store: &GlossaryStore,
    text: &str,
    exclude: &Set<EntryId>,
    lang: Lang,
    linked: bool,
) -> String {
    let mut html = String::from("<div class=\"enlighten-index\">\n<ol>\n");
    for entry in alphabetized(store, text, exclude, lang) {
        if linked {
            html.push_str(&format!(
                "<li><a href=\"#{ANCHOR_PREFIX}{}\">{}</a></li>\n",
                entry.id, entry.title
            ));
        } else {
            html.push_str(&format!("<li>{}</li>\n", entry.title));
        }
    }
    html.push_str("</ol>\n</div>\n");
    html
}

/// Titles with their explanations, each behind an anchor that index links point to.
pub fn build_glossary_list(
    store: &GlossaryStore,
    text: &str,
    exclude: &Set<EntryId>,
    lang: Lang,
) -> String {
    let mut html = String::from("<div class=\"enlighten-word-explainations\">\n");
    for entry in alphabetized(store, text, exclude, lang) {
        html.push_str(&format!(
            "<div class=\"enlighten-word\"><a name=\"{ANCHOR_PREFIX}{}\"></a><h3>{}</h3><span>{}</span></div>\n",
            entry.id, entry.title, entry.text
        ));
    }
    html.push_str("</div>\n");
    html
}
