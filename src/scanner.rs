use std::ops::Range;

use crate::Set;
use crate::glossary::GlossaryStore;
use crate::markup::plain_text;
use crate::models::EntryId;

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Ids of the entries present in `text`, in discovery order (rule priority).
///
/// A `text` with nothing left once markup is stripped means the whole glossary. Excluded ids are
/// never returned.
///
/// Rules are tried longest core first and every accepted occurrence claims its span: a shorter
/// pattern cannot count an occurrence that lies on a span already claimed (`sexual` inside an
/// accepted `asexual`). Entries already found keep claiming, their id is just not added twice.
pub fn find_entry_ids(store: &GlossaryStore, text: &str, exclude: &Set<EntryId>) -> Set<EntryId> {
    let plain = plain_text(text);
    if plain.is_empty() {
        return store
            .entries()
            .map(|entry| entry.id)
            .filter(|id| !exclude.contains(id))
            .collect();
    }

    let mut ids = Set::default();
    let mut claimed: Vec<Range<usize>> = Vec::new();

    for rule in store.rules() {
        let id = rule.entry_id();
        if exclude.contains(&id) {
            continue;
        }

        for occurrence in rule.pattern().occurrences(&plain) {
            let span = occurrence.range();
            if claimed.iter().any(|c| overlaps(c, &span)) {
                continue;
            }
            claimed.push(span);
            ids.insert(id);
        }
    }

    tracing::trace!("Found ids {ids:?}");
    ids
}
