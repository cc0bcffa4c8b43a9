//! The markup micro-grammar shared by the scanner and the annotator.
//!
//! * `<en-ignore>...</en-ignore>`: invisible to all matching.
//! * `<enlighten data-word="KEYWORD">SHOWN</enlighten>`: SHOWN becomes a marker for KEYWORD.
//!   The short form `<enlighten KEYWORD>SHOWN</enlighten>` is also accepted.
//! * `<a ...>...</a>`: never matched into.
//!
//! Tags are recognized with a pragmatic `<...>` heuristic, there is no html parser involved.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const ANCHOR: &str = r"<a\b[^>]*>.*?</a>";
pub const IGNORE_REGION: &str = r"<en-ignore\b[^>]*>.*?</en-ignore>";
pub const FORCED_REGION: &str = r"<enlighten\b[^>]*>.*?</enlighten>";
pub const TAG: &str = r"<[^<>]*>";

/// Spans that the annotator copies verbatim, in priority order.
pub const VERBATIM: [&str; 4] = [ANCHOR, IGNORE_REGION, FORCED_REGION, TAG];

// Groups: 1 = data-word keyword, 2 = short form keyword, 3 = shown text
const FORCED_TAG: &str =
    r#"<enlighten\b\s*(?:data-word\s*=\s*['"]([^'"]*)['"]|([^>]*?))\s*>(.*?)</enlighten>"#;

static IGNORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?is){IGNORE_REGION}")).unwrap());
// Anchors and ignore regions come first so that forced tags inside them are skipped whole
static FORCED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?is){ANCHOR}|{IGNORE_REGION}|{FORCED_TAG}")).unwrap()
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(TAG).unwrap());

/// A parsed `<enlighten>` construct.
pub struct ForcedTag<'t> {
    pub keyword: &'t str,
    pub shown: &'t str,
    pub whole: &'t str,
}

impl<'t> ForcedTag<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        let keyword = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str().trim());
        Self {
            keyword,
            shown: caps.get(3).map_or("", |m| m.as_str()),
            whole: caps.get(0).map_or("", |m| m.as_str()),
        }
    }
}

/// Replace every forced tag in `text` with whatever `f` returns for it.
///
/// Forced tags inside an anchor or an ignore region are not forced tags and stay as they are.
pub fn replace_forced_tags<'t>(
    text: &'t str,
    mut f: impl FnMut(&ForcedTag) -> String,
) -> Cow<'t, str> {
    FORCED_RE.replace_all(text, |caps: &Captures| {
        // The shown text group only takes part in a forced tag match
        if caps.get(3).is_none() {
            return caps[0].to_string();
        }
        f(&ForcedTag::from_captures(caps))
    })
}

/// Text as the scanner sees it.
///
/// Ignore regions vanish, forced tags are reduced to their keyword and every remaining tag is
/// stripped.
pub fn plain_text(text: &str) -> String {
    let text = IGNORE_RE.replace_all(text, "");
    // Pad the keyword so it does not glue to its neighbours
    let text = replace_forced_tags(&text, |tag| format!(" {} ", tag.keyword));
    TAG_RE.replace_all(&text, "").into_owned()
}
