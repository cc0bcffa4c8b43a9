use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Glossary locales.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English
    #[default]
    En,
    /// Swedish
    Sv,
    /// Danish
    Da,
    /// Norwegian Bokmål
    Nb,
    /// Finnish
    Fi,
    /// German
    De,
    /// French
    Fr,
    /// Spanish
    Es,
}

impl Lang {
    pub const fn help_supported_isos() -> &'static str {
        "Supported isos: en | sv | da | nb | fi | de | fr | es"
    }

    pub const fn long(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Sv => "Swedish",
            Self::Da => "Danish",
            Self::Nb => "Norwegian Bokmål",
            Self::Fi => "Finnish",
            Self::De => "German",
            Self::Fr => "French",
            Self::Es => "Spanish",
        }
    }

    /// Letters that this locale sorts after `z`, in order, together with the letters that are
    /// treated as equal to them.
    fn tail_letters(&self) -> &'static [&'static [char]] {
        match self {
            Self::Sv | Self::Fi => &[&['å'], &['ä', 'æ'], &['ö', 'ø']],
            Self::Da | Self::Nb => &[&['æ', 'ä'], &['ø', 'ö'], &['å']],
            _ => &[],
        }
    }

    fn sort_key(&self, s: &str) -> Vec<u32> {
        let tail = self.tail_letters();
        let after_z = u32::from('z') * 4;
        let mut key = Vec::with_capacity(s.len());

        for c in s.chars().flat_map(char::to_lowercase) {
            if let Some(pos) = tail.iter().position(|group| group.contains(&c)) {
                key.push(after_z + 1 + pos as u32);
                continue;
            }
            for d in std::iter::once(c).nfd().filter(|d| !is_combining_mark(*d)) {
                key.push(u32::from(d) * 4);
            }
        }

        key
    }

    /// Locale-aware comparison of two titles.
    ///
    /// Diacritics fold to their base letter unless the locale treats the letter as its own (like
    /// `ö` in Swedish). Ties fall back to the raw strings so that the order is total.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.sort_key(a)
            .cmp(&self.sort_key(b))
            .then_with(|| a.cmp(b))
    }
}

impl AsRef<str> for Lang {
    fn as_ref(&self) -> &str {
        match self {
            Self::En => "en",
            Self::Sv => "sv",
            Self::Da => "da",
            Self::Nb => "nb",
            Self::Fi => "fi",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Es => "es",
        }
    }
}

impl std::str::FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "sv" => Ok(Self::Sv),
            "da" => Ok(Self::Da),
            "nb" => Ok(Self::Nb),
            "fi" => Ok(Self::Fi),
            "de" => Ok(Self::De),
            "fr" => Ok(Self::Fr),
            "es" => Ok(Self::Es),
            _ => Err(format!("unsupported iso code '{s}'\n{}", Self::help_supported_isos())),
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}
