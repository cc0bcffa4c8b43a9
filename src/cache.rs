//! Local glossary cache.
//!
//! Keyed by `enlighten_words_<language>`, the value is the json array of fetched words.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::Map;
use crate::error::Result;
use crate::lang::Lang;

pub const CACHE_NAMESPACE: &str = "enlighten_words";

pub fn cache_key(lang: Lang) -> String {
    format!("{CACHE_NAMESPACE}_{lang}")
}

pub trait Cache {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One file per key.
///
/// Example: `data/enlighten_words_en.json`
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!("Could not read cache {}: {err}", path.display());
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryCache(Map<String, String>);

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key() {
        assert_eq!(cache_key(Lang::Sv), "enlighten_words_sv");
    }

    #[test]
    fn memory_roundtrip() {
        let mut cache = MemoryCache::default();
        assert!(cache.get("k").is_none());
        cache.set("k", "[]").unwrap();
        assert_eq!(cache.get("k").as_deref(), Some("[]"));
    }

    #[test]
    fn file_cache() {
        let dir = std::env::temp_dir().join(format!("enlighten-cache-{}", std::process::id()));
        let mut cache = FileCache::new(&dir);
        assert!(cache.get("enlighten_words_en").is_none());
        cache.set("enlighten_words_en", "[]").unwrap();
        assert_eq!(cache.get("enlighten_words_en").as_deref(), Some("[]"));
        assert_eq!(cache.path("x"), dir.join("x.json"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
