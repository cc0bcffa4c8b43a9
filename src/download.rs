//! Where the glossary comes from.

use std::path::Path;

use crate::error::Result;
use crate::lang::Lang;
use crate::models::{GlossaryEntry, parse_words_response};

pub const DEFAULT_SOURCE_URL: &str = "https://analytics.makeequal.se/api/words/{language}";
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

/// Substitute the language into a source url template.
///
/// Example: `https://analytics.makeequal.se/api/words/{language}` -> `.../api/words/sv`
pub fn source_url(template: &str, lang: Lang) -> String {
    template.replace(LANGUAGE_PLACEHOLDER, lang.as_ref())
}

pub trait RemoteSource {
    /// Fetch the words published at `url`. Failures are not retried.
    fn fetch(&self, url: &str) -> Result<Vec<GlossaryEntry>>;
}

/// Reads a static json file with the same shape as the api response. The url is a path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl RemoteSource for FileSource {
    fn fetch(&self, url: &str) -> Result<Vec<GlossaryEntry>> {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        let body = std::fs::read_to_string(path)?;
        parse_words_response(&body)
    }
}

/// Words already in memory. The url is ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub Vec<GlossaryEntry>);

impl RemoteSource for StaticSource {
    fn fetch(&self, _url: &str) -> Result<Vec<GlossaryEntry>> {
        Ok(self.0.clone())
    }
}

#[cfg(feature = "remote")]
pub mod http {
    use super::*;

    use crate::error::Error;

    /// GET over http(s). Any non-2xx status is a network error.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct HttpSource;

    impl RemoteSource for HttpSource {
        fn fetch(&self, url: &str) -> Result<Vec<GlossaryEntry>> {
            tracing::info!("Fetching glossary from {url}");

            let mut response = ureq::get(url)
                .call()
                .map_err(|err| Error::Network(err.to_string()))?;

            if let Some(last_modified) = response.headers().get("last-modified") {
                tracing::debug!("Glossary was last modified: {:?}", last_modified);
            }

            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|err| Error::Network(err.to_string()))?;
            parse_words_response(&body)
        }
    }
}

/// Pick a source for a resolved url: http(s) goes over the network, anything else is a file.
pub fn source_for(url: &str) -> Box<dyn RemoteSource> {
    let is_http = url.starts_with("http://") || url.starts_with("https://");
    #[cfg(feature = "remote")]
    {
        if is_http {
            return Box::new(http::HttpSource);
        }
    }
    #[cfg(not(feature = "remote"))]
    {
        if is_http {
            tracing::warn!("Built without the `remote` feature, reading {url} as a file");
        }
    }
    Box::new(FileSource)
}
