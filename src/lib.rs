//! Glossary annotation: find the glossary terms used in a text, wrap them in clickable markers
//! and build an index and a word list of the terms found.

pub mod annotate;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod download;
pub mod engine;
pub mod error;
pub mod gate;
pub mod glossary;
pub mod host;
pub mod lang;
pub mod markup;
pub mod models;
pub mod pattern;
pub mod scanner;
pub mod utils;
pub mod views;

use fxhash::FxBuildHasher;
use indexmap::{IndexMap, IndexSet};
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub use crate::annotate::{Annotator, Occurrences};
pub use crate::config::{Config, ConfigUpdate};
pub use crate::dispatch::{CallbackName, ClickDispatcher, ClickTarget};
pub use crate::engine::{Dispatch, Enlighten, Replay};
pub use crate::error::{Error, Result};
pub use crate::glossary::GlossaryStore;
pub use crate::models::{EntryId, GlossaryEntry, NewEntry};

pub type Map<K, V> = IndexMap<K, V, FxBuildHasher>; // Preserve insertion order
pub type Set<K> = IndexSet<K, FxBuildHasher>;

/// Log to stderr, so that stdout only carries the produced markup.
///
/// `RUST_LOG` takes precedence over `verbose`.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("enlighten={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
