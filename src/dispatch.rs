//! Click dispatch.
//!
//! Markers do not call anything themselves: they carry an entry id and a callback name and
//! invoke the dispatcher's handle with both. The host exposes that handle (for a browser, a
//! global function) and routes the call back to [`ClickDispatcher::dispatch`].

use std::fmt;
use std::str::FromStr;

use crate::Map;
use crate::error::{Error, Result};
use crate::glossary::GlossaryStore;
use crate::models::EntryId;

/// Name of the handle embedded in markers unless configured otherwise.
pub const DEFAULT_HANDLE: &str = "enlightenPopup";
/// Callback name that routes to the default popup.
pub const DEFAULT_POPUP: &str = "_defaultPopup";

/// Receives `(id, title, explanation)`.
pub type Callback = Box<dyn Fn(EntryId, &str, &str)>;

/// Names end up inside a quoted `onClick` attribute, keep them identifier-like.
pub(crate) fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}

/// A callback name that is safe to embed in a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackName(String);

impl CallbackName {
    pub fn new(name: &str) -> Result<Self> {
        if is_identifier(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::InvalidCallback(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What clicking a marker does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClickTarget {
    /// Show the default popup.
    #[default]
    Popup,
    /// Jump to the entry in a word list on the same page.
    Index,
    /// Call a named callback.
    Callback(CallbackName),
}

impl ClickTarget {
    pub fn callback(name: &str) -> Result<Self> {
        CallbackName::new(name).map(Self::Callback)
    }

    /// Name passed to the handle. `None` for index links, which need no dispatch.
    pub fn callback_name(&self) -> Option<&str> {
        match self {
            Self::Popup => Some(DEFAULT_POPUP),
            Self::Index => None,
            Self::Callback(name) => Some(name.as_str()),
        }
    }
}

impl FromStr for ClickTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "popup" | DEFAULT_POPUP => Ok(Self::Popup),
            "index" => Ok(Self::Index),
            other => Self::callback(other),
        }
    }
}

impl fmt::Display for ClickTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Popup => f.write_str("popup"),
            Self::Index => f.write_str("index"),
            Self::Callback(name) => f.write_str(name.as_str()),
        }
    }
}

pub struct ClickDispatcher {
    handle: String,
    popup: Option<Callback>,
    callbacks: Map<String, Callback>,
}

impl Default for ClickDispatcher {
    fn default() -> Self {
        Self {
            handle: DEFAULT_HANDLE.to_string(),
            popup: None,
            callbacks: Map::default(),
        }
    }
}

impl fmt::Debug for ClickDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickDispatcher")
            .field("handle", &self.handle)
            .field("popup", &self.popup.is_some())
            .field("callbacks", &self.callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ClickDispatcher {
    /// `handle` is embedded in every marker and must be identifier-like.
    pub fn new(handle: &str) -> Result<Self> {
        if !is_identifier(handle) {
            return Err(Error::InvalidCallback(handle.to_string()));
        }
        Ok(Self {
            handle: handle.to_string(),
            ..Self::default()
        })
    }

    /// Name of the function markers invoke.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn set_popup(&mut self, popup: impl Fn(EntryId, &str, &str) + 'static) {
        self.popup = Some(Box::new(popup));
    }

    pub fn register(&mut self, name: &str, callback: impl Fn(EntryId, &str, &str) + 'static) {
        self.callbacks.insert(name.to_string(), Box::new(callback));
    }

    /// Resolve `id` and hand its title and explanation to the popup or to the named callback.
    pub fn dispatch(&self, store: &GlossaryStore, id: EntryId, name: &str) -> Result<()> {
        let entry = store.get(id).ok_or(Error::UnknownEntry(id))?;

        if name == DEFAULT_POPUP {
            match &self.popup {
                Some(popup) => popup(id, &entry.title, &entry.text),
                None => tracing::warn!("No popup installed, click on {id} ignored"),
            }
            return Ok(());
        }

        let callback = self
            .callbacks
            .get(name)
            .ok_or_else(|| Error::UnknownCallback(name.to_string()))?;
        callback(id, &entry.title, &entry.text);
        Ok(())
    }
}
