//! The document the engine reads from and writes to.
//!
//! The engine only ever treats markup as text: it reads an element's inner markup and replaces
//! it. A browser binding would implement [`Host`] on top of the DOM; [`MemoryHost`] keeps the
//! elements in memory.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// `#id` or `.class` (first element with the class).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Class(String),
}

impl Selector {
    pub fn new(s: &str) -> Self {
        // Anything mentioning '#' is an id lookup
        match s.find('#') {
            Some(pos) => Self::Id(s[pos + 1..].to_string()),
            None => Self::Class(s.strip_prefix('.').unwrap_or(s).to_string()),
        }
    }
}

impl FromStr for Selector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
        }
    }
}

/// Where the inserted markup goes relative to the existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Append,
    Prepend,
    Replace,
}

impl Placement {
    pub fn apply(self, existing: &str, markup: &str) -> String {
        match self {
            Self::Append => format!("{existing}{markup}"),
            Self::Prepend => format!("{markup}{existing}"),
            Self::Replace => markup.to_string(),
        }
    }
}

pub trait Host {
    /// Inner markup of the element.
    fn read(&self, selector: &Selector) -> Result<String>;
    /// Replace the inner markup of the element.
    fn write(&mut self, selector: &Selector, markup: String) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub html: String,
}

impl Element {
    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Id(id) => self.id.as_deref() == Some(id.as_str()),
            Selector::Class(class) => self.classes.iter().any(|c| c == class),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    elements: Vec<Element>,
}

impl MemoryHost {
    /// Add an element with an id and the same name as class.
    pub fn with_element(mut self, name: &str, html: &str) -> Self {
        self.push(Element {
            id: Some(name.to_string()),
            classes: vec![name.to_string()],
            html: html.to_string(),
        });
        self
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn find(&self, selector: &Selector) -> Result<&Element> {
        self.elements
            .iter()
            .find(|e| e.matches(selector))
            .ok_or_else(|| Error::MissingElement(selector.to_string()))
    }
}

impl Host for MemoryHost {
    fn read(&self, selector: &Selector) -> Result<String> {
        Ok(self.find(selector)?.html.clone())
    }

    fn write(&mut self, selector: &Selector, markup: String) -> Result<()> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.matches(selector))
            .ok_or_else(|| Error::MissingElement(selector.to_string()))?;
        element.html = markup;
        Ok(())
    }
}
