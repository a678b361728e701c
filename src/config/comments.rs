//! Annotation lines written above sections and fields.
//!
//! Comments live here and nowhere else. The store never holds them, and
//! they are dropped when a file is parsed, so only [`ConfigStore::render`]
//! reads this table.
//!
//! [`ConfigStore::render`]: crate::config::ConfigStore::render

use std::collections::HashMap;

/// What a block of comment lines is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget<'a> {
    /// Written right after the `[section]` header
    Section(&'a str),
    /// Written right before `field = value`
    Field { section: &'a str, field: &'a str },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentCatalog {
    sections: HashMap<String, Vec<String>>,
    fields: HashMap<(String, String), Vec<String>>,
}

impl CommentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach lines to a section header.
    pub fn section<I, S>(mut self, section: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections
            .entry(section.into())
            .or_default()
            .extend(lines.into_iter().map(Into::into));
        self
    }

    /// Attach lines to a field.
    pub fn field<I, S>(mut self, section: impl Into<String>, field: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields
            .entry((section.into(), field.into()))
            .or_default()
            .extend(lines.into_iter().map(Into::into));
        self
    }

    /// Lines for `target`, empty when none are registered.
    pub fn lookup(&self, target: CommentTarget<'_>) -> &[String] {
        let lines = match target {
            CommentTarget::Section(section) => self.sections.get(section),
            CommentTarget::Field { section, field } => self
                .fields
                .get(&(section.to_string(), field.to_string())),
        };
        lines.map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.fields.is_empty()
    }
}
