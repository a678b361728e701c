//! In-memory form of the parameter file and its on-disk codec.
//!
//! The file is line oriented:
//!
//! ```text
//! [EVENT]
//! # number of people attending
//! n_attendees = 11
//! group_size = 3
//!
//! [SYSTEM]
//! sys_version = 0.3
//! ```
//!
//! Sections and keys keep their insertion order. Comment lines (`#` or `;`)
//! are dropped on parse and regenerated from a [`CommentCatalog`] on write,
//! so a store never contains them.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::comments::{CommentCatalog, CommentTarget};
use crate::{Error, Result};

/// Permissions for a newly created parameter file (Unix: 0644, readable by all).
/// A rewrite keeps the mode of the file it replaces.
#[cfg(unix)]
pub const CONFIG_FILE_MODE: u32 = 0o644;

/// Keys of a single section, in file order.
pub type Section = IndexMap<String, String>;

/// A line that could not be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Ordered `section -> key -> raw value` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigStore {
    sections: IndexMap<String, Section>,
}

/// Check whether a parameter file is present.
///
/// A symlink whose target is missing is an error rather than "absent", so a
/// fresh file is never written over the link.
pub fn exists(path: &Path) -> Result<bool> {
    let io_err = |source: io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    if path.try_exists().map_err(io_err)? {
        return Ok(true);
    }
    match fs::symlink_metadata(path) {
        Ok(_) => Err(io_err(io::Error::new(
            io::ErrorKind::NotFound,
            "symbolic link points to a missing file",
        ))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_err(e)),
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse the file at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::parse(&text).map_err(|source| Error::Format {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            sections = store.sections.len(),
            "parsed parameter file"
        );
        Ok(store)
    }

    /// Tokenize file text into sections and keys.
    pub fn parse(text: &str) -> std::result::Result<Self, SyntaxError> {
        let mut store = Self::new();
        let mut current: Option<String> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| SyntaxError::new(line_no, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(SyntaxError::new(line_no, "empty section name"));
                }
                if store.has_section(name) {
                    return Err(SyntaxError::new(
                        line_no,
                        format!("section [{}] appears more than once", name),
                    ));
                }
                store.add_section(name);
                current = Some(name.to_string());
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(SyntaxError::new(
                    line_no,
                    format!("expected `key = value`, got {:?}", line),
                ));
            };
            let key = key.trim();
            let value = value.trim();

            let Some(section) = current.as_deref() else {
                return Err(SyntaxError::new(
                    line_no,
                    format!("key {:?} appears before any section header", key),
                ));
            };
            if key.is_empty() {
                return Err(SyntaxError::new(line_no, "empty key"));
            }
            if store.contains(section, key) {
                return Err(SyntaxError::new(
                    line_no,
                    format!("key {:?} appears more than once in [{}]", key, section),
                ));
            }
            store.set(section, key, value);
        }

        Ok(store)
    }

    /// Render the store as file text, with catalog comments interleaved.
    pub fn render(&self, comments: &CommentCatalog) -> String {
        let mut out = String::new();

        for (name, section) in &self.sections {
            out.push_str(&format!("[{}]\n", name));
            push_comments(&mut out, comments.lookup(CommentTarget::Section(name)));

            for (key, value) in section {
                push_comments(
                    &mut out,
                    comments.lookup(CommentTarget::Field {
                        section: name,
                        field: key,
                    }),
                );
                if value.is_empty() {
                    out.push_str(&format!("{} =\n", key));
                } else {
                    out.push_str(&format!("{} = {}\n", key, value));
                }
            }
            out.push('\n');
        }

        out
    }

    /// Replace the file at `path` with the rendered store.
    ///
    /// The text goes to a temporary file in the same directory which is
    /// then renamed over `path`, so readers never see a partial file. The
    /// directory must already exist. An existing file keeps its permissions;
    /// a new one gets [`CONFIG_FILE_MODE`] on Unix.
    pub fn write(&self, path: &Path, comments: &CommentCatalog) -> Result<()> {
        let io_err = |source: io::Error| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(self.render(comments).as_bytes())
            .map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = match fs::metadata(path) {
                Ok(meta) => meta.permissions(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    fs::Permissions::from_mode(CONFIG_FILE_MODE)
                }
                Err(e) => return Err(io_err(e)),
            };
            tmp.as_file().set_permissions(permissions).map_err(io_err)?;
        }

        tmp.persist(path).map_err(|e| io_err(e.error))?;
        tracing::debug!(path = %path.display(), "wrote parameter file");
        Ok(())
    }

    // ==================== Queries ====================

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn section(&self, section: &str) -> Option<&Section> {
        self.sections.get(section)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, s)| (name.as_str(), s))
    }

    // ==================== Mutation ====================

    /// Add an empty section at the end unless it already exists.
    pub fn add_section(&mut self, section: &str) {
        if !self.sections.contains_key(section) {
            self.sections.insert(section.to_string(), Section::new());
        }
    }

    /// Drop every key of `section`, keeping its position. Creates it if absent.
    pub fn clear_section(&mut self, section: &str) {
        match self.sections.get_mut(section) {
            Some(keys) => keys.clear(),
            None => self.add_section(section),
        }
    }

    /// Set a key, creating the section if needed. Existing keys keep their position.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.add_section(section);
        if let Some(keys) = self.sections.get_mut(section) {
            keys.insert(key.to_string(), value.into());
        }
    }

    /// Remove a key, preserving the order of the remaining keys.
    pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
        self.sections
            .get_mut(section)
            .and_then(|keys| keys.shift_remove(key))
    }
}

fn push_comments(out: &mut String, lines: &[String]) {
    for line in lines {
        if line.is_empty() {
            out.push_str("#\n");
        } else {
            out.push_str(&format!("# {}\n", line));
        }
    }
}
