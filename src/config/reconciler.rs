//! Load, migrate and bind the parameter file.
//!
//! ## States
//!
//! A run starts in one of three states and always ends with the file and
//! the bindings in sync (or fails without touching the bindings):
//!
//! - **Absent**: no file. One is written from the current bindings.
//! - **StaleVersion**: the file's version token is missing or differs from
//!   the schema version. Values are read from the file, the managed
//!   sections are rebuilt around them, and the file is rewritten.
//! - **Current**: the token matches. Values are read and nothing is written.
//!
//! Keys absent from the file take the value already bound, so new fields
//! pick up their defaults while edited values survive a migration.
//! Managed sections end up holding exactly the declared fields: missing
//! ones are filled and undeclared ones dropped, in memory only when the file
//! is current. Sections the schema does not manage are left alone.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::bindings::Bindings;
use crate::config::comments::CommentCatalog;
use crate::config::schema::{FieldRef, Schema};
use crate::config::store::{self, ConfigStore};
use crate::config::value::{Value, decode, encode};
use crate::{Error, Result};

/// How the file looked when reconciliation started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConfigState {
    /// No file existed; defaults were written
    Absent,
    /// The version token differed (or was missing); the file was rewritten
    StaleVersion { found: Option<String> },
    /// The version token matched; the file was left as is
    Current,
}

impl ConfigState {
    /// Whether this run wrote the file.
    pub fn rewrote_file(&self) -> bool {
        !matches!(self, ConfigState::Current)
    }
}

impl std::fmt::Display for ConfigState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigState::Absent => write!(f, "absent"),
            ConfigState::StaleVersion { found: Some(v) } => write!(f, "stale (was {})", v),
            ConfigState::StaleVersion { found: None } => write!(f, "stale (no version)"),
            ConfigState::Current => write!(f, "current"),
        }
    }
}

/// Result of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciled {
    /// The normalized store
    pub store: ConfigStore,
    /// State the file was in before this run
    pub state: ConfigState,
    /// Schema fields missing from the file and filled in memory from bindings
    pub healed: Vec<FieldRef>,
    /// Keys of managed sections the schema does not declare, dropped in memory
    pub pruned: Vec<FieldRef>,
}

/// Keeps one parameter file in step with a [`Schema`].
#[derive(Debug, Clone)]
pub struct Reconciler {
    schema: Schema,
    comments: CommentCatalog,
    path: PathBuf,
}

impl Reconciler {
    /// Create a reconciler for `dir/file_name`.
    ///
    /// `dir` must already exist by the time [`reconcile`](Self::reconcile)
    /// needs to write.
    pub fn new(
        schema: Schema,
        comments: CommentCatalog,
        dir: impl AsRef<Path>,
        file_name: &str,
    ) -> Result<Self> {
        schema.validate()?;
        if file_name.is_empty() {
            return Err(Error::InvalidInput(
                "parameter file name is empty".to_string(),
            ));
        }
        Ok(Self {
            schema,
            comments,
            path: dir.as_ref().join(file_name),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn comments(&self) -> &CommentCatalog {
        &self.comments
    }

    /// Fresh bindings holding this reconciler's schema defaults.
    pub fn default_bindings(&self) -> Bindings {
        Bindings::from_schema(&self.schema)
    }

    /// Bring the file and `bindings` in sync with the schema.
    ///
    /// On error `bindings` is left exactly as it was.
    pub fn reconcile(&self, bindings: &mut Bindings) -> Result<Reconciled> {
        let mut staged = bindings.clone();
        let version = self.schema.version_field();
        staged.set(
            &version.field,
            Value::String(self.schema.version().to_string()),
        );

        let (mut store, state) = if store::exists(&self.path)? {
            let mut store = ConfigStore::read(&self.path)?;
            self.bind(&store, &mut staged)?;

            let found = store
                .get(&version.section, &version.field)
                .map(str::to_string);
            if found.as_deref() == Some(self.schema.version()) {
                (store, ConfigState::Current)
            } else {
                tracing::info!(
                    path = %self.path.display(),
                    from = found.as_deref().unwrap_or("<none>"),
                    to = self.schema.version(),
                    "migrating parameter file"
                );
                self.apply_schema(&mut store, &staged);
                store.write(&self.path, &self.comments)?;
                (store, ConfigState::StaleVersion { found })
            }
        } else {
            tracing::info!(
                path = %self.path.display(),
                "parameter file not found, writing defaults"
            );
            let mut store = ConfigStore::new();
            self.apply_schema(&mut store, &staged);
            store.write(&self.path, &self.comments)?;
            (store, ConfigState::Absent)
        };

        let healed = self.fill_missing(&mut store, &staged);
        if !healed.is_empty() {
            let fields: Vec<String> = healed.iter().map(ToString::to_string).collect();
            tracing::warn!(
                path = %self.path.display(),
                fields = ?fields,
                "fields missing from parameter file were filled from current values"
            );
        }

        let pruned = self.drop_undeclared(&mut store);
        if !pruned.is_empty() {
            let fields: Vec<String> = pruned.iter().map(ToString::to_string).collect();
            tracing::warn!(
                path = %self.path.display(),
                fields = ?fields,
                "keys not declared for managed sections were ignored"
            );
        }

        *bindings = staged;
        Ok(Reconciled {
            store,
            state,
            healed,
            pruned,
        })
    }

    /// Decode every managed field present in `store` into `bindings`.
    ///
    /// The version token is never taken from the file.
    fn bind(&self, store: &ConfigStore, bindings: &mut Bindings) -> Result<()> {
        for (section, field) in self.schema.entries() {
            if field.is_version {
                continue;
            }
            let fallback = bindings
                .get(&field.name)
                .filter(|v| v.tag() == field.tag())
                .cloned()
                .unwrap_or_else(|| field.default.clone());
            let value = decode(store.get(section, &field.name), field.tag(), &fallback)
                .map_err(|source| Error::Decode {
                    section: section.to_string(),
                    field: field.name.clone(),
                    source,
                })?;
            bindings.set(&field.name, value);
        }
        Ok(())
    }

    /// Rebuild every managed section from `bindings`.
    ///
    /// Managed sections keep their position (new ones are appended) and are
    /// refilled in schema order; other sections are untouched.
    fn apply_schema(&self, store: &mut ConfigStore, bindings: &Bindings) {
        for section in self.schema.sections() {
            store.clear_section(&section.name);
            for field in &section.fields {
                let value = bindings.get(&field.name).unwrap_or(&field.default);
                store.set(&section.name, &field.name, encode(value));
            }
        }
    }

    /// Add any managed field still missing from `store`.
    fn fill_missing(&self, store: &mut ConfigStore, bindings: &Bindings) -> Vec<FieldRef> {
        let mut healed = Vec::new();
        for (section, field) in self.schema.entries() {
            if store.contains(section, &field.name) {
                continue;
            }
            let value = bindings.get(&field.name).unwrap_or(&field.default);
            store.set(section, &field.name, encode(value));
            healed.push(FieldRef::new(section, &field.name));
        }
        healed
    }

    /// Remove keys of managed sections that the schema does not declare.
    fn drop_undeclared(&self, store: &mut ConfigStore) -> Vec<FieldRef> {
        let mut pruned = Vec::new();
        for section in self.schema.sections() {
            let Some(keys) = store.section(&section.name) else {
                continue;
            };
            let undeclared: Vec<String> = keys
                .keys()
                .filter(|key| !section.fields.iter().any(|f| &f.name == *key))
                .cloned()
                .collect();
            for key in undeclared {
                store.remove(&section.name, &key);
                pruned.push(FieldRef::new(&section.name, &key));
            }
        }
        pruned
    }
}
