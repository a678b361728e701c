//! Parameter file reconciliation for breakout-groups.
//!
//! The parameter file is a small INI-style text file that people edit by
//! hand between runs:
//!
//! ```text
//! [EVENT]
//! n_attendees = 11
//! group_size = 3
//!
//! [SYSTEM]
//! sys_version = 0.3
//! ```
//!
//! ## Pieces
//!
//! - [`schema`] - which sections and fields exist, their types and defaults
//! - [`value`] - typed values and their text form
//! - [`comments`] - annotation lines written into the file
//! - [`store`] - ordered in-memory copy of the file, parse and write
//! - [`reconciler`] - creates, migrates and reads the file into [`Bindings`]
//! - [`bindings`] - the resolved typed values
//! - [`labels`] / [`params`] - derived views handed to group assignment
//! - [`breakout`] - the application's own schema
//!
//! ## Lifecycle
//!
//! A missing file is written from defaults. A file whose `sys_version`
//! differs from [`breakout::CONFIG_VERSION`] is migrated: values already in
//! it are kept, new fields get defaults, dropped fields disappear. A current
//! file is only read.
//!
//! Reconciliation is not safe to run from several processes against the
//! same file at once.

pub mod bindings;
pub mod breakout;
pub mod comments;
pub mod labels;
pub mod params;
pub mod reconciler;
pub mod schema;
pub mod store;
pub mod value;

pub use bindings::Bindings;
pub use comments::{CommentCatalog, CommentTarget};
pub use labels::label_groups;
pub use params::EventParams;
pub use reconciler::{ConfigState, Reconciled, Reconciler};
pub use schema::{FieldRef, FieldSpec, Schema, SchemaBuilder, SectionSpec};
#[cfg(unix)]
pub use store::CONFIG_FILE_MODE;
pub use store::{ConfigStore, SyntaxError};
pub use value::{ParseValueError, TypeTag, Value};
