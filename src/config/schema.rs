//! Schema registry for the parameter file.
//!
//! A [`Schema`] declares every managed section, the fields inside it, and
//! the compiled-in default of each field. The field's [`TypeTag`] is taken
//! from its default so the two can never disagree.
//!
//! Exactly one field is the version token. Its default is the schema's
//! version string, and a file whose token differs is migrated.
//!
//! ```
//! use breakout_groups::config::{Schema, SectionSpec};
//!
//! let schema = Schema::builder("0.2")
//!     .section(SectionSpec::new("MAIN").bool("var1", true).int("var2", 2))
//!     .section(SectionSpec::new("SYSTEM").version("sys_cfg_version"))
//!     .build();
//!
//! assert!(schema.validate().is_ok());
//! assert_eq!(schema.version_field().field, "sys_cfg_version");
//! ```

use std::collections::HashSet;

use serde::Serialize;

use crate::config::value::{TypeTag, Value};
use crate::{Error, Result};

/// A single managed field and its compiled-in default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub default: Value,
    /// Whether this field carries the version token
    pub is_version: bool,
}

impl FieldSpec {
    pub fn tag(&self) -> TypeTag {
        self.default.tag()
    }
}

/// A managed section: a name and its ordered fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl SectionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field with an explicit default.
    pub fn field(mut self, name: impl Into<String>, default: Value) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            default,
            is_version: false,
        });
        self
    }

    pub fn bool(self, name: impl Into<String>, default: bool) -> Self {
        self.field(name, Value::Bool(default))
    }

    pub fn int(self, name: impl Into<String>, default: i64) -> Self {
        self.field(name, Value::Int(default))
    }

    pub fn float(self, name: impl Into<String>, default: f64) -> Self {
        self.field(name, Value::Float(default))
    }

    pub fn string(self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.field(name, Value::String(default.into()))
    }

    pub fn list<I, S>(self, name: impl Into<String>, default: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field(
            name,
            Value::StringList(default.into_iter().map(Into::into).collect()),
        )
    }

    /// Declare the version token field. Its default is filled in by
    /// [`SchemaBuilder::build`].
    pub fn version(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            default: Value::String(String::new()),
            is_version: true,
        });
        self
    }
}

/// Location of a field: its section and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldRef {
    pub section: String,
    pub field: String,
}

impl FieldRef {
    pub fn new(section: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            field: field.into(),
        }
    }
}

impl std::fmt::Display for FieldRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.section, self.field)
    }
}

/// The immutable set of managed sections and fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    version: String,
    sections: Vec<SectionSpec>,
}

/// Builder for [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    version: String,
    sections: Vec<SectionSpec>,
}

impl SchemaBuilder {
    pub fn section(mut self, section: SectionSpec) -> Self {
        self.sections.push(section);
        self
    }

    pub fn build(self) -> Schema {
        let mut sections = self.sections;
        for field in sections.iter_mut().flat_map(|s| s.fields.iter_mut()) {
            if field.is_version {
                field.default = Value::String(self.version.clone());
            }
        }
        Schema {
            version: self.version,
            sections,
        }
    }
}

impl Schema {
    /// Start a schema whose version token must equal `version`.
    pub fn builder(version: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            version: version.into(),
            sections: Vec::new(),
        }
    }

    /// Check the declaration for duplicates and a single version field.
    ///
    /// Field names must be unique across the whole schema because bindings
    /// are addressed by field name alone.
    pub fn validate(&self) -> Result<()> {
        let mut sections = HashSet::new();
        let mut fields = HashSet::new();
        let mut versions = 0;

        for section in &self.sections {
            if section.name.is_empty() {
                return Err(Error::InvalidSchema("empty section name".to_string()));
            }
            if !sections.insert(section.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "section [{}] declared twice",
                    section.name
                )));
            }
            for field in &section.fields {
                if field.name.is_empty() {
                    return Err(Error::InvalidSchema(format!(
                        "empty field name in [{}]",
                        section.name
                    )));
                }
                if !fields.insert(field.name.as_str()) {
                    return Err(Error::InvalidSchema(format!(
                        "field {} declared twice",
                        field.name
                    )));
                }
                if field.is_version {
                    versions += 1;
                }
            }
        }

        match versions {
            1 => Ok(()),
            0 => Err(Error::InvalidSchema("no version field declared".to_string())),
            n => Err(Error::InvalidSchema(format!(
                "{} version fields declared, expected 1",
                n
            ))),
        }
    }

    /// The code's version constant.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Where the version token lives.
    ///
    /// Falls back to `SYSTEM.sys_version` for an unvalidated schema with no
    /// version field.
    pub fn version_field(&self) -> FieldRef {
        self.entries()
            .find(|(_, field)| field.is_version)
            .map(|(section, field)| FieldRef::new(section, &field.name))
            .unwrap_or_else(|| FieldRef::new("SYSTEM", "sys_version"))
    }

    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Fields of `section`, empty for sections the schema does not manage.
    pub fn fields(&self, section: &str) -> &[FieldSpec] {
        self.sections
            .iter()
            .find(|s| s.name == section)
            .map(|s| s.fields.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_managed(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s.name == section)
    }

    /// Every `(section, field)` pair in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter().map(move |f| (s.name.as_str(), f)))
    }

    pub fn field(&self, name: &str) -> Option<(&str, &FieldSpec)> {
        self.entries().find(|(_, field)| field.name == name)
    }
}
