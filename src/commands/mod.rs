//! Command implementations for the bgroups CLI.
//!
//! Every command resolves where the parameter file lives, reconciles it,
//! and returns a result that can be printed as JSON or for humans:
//! - `reconcile` - bring the file up to date and report what happened
//! - `show` - print the file contents with their comments
//! - `params` - print the resolved event parameters
//! - `path` - print where the file lives

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{
    Bindings, CommentCatalog, ConfigState, ConfigStore, EventParams, FieldRef, Reconciled,
    Reconciler, breakout,
};
use crate::{Error, Result};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BG_DATA_DIR";

/// Environment variable overriding the parameter file name.
pub const CONFIG_FILE_ENV: &str = "BG_CONFIG_FILE";

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

// ==================== Location ====================

/// Where the parameter file lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigLocation {
    pub data_dir: PathBuf,
    pub file_name: String,
}

impl ConfigLocation {
    /// Resolve the data directory and file name.
    ///
    /// Precedence: explicit value (flag or env, resolved by clap) > default.
    /// The default data directory is `<data_dir>/breakout-groups`, e.g.
    /// `~/.local/share/breakout-groups/` on Linux.
    pub fn resolve(data_dir: Option<PathBuf>, file_name: Option<String>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?
                .join("breakout-groups"),
        };
        let file_name = file_name.unwrap_or_else(|| breakout::DEFAULT_CONFIG_FILE.to_string());
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(Error::InvalidInput(format!(
                "parameter file name must be a plain file name, got {:?}",
                file_name
            )));
        }
        Ok(Self {
            data_dir,
            file_name,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// A reconciler for the breakout schema at this location.
    pub fn reconciler(&self) -> Result<Reconciler> {
        Reconciler::new(
            breakout::schema(),
            breakout::comments(),
            &self.data_dir,
            &self.file_name,
        )
    }
}

/// Create the data directory and reconcile the parameter file in it.
pub fn load(location: &ConfigLocation) -> Result<(Reconciler, Bindings, Reconciled)> {
    ensure_dir(&location.data_dir)?;
    let reconciler = location.reconciler()?;
    let mut bindings = reconciler.default_bindings();
    let reconciled = reconciler.reconcile(&mut bindings)?;
    Ok((reconciler, bindings, reconciled))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })
}

// ==================== reconcile ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub path: PathBuf,
    pub version: String,
    #[serde(flatten)]
    pub state: ConfigState,
    pub rewrote: bool,
    pub healed: Vec<FieldRef>,
    pub pruned: Vec<FieldRef>,
}

impl Output for ReconcileReport {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Parameter file: {}", self.path.display()),
            format!("Version: {}", self.version),
        ];
        lines.push(match &self.state {
            ConfigState::Absent => "Created with default values".to_string(),
            ConfigState::StaleVersion { found: Some(old) } => {
                format!("Migrated from version {}", old)
            }
            ConfigState::StaleVersion { found: None } => {
                "Migrated (file had no version)".to_string()
            }
            ConfigState::Current => "Up to date".to_string(),
        });
        if !self.healed.is_empty() {
            let fields: Vec<String> = self.healed.iter().map(ToString::to_string).collect();
            lines.push(format!("Missing fields filled: {}", fields.join(", ")));
        }
        if !self.pruned.is_empty() {
            let fields: Vec<String> = self.pruned.iter().map(ToString::to_string).collect();
            lines.push(format!("Undeclared fields ignored: {}", fields.join(", ")));
        }
        lines.join("\n")
    }
}

pub fn reconcile(location: &ConfigLocation) -> Result<ReconcileReport> {
    let (reconciler, _, reconciled) = load(location)?;
    Ok(ReconcileReport {
        path: reconciler.path().to_path_buf(),
        version: reconciler.schema().version().to_string(),
        rewrote: reconciled.state.rewrote_file(),
        state: reconciled.state,
        healed: reconciled.healed,
        pruned: reconciled.pruned,
    })
}

// ==================== show ====================

#[derive(Debug, Clone, Serialize)]
pub struct ShowResult {
    pub data_dir: PathBuf,
    pub file_name: String,
    pub sections: ConfigStore,
    pub bindings: Bindings,
    #[serde(skip)]
    comments: Option<CommentCatalog>,
}

impl Output for ShowResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let names: Vec<&str> = self.sections.section_names().collect();
        let catalog = self.comments.clone().unwrap_or_default();
        format!(
            " data dir: {}\nfile name: {}\n sections: {}\n\n{}",
            self.data_dir.display(),
            self.file_name,
            names.join(", "),
            self.sections.render(&catalog).trim_end()
        )
    }
}

/// Comments are printed when `[SYSTEM] sys_show_comments` is on, unless
/// `no_comments` asks to leave them out.
pub fn show(location: &ConfigLocation, no_comments: bool) -> Result<ShowResult> {
    let (reconciler, bindings, reconciled) = load(location)?;
    let with_comments = !no_comments && bindings.bool("sys_show_comments").unwrap_or(true);
    Ok(ShowResult {
        data_dir: location.data_dir.clone(),
        file_name: location.file_name.clone(),
        sections: reconciled.store,
        bindings,
        comments: with_comments.then(|| reconciler.comments().clone()),
    })
}

// ==================== params ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParamsResult(pub EventParams);

impl Output for ParamsResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        self.0.summary()
    }
}

pub fn params(location: &ConfigLocation) -> Result<ParamsResult> {
    let (_, bindings, reconciled) = load(location)?;
    EventParams::from_reconciled(&bindings, &reconciled.store).map(ParamsResult)
}

// ==================== path ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResult {
    pub data_dir: PathBuf,
    pub path: PathBuf,
    pub exists: bool,
}

impl Output for PathResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let status = if self.exists { "" } else { " (not created yet)" };
        format!("{}{}", self.path.display(), status)
    }
}

/// Report the resolved location without touching the file.
pub fn path(location: &ConfigLocation) -> Result<PathResult> {
    let path = location.path();
    Ok(PathResult {
        data_dir: location.data_dir.clone(),
        exists: crate::config::store::exists(&path)?,
        path,
    })
}
