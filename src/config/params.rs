//! The parameter set handed to group assignment.

use serde::Serialize;

use crate::config::bindings::Bindings;
use crate::config::breakout::{EVENT_SECTION, LABELS_SECTION};
use crate::config::labels::label_groups;
use crate::config::store::ConfigStore;
use crate::Result;

/// Event parameters resolved from a reconciled parameter file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventParams {
    pub n_attendees: i64,
    pub group_size: i64,
    pub n_groups: i64,
    pub n_sessions: i64,
    pub attendees_list: Vec<String>,
    pub group_algorithm: String,
    pub group_algorithm_class: String,
    /// Smallest group allowed, as a fraction of `group_size`
    pub fill_ratio: f64,
    /// One label group per session key of `[LABELS]`
    pub labels: Vec<Vec<String>>,
}

impl EventParams {
    /// Collect the parameters from bindings produced by the breakout schema.
    pub fn from_reconciled(bindings: &Bindings, store: &ConfigStore) -> Result<Self> {
        Ok(Self {
            n_attendees: bindings.require_int("n_attendees")?,
            group_size: bindings.require_int("group_size")?,
            n_groups: bindings.require_int("n_groups")?,
            n_sessions: bindings.require_int("n_sessions")?,
            attendees_list: bindings.require_list("attendees_list")?.to_vec(),
            group_algorithm: bindings.require_string("sys_group_algorithm")?.to_string(),
            group_algorithm_class: bindings
                .require_string("sys_group_algorithm_class")?
                .to_string(),
            fill_ratio: bindings.require_float("sys_fill_ratio")?,
            labels: label_groups(store, LABELS_SECTION, EVENT_SECTION),
        })
    }

    /// Human-readable summary, one parameter per line.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("         algorithm: {}", self.group_algorithm),
            format!("   algorithm_class: {}", self.group_algorithm_class),
            format!("        fill_ratio: {}", self.fill_ratio),
            String::new(),
            format!("    attendees_list: {}", self.attendees_list.join(",")),
            format!("         attendees: {}", self.n_attendees),
            format!("        group_size: {}", self.group_size),
            format!("groups_per_session: {}", self.n_groups),
            format!("          sessions: {}", self.n_sessions),
        ];
        if !self.labels.is_empty() {
            lines.push(String::new());
            for (i, group) in self.labels.iter().enumerate() {
                lines.push(format!("       labels {:>4}: {}", i, group.join(", ")));
            }
        }
        lines.join("\n")
    }
}
