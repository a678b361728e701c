//! Session label groups read from a free-form section.
//!
//! ```text
//! [LABELS]
//! sess0 = Abiquiu,Chimayo,Galisteo
//! sess1 = Red,Green,Blue
//! ```
//!
//! Each key becomes one ordered group. Keys that collide with a field name
//! in the reserved section are not labels and are skipped.

use crate::config::store::ConfigStore;
use crate::config::value::split_list;

/// Build the ordered label groups of `label_section`.
///
/// Returns no groups when the section is missing.
pub fn label_groups(
    store: &ConfigStore,
    label_section: &str,
    reserved_section: &str,
) -> Vec<Vec<String>> {
    let Some(labels) = store.section(label_section) else {
        return Vec::new();
    };
    let reserved = store.section(reserved_section);

    labels
        .iter()
        .filter(|(key, _)| !reserved.is_some_and(|r| r.contains_key(key.as_str())))
        .map(|(_, value)| split_list(value))
        .collect()
}
