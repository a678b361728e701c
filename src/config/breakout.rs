//! The breakout-groups parameter file: schema, comments and defaults.

use crate::config::comments::CommentCatalog;
use crate::config::schema::{Schema, SectionSpec};

/// Version written to `[SYSTEM] sys_version`. Bump it whenever the schema
/// below changes so existing files are migrated.
pub const CONFIG_VERSION: &str = "0.3";

/// File name inside the data directory.
pub const DEFAULT_CONFIG_FILE: &str = "breakout_groups.cfg";

pub const EVENT_SECTION: &str = "EVENT";
pub const SYSTEM_SECTION: &str = "SYSTEM";
/// Free-form section of per-session labels, never managed by the schema.
pub const LABELS_SECTION: &str = "LABELS";

pub fn schema() -> Schema {
    Schema::builder(CONFIG_VERSION)
        .section(
            SectionSpec::new(EVENT_SECTION)
                .int("n_attendees", 11)
                .int("group_size", 3)
                .int("n_groups", 3)
                .int("n_sessions", 4)
                .list("attendees_list", Vec::<String>::new()),
        )
        .section(
            SectionSpec::new(SYSTEM_SECTION)
                .version("sys_version")
                .string("sys_group_algorithm", "group_fill")
                .string("sys_group_algorithm_class", "GroupFill")
                .bool("sys_show_comments", true)
                .float("sys_fill_ratio", 0.5),
        )
        .build()
}

pub fn comments() -> CommentCatalog {
    CommentCatalog::new()
        .section(
            EVENT_SECTION,
            [
                "event parameters, edit these for each run",
                "n_groups is the number of groups in each session",
            ],
        )
        .field(
            EVENT_SECTION,
            "attendees_list",
            ["comma separated attendee names, leave empty to number attendees"],
        )
        .section(
            SYSTEM_SECTION,
            ["system settings, normally left unchanged"],
        )
        .field(
            SYSTEM_SECTION,
            "sys_version",
            ["changing the version number will cause the file to be rewritten"],
        )
        .field(
            SYSTEM_SECTION,
            "sys_fill_ratio",
            ["smallest group allowed, as a fraction of group_size"],
        )
        .section(
            LABELS_SECTION,
            ["one comma separated list of group labels per session"],
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::value::TypeTag;

    #[test]
    fn test_schema_is_valid() {
        assert!(schema().validate().is_ok());
    }

    #[test]
    fn test_schema_version_field() {
        let schema = schema();
        let version = schema.version_field();
        assert_eq!(version.section, SYSTEM_SECTION);
        assert_eq!(version.field, "sys_version");
        assert_eq!(schema.version(), CONFIG_VERSION);
    }

    #[test]
    fn test_labels_section_is_free_form() {
        let schema = schema();
        assert!(!schema.is_managed(LABELS_SECTION));
        assert!(schema.is_managed(EVENT_SECTION));
    }

    #[test]
    fn test_event_field_types() {
        let schema = schema();
        let fields = schema.fields(EVENT_SECTION);
        assert!(fields[..4].iter().all(|f| f.tag() == TypeTag::Int));
        assert_eq!(fields[4].tag(), TypeTag::StringList);
    }
}
