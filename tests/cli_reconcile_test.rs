//! Integration tests for `bgroups reconcile`, `show`, `params` and `path`.

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

fn current_version(env: &TestEnv) -> String {
    let output = env.bg().arg("reconcile").assert().success().get_output().stdout.clone();
    common::parse_json(&output)["version"]
        .as_str()
        .unwrap()
        .to_string()
}

// ============================================================================
// bgroups reconcile Tests
// ============================================================================

#[test]
fn test_reconcile_creates_file() {
    let env = TestEnv::new();

    let output = env.bg().arg("reconcile").assert().success().get_output().stdout.clone();
    let json = common::parse_json(&output);

    assert_eq!(json["state"], "absent");
    assert_eq!(json["rewrote"], true);
    let text = env.read_config();
    assert!(text.contains("[EVENT]\n"));
    assert!(text.contains("n_attendees = 11\n"));
    assert!(text.contains("[SYSTEM]\n"));
}

#[test]
fn test_reconcile_twice_leaves_file_unchanged() {
    let env = TestEnv::new();
    env.bg().arg("reconcile").assert().success();
    let first = env.read_config();

    env.bg()
        .args(["reconcile", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Up to date"));

    assert_eq!(env.read_config(), first);
}

#[test]
fn test_reconcile_migrates_old_version() {
    let env = TestEnv::new();
    env.write_config(
        "[EVENT]\nn_attendees = 30\ngroup_size = 5\n\n[SYSTEM]\nsys_version = 0.0.1\n",
    );

    env.bg()
        .args(["reconcile", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated from version 0.0.1"));

    let text = env.read_config();
    assert!(text.contains("n_attendees = 30\n"));
    assert!(text.contains("group_size = 5\n"));
    assert!(text.contains("n_sessions = 4\n"));
    assert!(!text.contains("0.0.1"));
}

#[test]
fn test_reconcile_reports_healed_fields() {
    let env = TestEnv::new();
    let version = current_version(&env);
    env.write_config(&format!(
        "[EVENT]\nn_attendees = 12\ngroup_size = 3\nn_groups = 4\nattendees_list =\n\n\
         [SYSTEM]\nsys_version = {}\nsys_group_algorithm = group_fill\n\
         sys_group_algorithm_class = GroupFill\nsys_show_comments = True\nsys_fill_ratio = 0.5\n",
        version
    ));

    let output = env.bg().arg("reconcile").assert().success().get_output().stdout.clone();
    let json = common::parse_json(&output);

    assert_eq!(json["state"], "current");
    assert_eq!(json["healed"][0]["section"], "EVENT");
    assert_eq!(json["healed"][0]["field"], "n_sessions");
}

#[test]
fn test_reconcile_reports_undeclared_fields_without_rewrite() {
    let env = TestEnv::new();
    let version = current_version(&env);
    env.write_config(&format!(
        "[EVENT]\nn_attendees = 12\ngroup_size = 3\nn_groups = 4\nn_sessions = 4\n\
         retired = 9\nattendees_list =\n\n\
         [SYSTEM]\nsys_version = {}\nsys_group_algorithm = group_fill\n\
         sys_group_algorithm_class = GroupFill\nsys_show_comments = True\nsys_fill_ratio = 0.5\n",
        version
    ));
    let before = env.read_config();

    let output = env.bg().arg("reconcile").assert().success().get_output().stdout.clone();
    let json = common::parse_json(&output);

    assert_eq!(json["state"], "current");
    assert_eq!(json["pruned"][0]["section"], "EVENT");
    assert_eq!(json["pruned"][0]["field"], "retired");
    assert_eq!(env.read_config(), before);
}

#[test]
fn test_reconcile_malformed_value_fails() {
    let env = TestEnv::new();
    env.write_config("[EVENT]\nn_attendees = lots\n");
    let before = env.read_config();

    env.bg()
        .arg("reconcile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("n_attendees"));

    assert_eq!(env.read_config(), before);
}

#[test]
fn test_reconcile_malformed_file_fails_human() {
    let env = TestEnv::new();
    env.write_config("n_attendees = 11\n");

    env.bg()
        .args(["reconcile", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Malformed parameter file"));
}

#[test]
fn test_reconcile_custom_file_name() {
    let env = TestEnv::new();
    env.bg()
        .args(["reconcile", "--file", "workshop.cfg"])
        .assert()
        .success();

    assert!(env.data_path().join("workshop.cfg").exists());
    assert!(!env.config_path().exists());
}

#[test]
fn test_reconcile_creates_data_dir() {
    let env = TestEnv::new();
    let nested = env.data_path().join("a").join("b");

    env.bg()
        .arg("reconcile")
        .arg("--data-dir")
        .arg(&nested)
        .assert()
        .success();

    assert!(nested.join(common::CONFIG_FILE).exists());
}

// ============================================================================
// bgroups show / params / path Tests
// ============================================================================

#[test]
fn test_show_human_includes_comments() {
    let env = TestEnv::new();
    env.bg()
        .args(["show", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# changing the version number"))
        .stdout(predicate::str::contains("sections: EVENT, SYSTEM"));
}

#[test]
fn test_show_no_comments() {
    let env = TestEnv::new();
    env.bg()
        .args(["show", "-H", "--no-comments"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#").not());
}

#[test]
fn test_params_labels() {
    let env = TestEnv::new();
    env.bg().arg("reconcile").assert().success();
    let mut text = env.read_config();
    text.push_str("[LABELS]\nsess0 = Red,Green,Blue\nsess2 = Portales,Santa Fe,Taos,Chama,Cuba\n");
    fs::write(env.config_path(), text).unwrap();

    let output = env.bg().arg("params").assert().success().get_output().stdout.clone();
    let json = common::parse_json(&output);

    assert_eq!(json["labels"][0], serde_json::json!(["Red", "Green", "Blue"]));
    assert_eq!(
        json["labels"][1],
        serde_json::json!(["Portales", "Santa Fe", "Taos", "Chama", "Cuba"])
    );
}

#[test]
fn test_path_reports_location() {
    let env = TestEnv::new();
    let output = env.bg().arg("path").assert().success().get_output().stdout.clone();
    let json = common::parse_json(&output);

    assert_eq!(json["exists"], false);
    assert!(
        json["path"]
            .as_str()
            .unwrap()
            .ends_with(common::CONFIG_FILE)
    );
    assert!(!env.config_path().exists());
}
