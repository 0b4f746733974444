use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{
    "nodes": [
        {
            "tag": "asf",
            "children": [
                {
                    "tag": "project",
                    "attrs": { "id": "p1" },
                    "children": [ { "tag": "require", "attrs": { "idref": "m1" } } ]
                },
                {
                    "tag": "project",
                    "attrs": { "id": "p2" },
                    "children": [ { "tag": "require", "attrs": { "idref": "m2" } } ]
                },
                {
                    "tag": "module",
                    "attrs": { "id": "m1", "type": "driver" },
                    "children": [ { "tag": "build", "attrs": { "value": "drivers/drv.c" } } ]
                },
                {
                    "tag": "module",
                    "attrs": { "id": "m2", "type": "service" },
                    "children": [ { "tag": "build", "attrs": { "value": "services/svc.c" } } ]
                }
            ]
        }
    ]
}"#;

fn setup_catalog(changes: &str) -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("graph.json"), SNAPSHOT).unwrap();
    fs::write(temp.path().join("infile.txt"), changes).unwrap();
    temp
}

fn run_rescope(workdir: &Path, extra_args: &[&str]) -> std::process::Output {
    cargo_bin_cmd!("rescope")
        .current_dir(workdir)
        .arg("--graph")
        .arg("graph.json")
        .args(extra_args)
        .output()
        .expect("rescope run")
}

fn lines_of(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn owned_file_emits_exact_subset() {
    let temp = setup_catalog("drivers/drv.c\n");
    let output = run_rescope(temp.path(), &[]);
    assert!(output.status.success());

    assert_eq!(lines_of(&temp.path().join("rebuild-projects.txt")), vec!["p1"]);
    assert_eq!(lines_of(&temp.path().join("rebuild-modules.txt")), vec!["m1"]);
}

#[test]
fn trigger_file_emits_rebuild_all_on_both_channels() {
    let temp = setup_catalog("asf.xml\ndrivers/drv.c\n");
    let output = run_rescope(temp.path(), &[]);
    assert!(output.status.success());

    assert_eq!(lines_of(&temp.path().join("rebuild-projects.txt")), vec!["*"]);
    assert_eq!(lines_of(&temp.path().join("rebuild-modules.txt")), vec!["*"]);
}

#[test]
fn unknown_file_emits_rebuild_all() {
    let temp = setup_catalog("unknown/file.c\n");
    let output = run_rescope(temp.path(), &[]);
    assert!(output.status.success());

    assert_eq!(lines_of(&temp.path().join("rebuild-projects.txt")), vec!["*"]);
    assert_eq!(lines_of(&temp.path().join("rebuild-modules.txt")), vec!["*"]);
}

#[test]
fn missing_change_list_is_fatal_and_emits_nothing() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("graph.json"), SNAPSHOT).unwrap();

    let output = run_rescope(temp.path(), &[]);
    assert!(!output.status.success(), "expected non-zero exit");

    assert_eq!(
        lines_of(&temp.path().join("rebuild-projects.txt")),
        vec!["nothing"]
    );
    assert_eq!(
        lines_of(&temp.path().join("rebuild-modules.txt")),
        vec!["nothing"]
    );
}

#[test]
fn custom_output_paths_are_respected() {
    let temp = setup_catalog("services/svc.c\n");
    let output = run_rescope(
        temp.path(),
        &["--projects-out", "p.txt", "--modules-out", "m.txt"],
    );
    assert!(output.status.success());

    assert_eq!(lines_of(&temp.path().join("p.txt")), vec!["p2"]);
    assert_eq!(lines_of(&temp.path().join("m.txt")), vec!["m2"]);
}

#[test]
fn json_flag_prints_run_summary_on_stdout() {
    let temp = setup_catalog("drivers/drv.c\n");
    let output = run_rescope(temp.path(), &["--json"]);
    assert!(output.status.success());

    let summary: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(summary["decision"], "subset");
    assert_eq!(summary["projects"], 1);
    assert_eq!(summary["modules"], 1);
    assert_eq!(summary["projects_out"], "rebuild-projects.txt");
}

#[test]
fn malformed_snapshot_is_reported() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("graph.json"), "not json").unwrap();
    fs::write(temp.path().join("infile.txt"), "drivers/drv.c\n").unwrap();

    let output = run_rescope(temp.path(), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        predicate::str::contains("graph.json").eval(&stderr),
        "unexpected stderr: {stderr}"
    );
}
