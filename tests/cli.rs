//! End-to-end CLI tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn write_fixture(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn writes_xlsx_report_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let df1 = write_fixture(dir.path(), "old.csv", "id,name,score\n1,alice,10\n2,bob,20\n");
    let df2 = write_fixture(dir.path(), "new.csv", "id,name,score\n1,alice,11\n3,carol,30\n");

    Command::cargo_bin("tabularcompare")
        .unwrap()
        .arg(&df1)
        .arg(&df2)
        .args(["-c", "id"])
        .args(["-o", dir.path().to_str().unwrap()])
        .assert()
        .success();

    assert!(dir.path().join("df1_to_df2_comparison_report.xlsx").exists());
}

#[test]
fn txt_and_html_flags_emit_extra_reports() {
    let dir = tempfile::tempdir().unwrap();
    let df1 = write_fixture(dir.path(), "a.csv", "id,v\n1,x\n");
    let df2 = write_fixture(dir.path(), "b.csv", "id,v\n1,y\n");

    Command::cargo_bin("tabularcompare")
        .unwrap()
        .arg(&df1)
        .arg(&df2)
        .args(["-c", "id"])
        .args(["--n1", "left", "--n2", "right"])
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["--txt", "--html"])
        .assert()
        .success();

    let txt = dir.path().join("left_to_right_comparison_report.txt");
    let html = dir.path().join("left_to_right_comparison_report.html");
    assert!(txt.exists());
    assert!(html.exists());

    let summary = fs::read_to_string(txt).unwrap();
    assert!(summary.contains("Row Summary"));
    assert!(summary.contains("Matched on: id"));
    assert!(fs::read_to_string(html)
        .unwrap()
        .contains("{x} --&gt; {y}"));
}

#[test]
fn missing_join_column_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let df1 = write_fixture(dir.path(), "a.csv", "id,v\n1,x\n");
    let df2 = write_fixture(dir.path(), "b.csv", "id,v\n1,y\n");

    Command::cargo_bin("tabularcompare")
        .unwrap()
        .arg(&df1)
        .arg(&df2)
        .args(["-c", "missing_key"])
        .args(["-o", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing_key"));
}

#[test]
fn unsupported_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let df1 = write_fixture(dir.path(), "a.parquet", "not parquet");
    let df2 = write_fixture(dir.path(), "b.csv", "id\n1\n");

    Command::cargo_bin("tabularcompare")
        .unwrap()
        .arg(&df1)
        .arg(&df2)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn help_spells_out_two_dash_shorthand_flags() {
    Command::cargo_bin("tabularcompare")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("two dashes"))
        .stdout(predicate::str::contains("--ic"));
}

#[test]
fn json_and_csv_inputs_compare() {
    let dir = tempfile::tempdir().unwrap();
    let df1 = write_fixture(dir.path(), "a.json", r#"[{"id": 1, "v": "x"}]"#);
    let df2 = write_fixture(dir.path(), "b.csv", "id,v\n1,y\n");

    Command::cargo_bin("tabularcompare")
        .unwrap()
        .arg(&df1)
        .arg(&df2)
        .args(["-c", "id"])
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["--only_deltas"])
        .assert()
        .success();

    assert!(dir.path().join("df1_to_df2_comparison_report.xlsx").exists());
}
