#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 40 rows, 10 defective, with a loc effort column.
fn write_dataset(dir: &Path) {
    let mut csv = String::from("loc,wmc,defective\n");
    for i in 0..40 {
        let defective = i % 4 == 0;
        let loc = if defective { 300 + i } else { 20 + i % 9 };
        let wmc = if defective { 15 } else { 3 };
        csv.push_str(&format!(
            "{loc},{wmc},{}\n",
            if defective { "yes" } else { "no" }
        ));
    }
    fs::write(dir.join("ant.csv"), csv).unwrap();
}

fn write_config(dir: &Path, provider: &str) {
    let yaml = format!(
        r#"version: 1
cv:
  runs: 2
  folds: 5
  seed: 3
datasets:
  - path: ant.csv
    class_column: defective
    positive_label: "yes"
    effort_column: loc
models:
  - provider: {provider}
output:
  dir: out
"#
    );
    fs::write(dir.join("foldwise.yaml"), yaml).unwrap();
}

#[test]
fn run_writes_csv_and_json_reports() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    write_config(dir.path(), "naive_bayes");

    Command::cargo_bin("foldwise")
        .unwrap()
        .args(["run", "--quiet", "--config"])
        .arg(dir.path().join("foldwise.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("naive_bayes"))
        .stdout(predicate::str::contains("1 evaluations written"));

    let out = dir.path().join("out");
    let results = fs::read_to_string(out.join("results.csv")).unwrap();
    assert!(results.starts_with("Dataset,Classifier,Accuracy,Precision,Recall,F1,Kappa,AUC,NPofB20\n"));
    assert!(results.contains("ant,naive_bayes,"));

    let folds = fs::read_to_string(out.join("fold_metrics.csv")).unwrap();
    assert_eq!(folds.lines().count(), 1 + 10);

    let summary: Value =
        serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["config"]["runs"], 2);
    assert_eq!(summary["reports"][0]["per_fold"].as_array().unwrap().len(), 10);
}

#[test]
fn flags_override_config() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    write_config(dir.path(), "knn");

    Command::cargo_bin("foldwise")
        .unwrap()
        .args(["run", "--quiet", "--runs", "1", "--folds", "2", "--ranking-mode", "count", "--config"])
        .arg(dir.path().join("foldwise.yaml"))
        .assert()
        .success();

    let folds = fs::read_to_string(dir.path().join("out/fold_metrics.csv")).unwrap();
    assert_eq!(folds.lines().count(), 1 + 2);
}

#[test]
fn unknown_provider_exits_with_config_error() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    write_config(dir.path(), "random_forest");

    Command::cargo_bin("foldwise")
        .unwrap()
        .args(["validate", "--config"])
        .arg(dir.path().join("foldwise.yaml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown model provider 'random_forest'"));
}

#[test]
fn too_many_folds_for_minority_class_is_config_error() {
    let dir = tempdir().unwrap();
    write_dataset(dir.path());
    write_config(dir.path(), "knn");

    Command::cargo_bin("foldwise")
        .unwrap()
        .args(["run", "--quiet", "--folds", "20", "--config"])
        .arg(dir.path().join("foldwise.yaml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("minority class has 10"));
}

#[test]
fn unknown_ranking_mode_is_rejected() {
    Command::cargo_bin("foldwise")
        .unwrap()
        .args(["run", "--ranking-mode", "lines"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown ranking mode"));
}

#[test]
fn init_writes_sample_then_skips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foldwise.yaml");

    Command::cargo_bin("foldwise")
        .unwrap()
        .args(["init", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(fs::read_to_string(&path).unwrap().contains("ranking_mode: effort"));

    Command::cargo_bin("foldwise")
        .unwrap()
        .args(["init", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped"));
}
