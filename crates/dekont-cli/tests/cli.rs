use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dekont() -> Command {
    let mut cmd = Command::cargo_bin("dekont").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Temp dir holding an empty config file, so the user's config is never read.
fn workspace() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    let config = config.to_string_lossy().into_owned();
    (dir, config)
}

#[test]
fn rules_lists_table_and_keys() {
    dekont()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("ZIRAAT_FAST"))
        .stdout(predicate::str::contains("UPT"))
        .stdout(predicate::str::contains("KUVEYT_TURK_AR"));
}

#[test]
fn check_missing_file_fails() {
    let (dir, config) = workspace();
    dekont()
        .args(["--config", &config, "check"])
        .arg(dir.path().join("nope.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn check_unreadable_pdf_reports_unknown() {
    let (dir, config) = workspace();
    let input = dir.path().join("broken.pdf");
    fs::write(&input, b"this is not a pdf").unwrap();

    dekont()
        .args(["--config", &config, "check"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\": \"UNKNOWN\""))
        .stdout(predicate::str::contains("\"tr_status\": \"unknown\""))
        .stdout(predicate::str::contains("\"error\""));
}

#[test]
fn check_csv_output_to_file() {
    let (dir, config) = workspace();
    let input = dir.path().join("broken.pdf");
    let output = dir.path().join("out.csv");
    fs::write(&input, b"%PDF-1.4 truncated").unwrap();

    dekont()
        .args(["--config", &config, "check", "--format", "csv", "--output"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("file,key,bank,variant,method,tr_status"));
    assert!(csv.contains(",UNKNOWN,Unknown,,none,unknown,"));
}

#[test]
fn detect_prints_classification() {
    let (dir, config) = workspace();
    let input = dir.path().join("blank.pdf");
    fs::write(&input, b"").unwrap();

    dekont()
        .args(["--config", &config, "detect"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"method\": \"none\""));
}

#[test]
fn batch_without_matches_fails() {
    let (dir, config) = workspace();
    let pattern = dir.path().join("*.pdf");

    dekont()
        .args(["--config", &config, "batch"])
        .arg(pattern.to_string_lossy().as_ref())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn batch_writes_reports_and_summary() {
    let (dir, config) = workspace();
    let inbox = dir.path().join("inbox");
    let out = dir.path().join("out");
    fs::create_dir_all(&inbox).unwrap();
    fs::write(inbox.join("a.pdf"), b"junk").unwrap();
    fs::write(inbox.join("b.PDF"), b"junk").unwrap();
    fs::write(inbox.join("notes.txt"), b"ignored").unwrap();

    dekont()
        .args(["--config", &config, "batch", "--summary", "--output-dir"])
        .arg(&out)
        .arg(inbox.join("*").to_string_lossy().as_ref())
        .assert()
        .success();

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());
    assert!(!out.join("notes.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
}

#[test]
fn config_init_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("config.json");
    let config = config.to_string_lossy().into_owned();

    dekont()
        .args(["--config", &config, "config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    dekont()
        .args(["--config", &config, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    dekont()
        .args(["--config", &config, "config", "get", "ocr.dpi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("350"));

    dekont()
        .args(["--config", &config, "config", "set", "ocr.timeout_secs", "30"])
        .assert()
        .success();

    dekont()
        .args(["--config", &config, "config", "get", "ocr.timeout_secs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30"));
}

#[test]
fn config_rejects_unknown_keys_and_bad_values() {
    let (_dir, config) = workspace();

    dekont()
        .args(["--config", &config, "config", "get", "ocr.colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));

    dekont()
        .args(["--config", &config, "config", "set", "pdf.max_pages", "many"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn config_path_points_at_given_file() {
    let (_dir, config) = workspace();
    dekont()
        .args(["--config", &config, "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(config.as_str()))
        .stdout(predicate::str::contains("exists"));
}
