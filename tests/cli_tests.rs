// End-to-end tests for the pplstat binary
//
// Each test writes a JSON document of condition values into a temp dir and
// runs the binary against it.

use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const ATTRIBUTE_EFFECT: &str = r#"{
    "test_group_with_attribute": [42.0, 38.5, 51.0, 47.5, 39.0, 44.0, 49.5, 40.5, 45.0, 43.0],
    "test_group_no_attribute":   [35.0, 33.0, 44.5, 40.0, 34.5, 37.0, 42.0, 35.5, 38.0, 36.0],
    "norm_group_with_attribute": [30.0, 28.5, 35.0, 33.5, 29.0, 31.5, 34.0, 27.5, 32.0, 30.5],
    "norm_group_no_attribute":   [29.5, 29.0, 34.0, 33.0, 29.5, 30.5, 34.5, 27.0, 31.0, 30.5]
}"#;

fn write_input(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("ppl.json");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_text_report() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, ATTRIBUTE_EFFECT);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pplstat");
    cmd.arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Perplexity Group Comparison ==="))
        .stdout(predicate::str::contains("Test group pairs: 10"))
        .stdout(predicate::str::contains("Welch t-test"))
        .stdout(predicate::str::contains("Result: significant at alpha = 0.05"));
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, ATTRIBUTE_EFFECT);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pplstat");
    let output = cmd.arg("--format").arg("json").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["significance_level"], 0.05);
    assert_eq!(json["comparison"]["test_pairs"], 10);
    assert_eq!(json["comparison"]["significant"], true);
    assert!(json["comparison"]["ttest"]["pvalue"].as_f64().unwrap() < 0.05);
    assert!(json.get("plot").is_none());
}

#[test]
fn test_non_normal_differences_warn_on_stderr() {
    let dir = TempDir::new().unwrap();
    // Test-group differences: nine zeros and one spike (W ~ 0.37, p << 0.05)
    let input = write_input(
        &dir,
        r#"{
            "test_group_with_attribute": [10, 10, 10, 10, 10, 10, 10, 10, 10, 60],
            "test_group_no_attribute":   [10, 10, 10, 10, 10, 10, 10, 10, 10, 10],
            "norm_group_with_attribute": [11, 12, 13, 14, 15, 16, 17, 18, 19, 20],
            "norm_group_no_attribute":   [10, 10, 10, 10, 10, 10, 10, 10, 10, 10]
        }"#,
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pplstat");
    cmd.env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("t-test result may be unreliable"))
        .stderr(predicate::str::contains("ShapiroResult(").count(2))
        .stdout(predicate::str::contains("may be unreliable"));
}

#[test]
fn test_token_losses_are_reduced() {
    let dir = TempDir::new().unwrap();
    // ln(2) losses give perplexity 2, ln(3) losses give perplexity 3
    let input = write_input(
        &dir,
        r#"{
            "test_group_with_attribute": [[0.6931, 0.6931], [1.0986], [1.0986, 1.0986]],
            "test_group_no_attribute": [2.0, 2.5, 2.25],
            "norm_group_with_attribute": [3.0, 3.5, 2.0],
            "norm_group_no_attribute": [3.0, 3.0, 2.5]
        }"#,
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pplstat");
    cmd.arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Test group pairs: 3"));
}

#[test]
fn test_missing_group_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        r#"{
            "test_group_with_attribute": [1.0, 2.0, 3.0],
            "test_group_no_attribute": [1.0, 2.0, 3.0],
            "norm_group_with_attribute": [1.0, 2.0, 3.0]
        }"#,
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pplstat");
    cmd.arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("norm_group_no_attribute"));
}

#[test]
fn test_length_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        r#"{
            "test_group_with_attribute": [1.0, 2.0, 3.0, 4.0, 5.0],
            "test_group_no_attribute": [1.0, 2.0, 3.0, 4.0],
            "norm_group_with_attribute": [1.0, 2.0, 3.0, 4.0],
            "norm_group_no_attribute": [1.0, 2.0, 3.0, 4.0]
        }"#,
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pplstat");
    cmd.arg(&input).assert().failure();
}

#[test]
fn test_unreadable_input_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pplstat");
    cmd.arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_unknown_theme_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, ATTRIBUTE_EFFECT);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pplstat");
    cmd.arg("--theme")
        .arg("neon")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("neon"));
}

#[test]
#[ignore] // Requires system fonts for axis labels
fn test_plot_saved_as_svg() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, ATTRIBUTE_EFFECT);
    let plot = dir.path().join("violins.svg");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pplstat");
    cmd.arg("--plot")
        .arg(&plot)
        .arg("--theme")
        .arg("whitegrid")
        .arg("--fill")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Plot saved to"));

    let svg = std::fs::read_to_string(&plot).unwrap();
    assert!(svg.contains("<svg"));
}
