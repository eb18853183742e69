use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const PROFILE_TOML: &str = r#"
age = 30
education = "bachelor"
canadianWorkExperience = "none"

[firstLanguage]
speaking = 9
listening = 9
reading = 9
writing = 9
"#;

fn crs(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("crs-advisor").expect("binary builds");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("CRS_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn scores_a_single_profile_as_json() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("me.toml"), PROFILE_TOML).expect("write profile");

    let output = crs(dir.path())
        .args(["score", "--path", "me.toml", "--json"])
        .output()
        .expect("runs");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(report["tables_version"], "2025-03");
    assert_eq!(report["profiles"][0]["score"], 399);
    assert_eq!(report["profiles"][0]["breakdown"]["core_human_capital"], 349);
    assert_eq!(report["profiles"][0]["standing"], "needs_improvement");
    assert!(report["profiles"][0]["analysis"]["suggestions"].is_array());
}

#[test]
fn human_output_lists_categories_and_advice() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("me.toml"), PROFILE_TOML).expect("write profile");

    crs(dir.path())
        .args(["score", "--path", "me.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CRS Score: 399"))
        .stdout(predicate::str::contains("Core/Human Capital"))
        .stdout(predicate::str::contains("target 500: 101 points short"))
        .stdout(predicate::str::contains("Apply for a Provincial Nominee Program"))
        .stdout(predicate::str::contains("exit: OK"));
}

#[test]
fn no_advice_skips_suggestions() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("me.toml"), PROFILE_TOML).expect("write profile");

    crs(dir.path())
        .args(["score", "--path", "me.toml", "--no-advice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Improvements").not());
}

#[test]
fn fail_below_target_sets_exit_code() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("me.toml"), PROFILE_TOML).expect("write profile");
    fs::write(
        dir.path().join("crs-advisor.toml"),
        "[general]\nfail_below_target = true\n",
    )
    .expect("write config");

    crs(dir.path())
        .args(["score", "--path", "me.toml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("below target_score 500"));
}

#[test]
fn batch_run_reports_invalid_profiles() {
    let dir = tempdir().expect("temp dir");
    let profiles = dir.path().join("profiles");
    fs::create_dir(&profiles).expect("mkdir");
    fs::write(profiles.join("a.toml"), PROFILE_TOML).expect("write profile");
    fs::write(
        profiles.join("b.toml"),
        PROFILE_TOML.replace("bachelor", "doctorate"),
    )
    .expect("write profile");

    crs(dir.path())
        .args(["score", "--path", "profiles"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("a.toml"))
        .stdout(predicate::str::contains("[INVALID] b.toml"))
        .stdout(predicate::str::contains("1 profile(s) failed validation"));
}

#[test]
fn directory_run_ignores_config_and_table_files() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("me.toml"), PROFILE_TOML).expect("write profile");
    let grid = crs(dir.path())
        .args(["tables", "show"])
        .output()
        .expect("runs");
    fs::write(dir.path().join("grid.toml"), &grid.stdout).expect("write tables");
    fs::write(
        dir.path().join("crs-advisor.toml"),
        "[tables]\npath = \"grid.toml\"\n",
    )
    .expect("write config");

    crs(dir.path())
        .args(["score", "--path", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("me.toml"))
        .stdout(predicate::str::contains("INVALID").not());
}

#[test]
fn score_requires_a_path() {
    let dir = tempdir().expect("temp dir");
    crs(dir.path())
        .arg("score")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--path"));
}

#[test]
fn advise_emits_ranked_suggestions() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join("me.toml"), PROFILE_TOML).expect("write profile");

    let output = crs(dir.path())
        .args(["advise", "--path", "me.toml", "--json"])
        .output()
        .expect("runs");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    let profile = &report["profiles"][0];
    assert!(profile.get("breakdown").is_none());
    let ids: Vec<&str> = profile["analysis"]["suggestions"]
        .as_array()
        .expect("suggestions")
        .iter()
        .filter_map(|suggestion| suggestion["id"].as_str())
        .collect();
    assert!(ids.contains(&"apply-pnp"));
    assert!(ids.contains(&"learn-french"));
    assert_eq!(profile["analysis"]["max_possible_score"], 1200);
}

#[test]
fn missing_path_is_fatal() {
    let dir = tempdir().expect("temp dir");
    crs(dir.path())
        .args(["score", "--path", "nowhere.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn init_writes_config_once() {
    let dir = tempdir().expect("temp dir");
    crs(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));
    assert!(dir.path().join("crs-advisor.toml").is_file());

    crs(dir.path())
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("refusing to overwrite"));
}

#[test]
fn converts_language_scores() {
    let dir = tempdir().expect("temp dir");
    crs(dir.path())
        .args([
            "language",
            "convert",
            "--test",
            "ielts",
            "--speaking",
            "7.0",
            "--listening",
            "8.0",
            "--reading",
            "7.0",
            "--writing",
            "7.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("listening"))
        .stdout(predicate::str::contains("lowest: CLB 7"));
}

#[test]
fn rejects_malformed_language_score() {
    let dir = tempdir().expect("temp dir");
    crs(dir.path())
        .args([
            "language",
            "convert",
            "--test",
            "tef",
            "--speaking",
            "abc",
            "--listening",
            "249",
            "--reading",
            "207",
            "--writing",
            "310",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid tef score"));
}

#[test]
fn tables_round_trip_through_show_and_validate() {
    let dir = tempdir().expect("temp dir");
    let output = crs(dir.path())
        .args(["tables", "show"])
        .output()
        .expect("runs");
    assert!(output.status.success());
    fs::write(dir.path().join("tables.toml"), &output.stdout).expect("write tables");

    crs(dir.path())
        .args(["tables", "validate", "--path", "tables.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid point tables 2025-03"));

    let broken = String::from_utf8(output.stdout)
        .expect("utf8")
        .replace("total = 1200", "total = 1300");
    fs::write(dir.path().join("broken.toml"), broken).expect("write tables");
    crs(dir.path())
        .args(["tables", "validate", "--path", "broken.toml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid"));
}
