use predicates::prelude::*;
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const LEVEL_JSON: &str = r#"{
    "name": "Front Lawn",
    "music": "Cerebrawl",
    "sun": 150,
    "stripeCol": 5,
    "lfValue": [0, 0, 0, 0, 0, 0],
    "selectedZombies": ["oZombie", "oConeheadZombie"],
    "plants": [
        {"plantName": "oPeashooter", "plantRow": 0, "plantCol": 0, "zIndex": 1},
        {"plantName": "oSunflower", "plantRow": 1, "plantCol": 1, "zIndex": 2}
    ]
}"#;

struct Sample {
    dir: TempDir,
    level: PathBuf,
}

fn izl() -> Result<assert_cmd::Command, Box<dyn Error>> {
    let mut cmd = assert_cmd::Command::cargo_bin("izl")?;
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

fn packed_sample() -> Result<Sample, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let json_path = dir.path().join("level.json");
    let level = dir.path().join("level.izl3");
    fs::write(&json_path, LEVEL_JSON)?;

    izl()?
        .args([
            "pack",
            json_path.to_str().unwrap(),
            "-o",
            level.to_str().unwrap(),
        ])
        .assert()
        .success();

    Ok(Sample { dir, level })
}

#[test]
fn pack_writes_magic_prefixed_file() -> Result<(), Box<dyn Error>> {
    let sample = packed_sample()?;
    let bytes = fs::read(&sample.level)?;
    assert_eq!(&bytes[..4], b"IZL3");
    Ok(())
}

#[test]
fn inspect_summary_shows_fields() -> Result<(), Box<dyn Error>> {
    let sample = packed_sample()?;
    izl()?
        .args(["inspect", sample.level.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Front Lawn"))
        .stdout(predicate::str::contains("v3 (binary)"))
        .stdout(predicate::str::contains("Plants:      2"))
        .stdout(predicate::str::contains("Publishable: yes"));
    Ok(())
}

#[test]
fn inspect_json_output_parses() -> Result<(), Box<dyn Error>> {
    let sample = packed_sample()?;
    let output = izl()?
        .args(["inspect", sample.level.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["version"], "V3");
    assert_eq!(value["valid"], true);
    assert_eq!(value["level"]["sun"], 150);
    assert_eq!(value["level"]["plants"][0]["plantName"], "oPeashooter");
    Ok(())
}

#[test]
fn convert_to_text_and_back() -> Result<(), Box<dyn Error>> {
    let sample = packed_sample()?;
    let text_path = sample.dir.path().join("level.txt");
    let back_path = sample.dir.path().join("back.izl3");

    izl()?
        .args([
            "convert",
            sample.level.to_str().unwrap(),
            "-o",
            text_path.to_str().unwrap(),
            "--text",
        ])
        .assert()
        .success();
    assert!(fs::read_to_string(&text_path)?.starts_with('|'));

    izl()?
        .args(["inspect", text_path.to_str().unwrap(), "--text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v3 (text)"));

    izl()?
        .args([
            "convert",
            text_path.to_str().unwrap(),
            "-o",
            back_path.to_str().unwrap(),
        ])
        .assert()
        .success();
    assert_eq!(fs::read(&back_path)?, fs::read(&sample.level)?);
    Ok(())
}

#[test]
fn validate_passes_good_files() -> Result<(), Box<dyn Error>> {
    let sample = packed_sample()?;
    izl()?
        .args(["validate", sample.level.to_str().unwrap(), "--progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
    Ok(())
}

#[test]
fn validate_fails_on_bad_files() -> Result<(), Box<dyn Error>> {
    let sample = packed_sample()?;
    let garbage = sample.dir.path().join("garbage.bin");
    fs::write(&garbage, "not-a-real-format")?;

    let output = izl()?
        .args([
            "validate",
            sample.level.to_str().unwrap(),
            garbage.to_str().unwrap(),
            "--format",
            "json",
        ])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let reports: Value = serde_json::from_slice(&output)?;
    assert_eq!(reports[0]["status"], "valid");
    assert_eq!(reports[1]["status"], "failed");
    Ok(())
}

#[test]
fn validate_applies_rules_file() -> Result<(), Box<dyn Error>> {
    let sample = packed_sample()?;
    let rules = sample.dir.path().join("rules.toml");
    fs::write(&rules, "max_sun = 100\n")?;

    izl()?
        .args([
            "validate",
            sample.level.to_str().unwrap(),
            "--rules",
            rules.to_str().unwrap(),
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Sun value exceeds 100"));
    Ok(())
}

#[test]
fn inspect_text_rejects_unknown_format() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("junk.txt");
    fs::write(&path, "not-a-real-format")?;

    izl()?
        .args(["inspect", path.to_str().unwrap(), "--text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown level data format"));
    Ok(())
}

#[test]
fn pack_rejects_non_object_json() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("array.json");
    fs::write(&input, "[1, 2, 3]")?;

    izl()?
        .args([
            "pack",
            input.to_str().unwrap(),
            "-o",
            dir.path().join("out.izl3").to_str().unwrap(),
        ])
        .assert()
        .failure();
    Ok(())
}
