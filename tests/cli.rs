use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

const HASH: &str = "ooNx1eTQZ6xC9pRfsgPUbt8aWFn9fZhtYNtgbYnGoVbHw38R3kD";

fn protogenoi() -> Command {
    Command::cargo_bin("protogenoi").unwrap()
}

#[test]
fn renders_a_hash_into_the_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    protogenoi()
        .args(&["--size", "32x32", "--iterations", "5000", "--hash", HASH])
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(HASH).and(predicate::str::contains("bilinear")));

    assert!(dir.path().join(format!("{}.png", HASH)).exists());
    let features = fs::read_to_string(dir.path().join(format!("{}.json", HASH))).unwrap();
    assert!(features.contains("\"Render\": \"bilinear\""));
    assert!(features.contains("\"Colour\""));
    assert!(features.contains("\"RenormaliseDelta\""));
}

#[test]
fn the_same_hash_writes_the_same_image_twice() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    for dir in &[&first, &second] {
        protogenoi()
            .args(&["-s", "24x24", "-i", "4000", "-H", HASH, "-o"])
            .arg(dir.path())
            .assert()
            .success();
    }
    let name = format!("{}.png", HASH);
    assert_eq!(
        fs::read(first.path().join(&name)).unwrap(),
        fs::read(second.path().join(&name)).unwrap()
    );
}

#[test]
fn renders_several_fresh_hashes() {
    let dir = tempfile::tempdir().unwrap();
    protogenoi()
        .args(&["-s", "16x16", "-i", "2000", "-n", "3", "-t", "1", "-p", "explore", "-o"])
        .arg(dir.path())
        .assert()
        .success();
    let pngs = fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .map(|e| e.path().extension().map_or(false, |x| x == "png"))
                .unwrap_or(false)
        })
        .count();
    assert_eq!(pngs, 3);
}

#[test]
fn prints_the_sketch_configuration() {
    protogenoi()
        .args(&["--print-config", "--preset", "sketch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"corners\"").and(predicate::str::contains("\"fixed\"")));
}

#[test]
fn reads_a_configuration_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tiny.json");
    let output = Command::cargo_bin("protogenoi")
        .unwrap()
        .args(&["--print-config", "--preset", "sketch", "--size", "20x10", "--iterations", "3000"])
        .output()
        .unwrap();
    fs::write(&config, &output.stdout).unwrap();

    protogenoi()
        .arg("--config")
        .arg(&config)
        .args(&["-H", HASH, "-o"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("corners\teros\tfalse"));
}

#[test]
fn refuses_a_malformed_hash() {
    let dir = tempfile::tempdir().unwrap();
    protogenoi()
        .args(&["-s", "16x16", "-i", "1000", "-H", "oo0OIl", "-o"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid hash"));
}

#[test]
fn refuses_an_empty_canvas() {
    let dir = tempfile::tempdir().unwrap();
    protogenoi()
        .args(&["-s", "0x16", "-o"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-zero dimensions"));
}
