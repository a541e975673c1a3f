//! CLI Tests
//!
//! Exit codes and JSON replies of the built binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_iconplate-cli"));
    cmd.env_remove("ICONPLATE_RASTERIZER");
    cmd
}

fn write_svg(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("icon.svg");
    let text = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
     width="64" height="64">{}</svg>"#,
        body
    );
    fs::write(&path, text).unwrap();
    path
}

const GEAR: &str = r#"
  <g inkscape:groupmode="layer" inkscape:label="artwork:gear">
    <g inkscape:groupmode="layer">
      <rect x="0" y="0" width="16" height="16"/>
      <rect x="0" y="0" width="32" height="32"/>
    </g>
  </g>"#;

#[test]
fn targets_lists_expected_outputs() {
    let dir = tempdir().unwrap();
    let svg = write_svg(dir.path(), GEAR);

    let output = cli().arg("targets").arg(&svg).output().expect("run iconplate-cli");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let listed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        listed[0]["targets"],
        serde_json::json!(["16x16/gear.png", "32x32/gear.png"])
    );
}

#[test]
fn render_without_arguments_fails() {
    let output = cli().arg("render").output().expect("run iconplate-cli");
    assert!(!output.status.success());
}

#[test]
fn render_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let svg = write_svg(dir.path(), GEAR);

    let output = cli()
        .arg("render")
        .arg(&svg)
        .arg(dir.path().join("absent"))
        .output()
        .expect("run iconplate-cli");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn render_into_regular_file_fails() {
    let dir = tempdir().unwrap();
    let svg = write_svg(dir.path(), GEAR);
    let file = dir.path().join("out");
    fs::write(&file, b"").unwrap();

    let output = cli().arg("render").arg(&svg).arg(&file).output().expect("run iconplate-cli");

    assert_eq!(output.status.code(), Some(1));
    let reply: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reply["success"], Value::Bool(false));
}

#[test]
fn render_without_artwork_succeeds_with_nothing_rendered() {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();
    let svg = write_svg(dir.path(), "");

    let output = cli().arg("render").arg(&svg).arg(out.path()).output().expect("run iconplate-cli");

    assert!(output.status.success());
    let reply: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reply["report"]["artwork"], Value::Null);
    assert_eq!(reply["report"]["regions"], serde_json::json!([]));
    assert!(out.path().join("16x16").is_dir());
}

#[test]
fn render_with_missing_rasterizer_reports_region_failures() {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();
    let svg = write_svg(dir.path(), GEAR);

    let output = cli()
        .args(["--rasterizer", "/nonexistent/iconplate-rasterizer"])
        .arg("render")
        .arg(&svg)
        .arg(out.path())
        .output()
        .expect("run iconplate-cli");

    assert_eq!(output.status.code(), Some(2));
    let reply: Value = serde_json::from_slice(&output.stdout).unwrap();
    let regions = reply["report"]["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 2);
    assert!(regions.iter().all(|r| r["status"] == "failed"));
}

#[test]
fn render_with_malformed_document_fails() {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();
    let svg = dir.path().join("broken.svg");
    fs::write(&svg, "<svg width=\"1\"").unwrap();

    let output = cli().arg("render").arg(&svg).arg(out.path()).output().expect("run iconplate-cli");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn bad_config_is_fatal() {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();
    let svg = write_svg(dir.path(), "");
    let config = dir.path().join("render.json");
    fs::write(&config, r#"{"conventionalDirs": 5}"#).unwrap();

    let output = cli()
        .arg("--config")
        .arg(&config)
        .arg("render")
        .arg(&svg)
        .arg(out.path())
        .output()
        .expect("run iconplate-cli");

    assert_eq!(output.status.code(), Some(1));
}
