//! Integration tests for the pathtrail binary
//!
//! Every test points PATHTRAIL_DIR at its own temp directory, so the storage
//! root is `<temp>/trails`.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Helper to run pathtrail with a custom base directory
fn run_pathtrail(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pathtrail"))
        .env("PATHTRAIL_DIR", dir)
        .env_remove("PATHTRAIL_CONFIG")
        .args(args)
        .output()
        .expect("Failed to execute pathtrail")
}

/// Helper to run pathtrail with data on stdin
fn run_with_stdin(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pathtrail"))
        .env("PATHTRAIL_DIR", dir)
        .env_remove("PATHTRAIL_CONFIG")
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn pathtrail");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn test_first_run_creates_layout() {
    let temp = TempDir::new().unwrap();
    let output = run_pathtrail(temp.path(), &["session", "current"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "default");

    let root = temp.path().join("trails");
    assert!(root.join("sessions.json").exists());
    assert!(root.join("settings.json").exists());
    assert!(root.join("default").is_dir());
}

#[test]
fn test_session_lifecycle() {
    let temp = TempDir::new().unwrap();

    let output = run_pathtrail(temp.path(), &["session", "create", "speedrun"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = run_pathtrail(temp.path(), &["session", "create", "speedrun"]);
    assert!(!output.status.success());

    let output = run_pathtrail(temp.path(), &["session", "switch", "missing"]);
    assert!(!output.status.success());

    let output = run_pathtrail(temp.path(), &["session", "switch", "speedrun"]);
    assert!(output.status.success());

    let output = run_pathtrail(temp.path(), &["session", "current"]);
    assert_eq!(stdout(&output).trim(), "speedrun");

    let output = run_pathtrail(temp.path(), &["session", "list", "-o", "json"]);
    let names = json(&output);
    assert_eq!(names, serde_json::json!(["default", "speedrun"]));
}

#[test]
fn test_settings_set_and_get() {
    let temp = TempDir::new().unwrap();

    let output = run_pathtrail(temp.path(), &["settings", "set", "color", "#00ff00"]);
    assert!(output.status.success());
    let output = run_pathtrail(temp.path(), &["settings", "set", "mode", "grouped"]);
    assert!(output.status.success());
    let output = run_pathtrail(temp.path(), &["settings", "set", "transparency", "3"]);
    assert!(!output.status.success());

    let output = run_pathtrail(temp.path(), &["settings", "get", "color"]);
    assert_eq!(stdout(&output).trim(), "#00FF00");

    let settings = json(&run_pathtrail(temp.path(), &["settings", "show", "-o", "json"]));
    assert_eq!(settings["mode"], "GROUPED");
    assert_eq!(settings["transparency"], serde_json::json!(0.65));

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("trails/settings.json")).unwrap()).unwrap();
    assert_eq!(on_disk["color"], "#00FF00");
}

#[test]
fn test_record_show_roundtrip() {
    let temp = TempDir::new().unwrap();

    let output = run_with_stdin(
        temp.path(),
        &["record", "--map", "play.example.net:25565", "--domain", "nether"],
        "0 64 0\n1 64 0\n1 64 0\n2,64,1\n",
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let file = temp
        .path()
        .join("trails/default/path_data_play.example.net_25565_minecraft_the_nether.bin");
    assert_eq!(fs::metadata(&file).unwrap().len(), 3 * 12);

    let shown = json(&run_pathtrail(
        temp.path(),
        &["show", "--map", "play.example.net:25565", "--domain", "nether", "-o", "json"],
    ));
    assert_eq!(
        shown[0]["points"],
        serde_json::json!([{"x":0,"y":64,"z":0},{"x":1,"y":64,"z":0},{"x":2,"y":64,"z":1}])
    );
}

#[test]
fn test_record_appends_to_existing_trail() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("points.txt");

    fs::write(&input, "0 0 0\n1 0 0\n").unwrap();
    let args = ["record", "--map", "world", "--input", input.to_str().unwrap()];
    assert!(run_pathtrail(temp.path(), &args).status.success());

    fs::write(&input, "5 0 0\n").unwrap();
    assert!(run_pathtrail(temp.path(), &args).status.success());

    let shown = json(&run_pathtrail(
        temp.path(),
        &["show", "--map", "world", "--domain", "overworld", "-o", "json"],
    ));
    assert_eq!(shown[0]["points"].as_array().unwrap().len(), 3);
}

#[test]
fn test_render_produces_geometry() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("points.txt");
    fs::write(&input, "0 64 0\n1 64 0\n2 64 0\n30 64 0\n").unwrap();
    assert!(
        run_pathtrail(temp.path(), &["record", "--map", "world", "--input", input.to_str().unwrap()])
            .status
            .success()
    );
    assert!(run_pathtrail(temp.path(), &["settings", "set", "subdivisions", "2"]).status.success());

    let output = run_pathtrail(
        temp.path(),
        &["render", "--map", "world", "--camera", "0,80,-5", "-o", "json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let frame = json(&output);
    assert_eq!(frame["quads"].as_array().unwrap().len(), 4);
    assert_eq!(frame["cubes"].as_array().unwrap().len(), 1);
    assert_eq!(frame["quads"][0]["vertices"].as_array().unwrap().len(), 4);
}

#[test]
fn test_legacy_trails_migrated_on_open() {
    let temp = TempDir::new().unwrap();
    let session_dir = temp.path().join("trails/default");
    fs::create_dir_all(&session_dir).unwrap();
    let legacy = session_dir.join("path_data_world_minecraft_overworld.json");
    fs::write(&legacy, r#"[{"x":1,"y":2,"z":3},{"x":4,"y":5},{"x":7,"y":8,"z":9}]"#).unwrap();

    let output = run_pathtrail(temp.path(), &["migrate", "--dry-run"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("[dry-run]"));
    assert!(legacy.exists());

    let shown = json(&run_pathtrail(
        temp.path(),
        &["show", "--map", "world", "--domain", "overworld", "-o", "json"],
    ));
    assert_eq!(shown[0]["points"], serde_json::json!([{"x":1,"y":2,"z":3},{"x":7,"y":8,"z":9}]));
    assert!(!legacy.exists());
    assert!(session_dir.join("path_data_world_minecraft_overworld.bin").exists());

    let output = run_pathtrail(temp.path(), &["migrate"]);
    assert!(stdout(&output).contains("Nothing to migrate"));
}

#[test]
fn test_bad_mode_in_settings_file_is_tolerated() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("trails");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("settings.json"), r#"{"mode": "SPIRAL", "renderDistance": 16}"#).unwrap();

    let settings = json(&run_pathtrail(temp.path(), &["settings", "show", "-o", "json"]));
    assert_eq!(settings["mode"], "DEFAULT");
    assert_eq!(settings["renderDistance"], 16);
}

#[test]
fn test_status_json() {
    let temp = TempDir::new().unwrap();
    let output = run_with_stdin(temp.path(), &["record", "--map", "world", "--domain", "end"], "0 0 0\n");
    assert!(output.status.success());

    let status = json(&run_pathtrail(temp.path(), &["status", "-o", "json"]));
    assert_eq!(status["sessions"][0]["name"], "default");
    assert_eq!(status["sessions"][0]["current"], true);
    assert_eq!(status["sessions"][0]["total_points"], 1);
}
