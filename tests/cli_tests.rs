mod common;

use assert_cmd::Command;
use common::fixture_path;
use serde_json::Value;

fn slimsgraph() -> Command {
    Command::new(env!("CARGO_BIN_EXE_slimsgraph"))
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("json output")
}

#[test]
fn test_cli_exits_with_success_on_help() {
    let output = slimsgraph().arg("--help").assert().success().get_output().stdout.clone();
    assert!(String::from_utf8_lossy(&output).contains("Usage: slimsgraph"));
}

#[test]
fn test_cli_status_command() {
    let status = stdout_json(slimsgraph().args(["--command", "status"]));
    assert_eq!(status["status"], "OK");
    assert_eq!(status["backend"], "memory");
    assert_eq!(status["service_version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_cli_prints_ecephys_sessions_newest_first() {
    let snapshot = fixture_path("ecephys.json");
    let sessions = stdout_json(slimsgraph().args([
        "--snapshot",
        snapshot.to_str().unwrap(),
        "--command",
        "ecephys",
    ]));
    let sessions = sessions.as_array().expect("array");
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["subject_id"], "750108");
    assert_eq!(
        sessions[0]["session_name"],
        "ecephys_750108_2024-12-23_14-51-45"
    );
    assert_eq!(sessions[0]["stream_modules"][0]["dye"], "DiI");
    assert_eq!(sessions[1]["subject_id"], "750109");
}

#[test]
fn test_cli_water_restriction_from_snapshot() {
    let snapshot = fixture_path("water_restriction.json");
    let events = stdout_json(slimsgraph().args([
        "--snapshot",
        snapshot.to_str().unwrap(),
        "water-restriction",
        "--subject-id",
        "762287",
    ]));
    let events = events.as_array().expect("array");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["subject_id"], "762287");
    assert_eq!(events[0]["assigned_by"], "person.name");
}

#[test]
fn test_cli_instrument_on_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("records.db");
    let snapshot = fixture_path("instrument.json");
    let instruments = stdout_json(slimsgraph().args([
        "--backend",
        "sqlite",
        "--db",
        db.to_str().unwrap(),
        "--snapshot",
        snapshot.to_str().unwrap(),
        "--command",
        "instrument",
        "--input-id",
        "SmartSPIM",
        "--partial-match",
    ]));
    assert_eq!(instruments.as_array().map(Vec::len), Some(1));
    assert!(db.exists());
}

#[test]
fn test_cli_rejects_unknown_flag_and_backend() {
    slimsgraph().arg("--frobnicate").assert().code(2);
    slimsgraph().args(["--backend", "postgres"]).assert().code(2);
}

#[test]
fn test_cli_command_failures_exit_with_one() {
    slimsgraph()
        .args(["ecephys", "--subject-id", ""])
        .assert()
        .code(1);
    slimsgraph().args(["--command", "teleport"]).assert().code(1);
}
