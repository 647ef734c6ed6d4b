//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary and verify its JSON output. Every run
//! points `--config` at a missing file so defaults apply.

use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let missing = std::env::temp_dir().join("sirru-cli-tests-missing/config.toml");
    let output = Command::new(env!("CARGO_BIN_EXE_sirru-cli"))
        .arg("--config")
        .arg(&missing)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json_lines(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect()
}

fn count_type(lines: &[Value], ty: &str) -> usize {
    lines.iter().filter(|l| l["type"] == ty).count()
}

#[test]
fn test_breathe_runs_to_completion() {
    let (code, stdout, _) = run_cli(&["breathe", "--set", "breathing.phase_duration_secs=1"]);
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(lines[0]["type"], "session_started");
    assert_eq!(count_type(&lines, "cycle_completed"), 3);

    let complete = lines
        .iter()
        .find(|l| l["type"] == "session_complete")
        .expect("session completes");
    assert_eq!(complete["completed_cycles"], 3);
    assert_eq!(complete["elapsed_secs"], 12);

    let first_change = lines
        .iter()
        .find(|l| l["type"] == "phase_changed")
        .unwrap();
    assert_eq!(first_change["to"], "hold_after_inhale");
    assert_eq!(first_change["prompt"], "Hold...");
    assert_eq!(lines[0]["prompt"], "Inhale...");

    let last = lines.last().unwrap();
    assert_eq!(last["type"], "breathing_snapshot");
    assert_eq!(last["phase"], "idle");
    assert_eq!(last["prompt"], "Ready");
    assert_eq!(last["elapsed_label"], "0:12");
}

#[test]
fn test_breathe_stop_after_keeps_counters() {
    let (code, stdout, _) = run_cli(&["breathe", "--stop-after", "20"]);
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(count_type(&lines, "session_complete"), 0);
    assert_eq!(count_type(&lines, "session_stopped"), 1);
    let last = lines.last().unwrap();
    assert_eq!(last["completed_cycles"], 1);
    assert_eq!(last["elapsed_secs"], 20);
}

#[test]
fn test_breathe_rejects_zero_cycles() {
    let (code, _, stderr) = run_cli(&["breathe", "--cycles", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("target_cycles"));
}

#[test]
fn test_faru_plays_whole_script() {
    let (code, stdout, _) = run_cli(&["faru", "--set", "ambience.seed=7"]);
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(lines[0]["type"], "header");
    assert_eq!(count_type(&lines, "message_revealed"), 9);
    assert_eq!(count_type(&lines, "scroll_to_latest"), 9);
    assert!(lines.iter().any(|l| l["type"] == "script_finished"));

    let first = lines
        .iter()
        .find(|l| l["type"] == "message_revealed")
        .unwrap();
    assert_eq!(first["message"]["speaker_id"], "koamas");
    assert_eq!(first["speaker_name"], "Koamas");
    assert!(lines
        .iter()
        .filter(|l| l["type"] == "typing_changed" && !l["speaker_id"].is_null())
        .all(|l| l["speaker_name"].is_string()));

    let summary = lines.last().unwrap();
    assert_eq!(summary["type"], "summary");
    assert_eq!(summary["messages"], 9);
    assert_eq!(summary["script_finished"], true);
}

#[test]
fn test_faru_with_user_message_gets_reply() {
    let (code, stdout, _) = run_cli(&["faru", "--say", "4000:me neither"]);
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    let reveals: Vec<&Value> = lines
        .iter()
        .filter(|l| l["type"] == "message_revealed")
        .collect();
    assert_eq!(reveals.len(), 11);

    let user = reveals
        .iter()
        .find(|l| l["message"]["origin"] == "user")
        .unwrap();
    assert_eq!(user["at_ms"], 4000);
    assert_eq!(user["speaker_name"], "You");
    let reply = reveals
        .iter()
        .find(|l| l["message"]["origin"] == "responder")
        .unwrap();
    assert_eq!(reply["at_ms"], 7000);
}

#[test]
fn test_koamas_answers_keywords() {
    let (code, stdout, _) = run_cli(&["koamas", "I can't sleep"]);
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    let replies: Vec<&Value> = lines
        .iter()
        .filter(|l| l["type"] == "message_revealed" && l["message"]["origin"] == "responder")
        .collect();
    assert_eq!(replies.len(), 1);
    assert!(replies[0]["message"]["content"]
        .as_str()
        .unwrap()
        .contains("Those nights are the worst"));
}

#[test]
fn test_pulse_stats() {
    let (code, stdout, _) = run_cli(&["pulse", "stats"]);
    assert_eq!(code, 0);

    let stats: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["total"], 25);
    assert_eq!(stats["stormy"], 18);
    assert_eq!(stats["regions"].as_array().unwrap().len(), 20);
}

#[test]
fn test_pulse_submit_stormy_offers_support() {
    let (code, stdout, _) = run_cli(&["pulse", "submit", "K", "stormy"]);
    assert_eq!(code, 0);

    let out: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(out["pulse"]["region"], "K");
    assert_eq!(out["support"].as_array().unwrap().len(), 4);
    assert_eq!(out["stats"]["total"], 26);
}

#[test]
fn test_pulse_tide_reports_peak_and_bands() {
    let (code, stdout, _) = run_cli(&["pulse", "tide"]);
    assert_eq!(code, 0);

    let tide: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tide["anchors"], 2847);
    assert_eq!(tide["peak"]["label"], "11pm");
    assert_eq!(tide["peak"]["stormy_pct"], 92);
    let hours = tide["hours"].as_array().unwrap();
    assert_eq!(hours.len(), 7);
    assert_eq!(hours[0]["band"], "choppy");
    assert_eq!(hours[1]["band"], "calm");
    assert_eq!(hours[6]["band"], "storm");
}

#[test]
fn test_pulse_map_offsets_follow_seed() {
    let args = ["pulse", "map", "--set", "ambience.seed=11"];
    let (code, first, _) = run_cli(&args);
    assert_eq!(code, 0);
    let (_, second, _) = run_cli(&args);
    assert_eq!(first, second);

    let pins: Value = serde_json::from_str(&first).unwrap();
    let pins = pins.as_array().unwrap();
    assert_eq!(pins.len(), 25);
    assert!(pins.iter().all(|p| p["offset_ms"].as_u64().unwrap() < 2000));
}

#[test]
fn test_pulse_submit_unknown_region() {
    let (code, _, stderr) = run_cli(&["pulse", "submit", "XX", "sunny"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("XX"));
}

#[test]
fn test_profile_defaults_region() {
    let (code, stdout, _) = run_cli(&["profile", "  reef  "]);
    assert_eq!(code, 0);

    let profile: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(profile["nickname"], "reef");
    assert_eq!(profile["region"], "K");
    assert_eq!(profile["region_name"], "Kaafu (Malé)");
}

#[test]
fn test_profile_rejects_bad_input() {
    let (code, _, stderr) = run_cli(&["profile", "a"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("at least 2"));

    let (code, _, stderr) = run_cli(&["profile", "reef", "--region", "Q"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown region code: Q"));
}

#[test]
fn test_config_get() {
    let (code, stdout, _) = run_cli(&["config", "get", "breathing.target_cycles"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");

    let (code, stdout, _) = run_cli(&[
        "config",
        "get",
        "chat.typing_lead_ms",
        "--set",
        "chat.typing_lead_ms=900",
    ]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "900");
}

#[test]
fn test_config_show_is_toml() {
    let (code, stdout, _) = run_cli(&["config", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[breathing]"));
    assert!(stdout.contains("phase_duration_secs = 4"));
}

#[test]
fn test_invalid_override_fails() {
    let (code, _, stderr) = run_cli(&["config", "show", "--set", "breathing.target_cycles=0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(&["config", "show", "--set", "no_equals_sign"]);
    assert_eq!(code, 1);
}
