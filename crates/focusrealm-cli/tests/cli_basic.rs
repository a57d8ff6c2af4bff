//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data
//! directory and checks the JSON it prints.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusrealm"))
        .args(args)
        .env("FOCUSREALM_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute focusrealm");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("{args:?} printed non-JSON ({e}): {stdout}"))
}

fn add_task(data_dir: &Path, title: &str, difficulty: &str) -> String {
    let (stdout, stderr, code) =
        run_cli(data_dir, &["task", "add", title, "--difficulty", difficulty]);
    assert_eq!(code, 0, "task add failed: {stderr}");
    let json_start = stdout.find('{').expect("task JSON");
    let task: serde_json::Value = serde_json::from_str(&stdout[json_start..]).unwrap();
    task["id"].as_str().unwrap().to_string()
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "Write chapter one", "easy");

    let tasks = run_json(dir.path(), &["task", "list"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Write chapter one");
    assert_eq!(tasks[0]["difficulty"], "easy");
    assert_eq!(tasks[0]["estimatedTime"], 25);
}

#[test]
fn test_task_add_rejects_blank_title() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_task_complete_awards_xp_once() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_task(dir.path(), "Refactor parser", "hard");

    run_json(dir.path(), &["task", "complete", &id]);
    let (_, _, code) = run_cli(dir.path(), &["task", "complete", &id]);
    assert_eq!(code, 1);

    let stats = run_json(dir.path(), &["stats", "show"]);
    assert_eq!(stats["progress"]["xp"], 30);
    assert_eq!(stats["progress"]["total_tasks"], 1);
}

#[test]
fn test_complete_unknown_task_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "complete", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("nope"));
}

#[test]
fn test_timer_tick_completes_focus_session() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["settings", "set", "work_duration", "1"]);
    run_json(dir.path(), &["config", "list"]);

    let started = run_json(dir.path(), &["timer", "start"]);
    assert_eq!(started["type"], "BreathingStarted");

    let (stdout, stderr, code) = run_cli(dir.path(), &["timer", "tick", "63"]);
    assert_eq!(code, 0, "timer tick failed: {stderr}");
    assert!(stdout.contains("PhaseCompleted"));

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["phase"], "short_break");
    assert_eq!(status["state"], "idle");

    let stats = run_json(dir.path(), &["stats", "show"]);
    assert_eq!(stats["progress"]["total_pomodoros"], 1);
    assert_eq!(stats["progress"]["xp"], 25);
    assert_eq!(stats["sessions"]["focus_sessions"], 1);
}

#[test]
fn test_settings_zero_restores_default() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["settings", "set", "short_break", "12"]);
    run_json(dir.path(), &["settings", "set", "work_duration", "0"]);

    let settings = run_json(dir.path(), &["settings", "show"]);
    assert_eq!(settings["workDuration"], 25);
    assert_eq!(settings["shortBreak"], 12);

    let (_, _, code) = run_cli(dir.path(), &["settings", "set", "lunch", "30"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "timer.strict_mode", "true"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("ok"));

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "timer.strict_mode"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
}

#[test]
fn test_story_locked_chapter_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let story = run_json(dir.path(), &["story", "list"]);
    assert_eq!(story["chapters"].as_array().unwrap().len(), 4);
    assert_eq!(story["nextUnlock"]["xp_needed"], 100);

    let (_, _, code) = run_cli(dir.path(), &["story", "open", "2"]);
    assert_eq!(code, 1);
    let chapter = run_json(dir.path(), &["story", "open", "1"]);
    assert_eq!(chapter["title"], "The Awakening");
}

#[test]
fn test_mood_and_theme() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["mood", "set", "morning", "great"]);
    run_json(dir.path(), &["gratitude", "a long walk"]);
    let mood = run_json(dir.path(), &["mood", "show"]);
    assert_eq!(mood["mood"]["morning"], "great");
    assert_eq!(mood["gratitude"], "a long walk");

    let theme = run_json(dir.path(), &["theme", "toggle"]);
    assert_eq!(theme["theme"], "dark");

    let (_, _, code) = run_cli(dir.path(), &["mood", "set", "noon", "great"]);
    assert_eq!(code, 1);
}

#[test]
fn test_broken_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "timer = [[[").unwrap();

    let (stdout, stderr, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("focusrealm"));
    assert!(stderr.contains("falling back to default log filter"), "{stderr}");
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("focusrealm"));
}
