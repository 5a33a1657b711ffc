use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskboard-{nanos}-{file_name}"))
}

fn run_interactive(file_name: &str, input: &str) -> (std::process::Output, Option<String>) {
    run_interactive_with(file_name, &[], input)
}

fn run_interactive_with(
    file_name: &str,
    args: &[&str],
    input: &str,
) -> (std::process::Output, Option<String>) {
    let store_path = temp_path(file_name);

    let mut child = Command::new(env!("CARGO_BIN_EXE_taskboard"))
        .args(args)
        .env("TASKBOARD_STORE_PATH", &store_path)
        .env(
            "TASKBOARD_CONFIG_PATH",
            store_path.with_extension("config.json"),
        )
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    let output = child
        .wait_with_output()
        .expect("failed to read interactive output");

    let stored = std::fs::read_to_string(&store_path).ok();
    std::fs::remove_file(&store_path).ok();
    (output, stored)
}

#[test]
fn interactive_help_shows_usage() {
    let (output, _) = run_interactive("interactive-help.json", "help\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
}

#[test]
fn interactive_question_mark_shows_usage() {
    let (output, _) = run_interactive("interactive-question.json", "?\nquit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
}

#[test]
fn interactive_invalid_command_prints_error_and_continues() {
    let (output, _) = run_interactive("interactive-invalid.json", "nope\nstats\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(stdout.contains("Total: 5"));
}

#[test]
fn interactive_session_shares_one_store() {
    let (output, stored) = run_interactive(
        "interactive-session.json",
        "add \"demo task\" --priority high\ndelete 1\nstatus 2 completed\nstats\nexit\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: demo task"));
    assert!(stdout.contains("Deleted task: Design Mobile App Interface (1)"));
    assert!(stdout.contains("Completed: 2"));

    let stored: serde_json::Value = serde_json::from_str(&stored.unwrap()).unwrap();
    let tasks = stored.as_array().unwrap();
    assert_eq!(tasks.len(), 5);
    assert_eq!(tasks[0]["title"], "demo task");
    assert!(tasks.iter().all(|task| task["id"] != "1"));
}

#[test]
fn interactive_rejects_config_override_per_line() {
    let (output, _) = run_interactive(
        "interactive-override.json",
        "--config-override log_level=debug stats\nexit\n",
    );
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("only accepted at startup"));
}

#[test]
fn interactive_startup_json_applies_to_every_line() {
    let (output, _) = run_interactive_with("interactive-json.json", &["--json"], "stats\nexit\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with('{'))
        .unwrap();
    let payload: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(payload["total"], 5);
    assert!(!stdout.contains("Total: 5"));
}
