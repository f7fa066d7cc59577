use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("nowdo-{nanos}-{file_name}"))
}

fn stored_tasks(path: &Path) -> serde_json::Value {
    let prefs: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    serde_json::from_str(prefs["tasks"].as_str().expect("tasks value")).unwrap()
}

fn run_session(store_path: &Path, config_path: &Path, input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_nowdo"))
        .env("NOWDO_STORE_PATH", store_path)
        .env("NOWDO_CONFIG_PATH", config_path)
        .env_remove("RUST_LOG")
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

    child
        .wait_with_output()
        .expect("failed to read interactive output")
}

fn run_interactive(input: &str) -> Output {
    let store_path = temp_path("cli-interactive.json");
    let output = run_session(&store_path, &temp_path("no-config.json"), input);
    std::fs::remove_file(&store_path).ok();
    output
}

#[test]
fn interactive_help_shows_usage() {
    let output = run_interactive("help\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_question_mark_shows_usage() {
    let output = run_interactive("?\nquit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage") || stdout.contains("USAGE"));
}

#[test]
fn interactive_invalid_command_prints_error_and_continues() {
    let output = run_interactive("nope\npick\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(stdout.contains("No pending tasks to choose from"));
}

#[test]
fn interactive_pick_then_complete_marks_task() {
    let store_path = temp_path("cli-interactive-complete.json");
    let output = run_session(
        &store_path,
        &temp_path("no-config.json"),
        "add \"Walk dog\"\npick\ncomplete\npick\nexit\n",
    );
    let tasks = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Do this now: Walk dog"));
    assert!(stdout.contains("Task marked as completed"));
    assert!(stdout.contains("No pending tasks to choose from"));
    assert_eq!(tasks[0]["completed"], true);
    assert!(tasks[0]["completedAt"].as_i64().unwrap() > 0);
}

#[test]
fn interactive_list_marks_selection() {
    let output = run_interactive("add solo\npick\nlist\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("*1"));
}

#[test]
fn interactive_delete_of_selection_disables_complete() {
    let output = run_interactive("add solo\npick\ndelete 1\ny\ncomplete\nexit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task deleted: solo"));
    assert!(stdout.contains("No task selected"));
}

#[test]
fn interactive_aliases_come_from_config() {
    let store_path = temp_path("cli-interactive-alias.json");
    let config_path = temp_path("alias-config.json");
    std::fs::write(&config_path, r#"{ "aliases": { "now": "pick" } }"#).unwrap();

    let output = run_session(&store_path, &config_path, "add chores\nnow\nexit\n");
    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Do this now: chores"));
}

#[test]
fn interactive_unterminated_quote_is_reported() {
    let output = run_interactive("add \"oops\nexit\n");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unterminated quote"));
}

#[test]
fn interactive_refuses_launch_flags_and_continues() {
    let store_path = temp_path("cli-interactive-launch-flags.json");
    let output = run_session(
        &store_path,
        &temp_path("no-config.json"),
        "add chores --config-override prefs_name=Other\nlist -v\nadd chores\nlist --json\nexit\n",
    );
    let tasks = stored_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("ERROR: invalid_input").count(), 2);
    assert!(stderr.contains("--config-override only applies when starting nowdo"));
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["text"], "chores");
}
