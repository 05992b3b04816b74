//! End-to-end tests for the pomodoro-tracker binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn pomodoro(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pomodoro-tracker").unwrap();
    cmd.arg("--data-dir")
        .arg(data_dir.path())
        .env_remove("POMODORO_SERVER_URL")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn test_settings_shows_defaults() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("作業時間: 25分"))
        .stdout(predicate::str::contains("長い休憩の間隔: 4回"));
}

#[test]
fn test_settings_are_saved_and_used_by_status() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["settings", "--work", "50", "--sound", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("設定を保存しました"))
        .stdout(predicate::str::contains("作業時間: 50分"))
        .stdout(predicate::str::contains("サウンド: オフ"));

    assert!(dir.path().join("pomodoro_config.json").exists());

    pomodoro(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("保存されたセッションはありません"))
        .stdout(predicate::str::contains("50:00"));
}

#[test]
fn test_settings_change_restarts_saved_interval() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("pomodoro_session.json"),
        r#"{"mode":"work","completedWorkSessions":1,"totalFocusSeconds":1500,
            "timerRunning":false,"timerRemainingSeconds":900,
            "timerAccumulatedPausedMs":600000,"timerStartEpochMs":null}"#,
    )
    .unwrap();

    pomodoro(&dir)
        .args(["settings", "--work", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("作業時間: 50分"));

    pomodoro(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("作業中"))
        .stdout(predicate::str::contains("50:00"))
        .stdout(predicate::str::contains("完了セッション: 1"));
}

#[test]
fn test_settings_out_of_range_fails() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["settings", "--work", "121"])
        .assert()
        .failure();
    assert!(!dir.path().join("pomodoro_config.json").exists());
}

// ============================================================================
// Status / Clear
// ============================================================================

#[test]
fn test_status_shows_saved_session() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("pomodoro_session.json"),
        r#"{"mode":"short_break","completedWorkSessions":2,"totalFocusSeconds":3000,
            "timerRunning":false,"timerRemainingSeconds":120,
            "timerAccumulatedPausedMs":180000,"timerStartEpochMs":null}"#,
    )
    .unwrap();

    pomodoro(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("短休憩中"))
        .stdout(predicate::str::contains("02:00"))
        .stdout(predicate::str::contains("完了セッション: 2"))
        .stdout(predicate::str::contains("0時間50分"));
}

#[test]
fn test_clear_removes_session() {
    let dir = TempDir::new().unwrap();
    let session = dir.path().join("pomodoro_session.json");
    std::fs::write(&session, "{}").unwrap();

    pomodoro(&dir)
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("削除しました"));
    assert!(!session.exists());
}

// ============================================================================
// Run
// ============================================================================

#[test]
fn test_run_skip_then_quit_persists_mode() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["run", "--offline"])
        .write_stdin("s\nq\n")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stdout(predicate::str::contains("スキップしました"));

    pomodoro(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("長休憩中"))
        .stdout(predicate::str::contains("15:00"));
}

// ============================================================================
// Stats / Completions
// ============================================================================

#[test]
fn test_stats_with_unreachable_server_fails() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["stats", "--server", "http://127.0.0.1:9", "--date", "2026-02-24"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("エラー"));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    pomodoro(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pomodoro-tracker"));
}
