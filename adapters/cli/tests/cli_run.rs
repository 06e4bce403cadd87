use std::{fs, path::PathBuf, process::Command};

use tempfile::TempDir;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write fixture");
    path
}

fn run(args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_drone-courier"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch drone-courier");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    )
}

#[test]
fn compares_every_strategy_on_a_csv_map() {
    let dir = tempfile::tempdir().expect("tempdir");
    let map = write_fixture(&dir, "open.csv", "S,0,0\n0,A,0\n0,0,1\n");
    let (success, stdout) = run(&["--map", map.to_str().expect("utf-8 path"), "--strategy", "all"]);

    assert!(success, "cli failed: {stdout}");
    assert!(stdout.contains("map 3x3"));
    for name in ["best-first", "uniform-cost", "iterative-deepening"] {
        assert!(
            stdout.contains(&format!("{name}: mission planned, 16 frames")),
            "missing {name} in {stdout}"
        );
    }
    assert!(stdout.contains("shortest: best-first"));
}

#[test]
fn reports_battery_infeasible_missions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let map = write_fixture(&dir, "low.csv", "S,0,0\n0,0,0\n0,0,1\n");
    let (success, stdout) = run(&[
        "--map",
        map.to_str().expect("utf-8 path"),
        "--battery",
        "1",
        "--strategy",
        "uniform-cost",
    ]);

    assert!(success);
    assert!(stdout.contains("uniform-cost: mission failed: outbound leg failed (battery-infeasible)"));
}

#[test]
fn applies_tuning_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let map = write_fixture(&dir, "tuned.csv", "S,0,0,0,1\n");
    let config = write_fixture(
        &dir,
        "tuning.toml",
        "[[iterative_deepening.tiers]]\nmax_rows = 8\nmax_cols = 8\ndepth_limit = 3\n",
    );
    let (success, stdout) = run(&[
        "--map",
        map.to_str().expect("utf-8 path"),
        "--config",
        config.to_str().expect("utf-8 path"),
        "--strategy",
        "iterative-deepening",
    ]);

    assert!(success);
    assert!(stdout
        .contains("iterative-deepening: mission failed: outbound leg failed (resource-exhausted)"));
}

#[test]
fn rejects_missing_map() {
    let (success, _) = run(&["--map", "/nonexistent/drone-courier-map.csv"]);
    assert!(!success);
}

#[test]
fn render_marks_path_but_keeps_landmarks() {
    let dir = tempfile::tempdir().expect("tempdir");
    let map = write_fixture(&dir, "corridor.csv", "S,0,0,1\n");
    let (success, stdout) = run(&[
        "--map",
        map.to_str().expect("utf-8 path"),
        "--strategy",
        "uniform-cost",
        "--render",
    ]);

    assert!(success, "cli failed: {stdout}");
    assert!(stdout.contains("  S * * 1"), "unexpected render in {stdout}");
    assert!(stdout.contains("0 wind cell(s) at intensity 0.00"));
}
