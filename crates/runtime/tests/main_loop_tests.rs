use std::path::PathBuf;
use std::process::{Command, Output};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn locomotion(args: &[&str]) -> Output {
    let output = Command::new(env!("CARGO_BIN_EXE_locomotion"))
        .current_dir(workspace_root())
        .env("RUST_LOG", "info")
        .args(args)
        .output()
        .expect("failed to spawn locomotion");
    eprintln!("--- stderr ---\n{}", String::from_utf8_lossy(&output.stderr));
    output
}

#[test]
fn terrain_command_prints_first_row_as_json() {
    let output = locomotion(&["terrain", "--seed", "4", "--slopes", "-0.02,0.02"]);
    assert!(output.status.success(), "exit {:?}", output.status.code());
    let row: Vec<f32> = serde_json::from_slice(&output.stdout).expect("stdout is a JSON array");
    assert_eq!(row.len(), 1000);
    assert!(row.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn run_command_logs_each_episode() {
    let output = locomotion(&["run", "--env", "walker", "--episodes", "2", "--max-steps", "5"]);
    assert!(output.status.success(), "exit {:?}", output.status.code());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("episode finished").count(), 2);
}

#[test]
fn missing_config_file_fails() {
    let output = locomotion(&["run", "--config", "does/not/exist.json"]);
    assert!(!output.status.success());
}
