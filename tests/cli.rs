use std::process::{Command, Output};

fn run_in(dir: &tempfile::TempDir, env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_aiva-federated"));
    command
        .current_dir(dir.path())
        .env_remove("CLIENT_ID")
        .env_remove("CLIENT_SECRET")
        .env_remove("RUST_LOG");
    for (key, value) in env {
        command.env(key, value);
    }
    command.output().expect("binary should start")
}

#[test]
fn missing_secret_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(&dir, &[("CLIENT_ID", "some-id")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing client secret"));
    assert!(output.stdout.is_empty());
    assert!(!dir.path().join("aiva-jwt.properties").exists());
}

#[test]
fn missing_id_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(&dir, &[("CLIENT_SECRET", "some-secret")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing client ID"));
    assert!(!dir.path().join("aiva-jwt.properties").exists());
}

#[test]
fn missing_both_reports_the_secret() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(&dir, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing client secret"));
}
