use assert_cmd::Command;
use predicates::prelude::*;

fn dotcfg(file: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("dotcfg").unwrap();
    cmd.env_remove("DOTCFG_FILE").arg("--file").arg(file);
    cmd
}

#[test]
fn set_then_get_persists() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("cfg.json");

    dotcfg(&file)
        .args(["set", "DockerHost", "tcp://10.0.0.1:2375"])
        .assert()
        .success();
    assert!(file.exists());

    dotcfg(&file)
        .args(["get", "DockerHost"])
        .assert()
        .success()
        .stdout("tcp://10.0.0.1:2375\n");
}

#[test]
fn registries_use_renamed_json_fields() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("cfg.json");

    dotcfg(&file)
        .args(["set", "Registries.1.ServerAddress", "registry.local"])
        .assert()
        .success();
    dotcfg(&file)
        .args(["set", "Registries.1.Email", "me@example.com"])
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(
        saved,
        serde_json::json!({
            "Registries": [
                {"auth": "", "email": "me@example.com", "serveraddress": "registry.local"}
            ]
        })
    );

    dotcfg(&file)
        .arg("list")
        .assert()
        .success()
        .stdout(
            "Registries.1.Email me@example.com\nRegistries.1.ServerAddress registry.local\n",
        );
}

#[test]
fn empty_value_deletes_map_entry() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("cfg.json");

    dotcfg(&file)
        .args(["set", "HttpHeaders.X-Trace", "on"])
        .assert()
        .success();
    dotcfg(&file)
        .arg("keys")
        .assert()
        .success()
        .stdout("DockerHost\nHttpHeaders.X-Trace\n");

    dotcfg(&file)
        .args(["set", "HttpHeaders.X-Trace", ""])
        .assert()
        .success();
    dotcfg(&file).arg("dump").assert().success().stdout("{}\n");
}

#[test]
fn unknown_field_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("cfg.json");

    dotcfg(&file)
        .args(["get", "Nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no field with name \"Nope\""));
    assert!(!file.exists());
}

#[test]
fn malformed_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("cfg.json");
    std::fs::write(&file, "not json!").unwrap();

    dotcfg(&file)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config data"));
}

#[test]
fn file_can_come_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("env.json");

    Command::cargo_bin("dotcfg")
        .unwrap()
        .env("DOTCFG_FILE", &file)
        .args(["set", "DockerHost", "unix:///run/daemon.sock"])
        .assert()
        .success();
    let saved = std::fs::read_to_string(&file).unwrap();
    assert!(saved.contains("\"DockerHost\": \"unix:///run/daemon.sock\""));
}
