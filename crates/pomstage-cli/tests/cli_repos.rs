use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn pomstage_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pomstage").unwrap();
    cmd.env("HOME", home)
        .env_remove("POMSTAGE_SETTINGS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_repos_defaults_to_central() {
    let tmp = TempDir::new().unwrap();
    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["repos"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "central https://repo.maven.apache.org/maven2\n",
        ));
}

#[test]
fn test_repos_reads_user_settings() {
    let tmp = TempDir::new().unwrap();
    let m2 = tmp.path().join(".m2");
    fs::create_dir_all(&m2).unwrap();
    fs::write(
        m2.join("settings.xml"),
        r#"<settings>
  <offline>true</offline>
  <servers>
    <server><id>corp</id><username>me</username><password>pw</password></server>
  </servers>
  <mirrors>
    <mirror><id>corp</id><url>https://nexus.corp/maven</url><mirrorOf>*</mirrorOf></mirror>
  </mirrors>
</settings>"#,
    )
    .unwrap();

    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["repos"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "corp https://nexus.corp/maven (authenticated)",
        ))
        .stderr(predicate::str::contains("Offline"));
}

#[test]
fn test_repos_invalid_settings_fails() {
    let tmp = TempDir::new().unwrap();
    let settings = tmp.path().join("settings.xml");
    fs::write(
        &settings,
        "<settings><servers><server><username>u</username></server></servers></settings>",
    )
    .unwrap();
    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["repos", "--settings"])
        .arg(&settings)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_repos_settings_from_global_config() {
    let tmp = TempDir::new().unwrap();
    let settings = tmp.path().join("custom-settings.xml");
    fs::write(
        &settings,
        r#"<settings><mirrors><mirror>
  <id>internal</id><url>https://repo.internal/</url><mirrorOf>central</mirrorOf>
</mirror></mirrors></settings>"#,
    )
    .unwrap();
    let config_dir = tmp.path().join(".pomstage");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[resolve]\nsettings = \"~/custom-settings.xml\"\n",
    )
    .unwrap();

    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["repos"])
        .assert()
        .success()
        .stdout(predicate::str::diff("internal https://repo.internal\n"));
}
