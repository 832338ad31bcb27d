use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const POM: &str = r#"<project>
  <groupId>org.example</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.example</groupId>
        <artifactId>core</artifactId>
        <version>1.5</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>core</artifactId>
      <version>1.0</version>
    </dependency>
    <dependency>
      <groupId>org.example</groupId>
      <artifactId>util</artifactId>
      <version>2.0</version>
      <scope>runtime</scope>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>
"#;

#[allow(deprecated)]
fn pomstage_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pomstage").unwrap();
    cmd.env("HOME", home)
        .env_remove("POMSTAGE_POM")
        .env_remove("POMSTAGE_SETTINGS")
        .env_remove("RUST_LOG");
    cmd
}

fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("pom.xml"), POM).unwrap();
    tmp
}

#[test]
fn test_import_defined_dependencies() {
    let tmp = project();
    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["import"])
        .assert()
        .success()
        .stdout(predicate::str::contains("org.example:core:jar:1.5"))
        .stdout(predicate::str::contains("org.example:util:jar:2.0"))
        .stdout(predicate::str::contains("junit").not());
}

#[test]
fn test_import_finds_pom_in_parent_directory() {
    let tmp = project();
    let nested = tmp.path().join("src").join("main");
    fs::create_dir_all(&nested).unwrap();
    pomstage_cmd(tmp.path())
        .current_dir(&nested)
        .args(["import", "--scope", "test"])
        .assert()
        .success()
        .stdout(predicate::str::diff("junit:junit:jar:4.13.2\n"));
}

#[test]
fn test_import_scope_list_and_reject() {
    let tmp = project();
    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["import", "--scope", "compile,runtime", "--reject", "org.example:util"])
        .assert()
        .success()
        .stdout(predicate::str::diff("org.example:core:jar:1.5\n"));
}

#[test]
fn test_import_json() {
    let tmp = project();
    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["import", "--scope", "test", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"artifact_id\": \"junit\""));
}

#[test]
fn test_import_explicit_pom() {
    let tmp = project();
    let elsewhere = TempDir::new().unwrap();
    pomstage_cmd(tmp.path())
        .current_dir(elsewhere.path())
        .args(["import", "--pom"])
        .arg(tmp.path().join("pom.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("org.example:core:jar:1.5"));
}

#[test]
fn test_import_without_pom_fails() {
    let tmp = TempDir::new().unwrap();
    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["import"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not find pom.xml"));
}

#[test]
fn test_import_unknown_scope_fails() {
    let tmp = project();
    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["import", "--scope", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unable to parse"));
}

#[test]
fn test_import_missing_version_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("pom.xml"),
        r#"<project>
  <groupId>g</groupId>
  <artifactId>app</artifactId>
  <version>1</version>
  <dependencies>
    <dependency><groupId>g</groupId><artifactId>lib</artifactId></dependency>
  </dependencies>
</project>"#,
    )
    .unwrap();
    pomstage_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["import"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("resolution failed"));
}
