//! CLI integration tests for sqlmapper.
//!
//! These tests verify command-line argument parsing, help output,
//! output file naming and exit codes for various error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get a command for the sqlmapper binary.
fn cmd() -> Command {
    Command::cargo_bin("sqlmapper").unwrap()
}

fn write_sql(dir: &Path, name: &str, sql: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, sql).unwrap();
    path
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--file"))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--workers"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("SQLMAPPER_LOG"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sqlmapper"));
}

#[test]
fn test_file_is_required() {
    cmd()
        .args(["--to", "postgres"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

// =============================================================================
// Conversion Tests
// =============================================================================

#[test]
fn test_convert_detected_mysql_to_postgres() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sql(
        dir.path(),
        "users.sql",
        "CREATE TABLE users (\n  id INT NOT NULL AUTO_INCREMENT,\n  PRIMARY KEY (id)\n) ENGINE=InnoDB;\n",
    );

    cmd()
        .arg("--file")
        .arg(&input)
        .args(["--to", "postgres"])
        .assert()
        .success()
        .stdout(predicate::str::contains("users_postgres.sql"));

    let output = std::fs::read_to_string(dir.path().join("users_postgres.sql")).unwrap();
    assert!(output.contains("id serial NOT NULL"), "{output}");
    assert!(!output.contains("ENGINE"), "{output}");
}

#[test]
fn test_convert_with_explicit_source_and_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sql(dir.path(), "plain.sql", "CREATE TABLE t (x integer NOT NULL);");
    let out_dir = dir.path().join("converted");

    cmd()
        .arg("--file")
        .arg(&input)
        .args(["--from", "pg", "--to", "mssql"])
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success();

    let output = std::fs::read_to_string(out_dir.join("plain_sqlserver.sql")).unwrap();
    assert!(output.contains("CREATE TABLE t ("), "{output}");
    assert!(output.contains("GO"), "{output}");
}

#[test]
fn test_convert_batch_of_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_sql(dir.path(), "a.sql", "CREATE TABLE a (id serial NOT NULL);");
    let b = write_sql(dir.path(), "b.sql", "CREATE TABLE b (n NUMBER(10));");

    cmd()
        .arg("--file")
        .arg(&a)
        .arg("--file")
        .arg(&b)
        .args(["--to", "sqlite", "--workers", "2"])
        .assert()
        .success();

    assert!(dir.path().join("a_sqlite.sql").exists());
    assert!(dir.path().join("b_sqlite.sql").exists());
}

#[test]
fn test_output_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sql(dir.path(), "a.sql", "CREATE TABLE a (id serial NOT NULL);");

    cmd()
        .arg("--file")
        .arg(&input)
        .args(["--to", "oracle", "--output-json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"completed\""))
        .stdout(predicate::str::contains("\"jobs_succeeded\": 1"));
}

#[test]
fn test_config_file_supplies_target() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sql(dir.path(), "a.sql", "CREATE TABLE a (id serial NOT NULL);");
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "conversion:\n  target: mysql\nrunner:\n  workers: 1").unwrap();

    cmd()
        .arg("--file")
        .arg(&input)
        .arg("--config")
        .arg(config.path())
        .assert()
        .success();

    assert!(dir.path().join("a_mysql.sql").exists());
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_undetectable_source_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sql(dir.path(), "plain.sql", "CREATE TABLE t (x int);");

    cmd()
        .arg("--file")
        .arg(&input)
        .args(["--to", "postgres"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from"));

    assert!(!dir.path().join("plain_postgres.sql").exists());
}

#[test]
fn test_empty_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sql(dir.path(), "empty.sql", "-- nothing to see\n");

    cmd()
        .arg("--file")
        .arg(&input)
        .args(["--from", "mysql", "--to", "postgres"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Empty input"));

    assert!(!dir.path().join("empty_postgres.sql").exists());
}

#[test]
fn test_unsupported_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sql(
        dir.path(),
        "seq.sql",
        "CREATE SEQUENCE order_seq START WITH 1 INCREMENT BY 1;",
    );

    cmd()
        .arg("--file")
        .arg(&input)
        .args(["--from", "postgres", "--to", "mysql"])
        .assert()
        .code(3);

    assert!(!dir.path().join("seq_mysql.sql").exists());
}

#[test]
fn test_unknown_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sql(dir.path(), "a.sql", "CREATE TABLE a (id serial);");

    cmd()
        .arg("--file")
        .arg(&input)
        .args(["--to", "db2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown dialect: 'db2'"));
}

#[test]
fn test_missing_target() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sql(dir.path(), "a.sql", "CREATE TABLE a (id serial);");

    cmd()
        .arg("--file")
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--to is required"));
}

#[test]
fn test_missing_config_file() {
    cmd()
        .args(["--file", "a.sql", "--to", "postgres", "--config", "/nonexistent/config.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_invalid_config_yaml() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "runner:\n  workers: 0").unwrap();

    cmd()
        .args(["--file", "a.sql", "--to", "postgres"])
        .arg("--config")
        .arg(config.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("runner.workers"));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("fast.yaml");
    std::fs::write(&config_path, "runner:\n  max_retries: 0\n").unwrap();

    cmd()
        .arg("--file")
        .arg(dir.path().join("missing.sql"))
        .args(["--from", "mysql", "--to", "postgres"])
        .arg("--config")
        .arg(&config_path)
        .assert()
        .code(7);
}
