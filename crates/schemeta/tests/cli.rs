//! Tests for the `schemeta` binary.

mod common;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use common::SHOP_DDL;
use schemeta::prelude::*;
use tempfile::TempDir;

fn schemeta(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_schemeta"))
        .args(args)
        .env_remove("SCHEMETA_VERBOSE")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run schemeta: {e}"))
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap_or_else(|| panic!("non-UTF-8 path {}", path.display()))
}

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_parse_to_stdout() {
    let dir = TempDir::new().unwrap();
    let ddl = write(&dir, "shop.sql", SHOP_DDL);

    let output = schemeta(&["parse", path_str(&ddl)]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let metadata = DatabaseSchemaMetadata::from_json(stdout.trim()).unwrap();
    assert_eq!(metadata, parse_to_metadata(SHOP_DDL).unwrap());
}

#[test]
fn test_parse_then_render_files() {
    let dir = TempDir::new().unwrap();
    let ddl = write(&dir, "shop.sql", SHOP_DDL);
    let json = dir.path().join("shop.json");
    let rendered = dir.path().join("rendered.sql");

    let output = schemeta(&["parse", path_str(&ddl), "--pretty", "--output", path_str(&json)]);
    assert!(output.status.success(), "{output:?}");
    let contents = fs::read_to_string(&json).unwrap();
    assert!(contents.contains("\n  \"schemas\": ["), "{contents}");

    let output = schemeta(&["render", path_str(&json), "-o", path_str(&rendered)]);
    assert!(output.status.success(), "{output:?}");
    let ddl = fs::read_to_string(&rendered).unwrap();
    assert!(ddl.starts_with("--\n-- Table structure for `customers`\n--\n"), "{ddl}");
    assert!(ddl.contains("-- Table structure for `orders`"), "{ddl}");
}

#[test]
fn test_check_reports_stable() {
    let dir = TempDir::new().unwrap();
    let ddl = write(&dir, "shop.sql", SHOP_DDL);

    let output = schemeta(&["check", path_str(&ddl)]);
    assert!(output.status.success(), "{output:?}");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("2 tables, stable"), "{stderr}");
}

#[test]
fn test_parse_fails_on_conflict() {
    let dir = TempDir::new().unwrap();
    let ddl = write(&dir, "dup.sql", "CREATE TABLE t (a INT);\nCREATE TABLE t (b INT);\n");

    let output = schemeta(&["parse", path_str(&ddl)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("multiple table names found: t"), "{stderr}");
}

#[test]
fn test_render_rejects_bad_json() {
    let dir = TempDir::new().unwrap();
    let json = write(&dir, "bad.json", "{\"schemas\": 1}");

    let output = schemeta(&["render", path_str(&json)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid metadata"), "{stderr}");
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.sql");

    let output = schemeta(&["parse", path_str(&missing)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to read"), "{stderr}");
}
