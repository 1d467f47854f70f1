use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use wbduck::Warehouse;

// Nothing listens on the discard port, so any request fails fast.
const DEAD_API: &str = "http://127.0.0.1:9/v2";

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("wbduck").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("wbduck"))
        .stdout(predicate::str::contains("dl"))
        .stdout(predicate::str::contains("sources"))
        .stdout(predicate::str::contains("indicators"));
}

#[test]
fn download_requires_indicator_and_timeframe() {
    let mut cmd = Command::cargo_bin("wbduck").unwrap();
    cmd.args(["dl", "--timeframe", "2020"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--indicator"));

    let mut cmd = Command::cargo_bin("wbduck").unwrap();
    cmd.args(["download", "--indicator", "SP.POP.TOTL"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--timeframe"));
}

#[test]
fn indicators_requires_numeric_source() {
    let mut cmd = Command::cargo_bin("wbduck").unwrap();
    cmd.args(["indicators", "--source", "wdi"]);
    cmd.assert().failure();
}

#[test]
fn unreachable_api_is_fatal() {
    let mut cmd = Command::cargo_bin("wbduck").unwrap();
    cmd.args(["--api-url", DEAD_API, "dl", "-i", "SP.POP.TOTL", "-t", "2020"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("download SP.POP.TOTL"));
}

#[test]
fn existing_table_is_kept_and_exported_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("wb.duckdb");
    let csv = dir.path().join("pop.csv");
    {
        let wh = Warehouse::open(Some(db.as_path())).unwrap();
        wh.connection()
            .execute_batch(
                "CREATE TABLE SP_POP_TOTL (name VARCHAR, iso3name VARCHAR, \"2020\" DOUBLE);
                 INSERT INTO SP_POP_TOTL VALUES ('Chile', 'CHL', 19300000);",
            )
            .unwrap();
    }

    let mut cmd = Command::cargo_bin("wbduck").unwrap();
    cmd.args(["--api-url", DEAD_API, "dl", "-i", "SP.POP.TOTL", "-t", "2020"])
        .arg("--database")
        .arg(&db)
        .arg("--csv")
        .arg(&csv);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("already exists"));

    let text = std::fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("name,iso3name,2020"));
    assert!(text.contains("Chile"));
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn list_sources_online() {
    let mut cmd = Command::cargo_bin("wbduck").unwrap();
    cmd.arg("sources");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("World Development Indicators"));
}
