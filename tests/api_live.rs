//! Live API tests. Run with: `cargo test --features online -- --nocapture`
#![cfg(feature = "online")]

use wbduck::{ApiConfig, Client, DownloadConfig, Refresh, Warehouse, run_download};

#[test]
fn download_small_range() {
    let cli = Client::new(&ApiConfig::default()).unwrap();
    let records = cli.download_indicator("SP.POP.TOTL", "2020:2019").unwrap();
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.date == "2019" || r.date == "2020"));
    assert!(records.iter().any(|r| r.countryiso3code == "DEU"));
}

#[test]
fn small_pages_are_all_collected() {
    let config = ApiConfig {
        per_page: 100,
        ..ApiConfig::default()
    };
    let cli = Client::new(&config).unwrap();
    let records = cli.download_indicator("SP.POP.TOTL", "2020").unwrap();
    // Over 250 countries and aggregates, so more than two pages.
    assert!(records.len() > 200);
}

#[test]
fn list_sources_and_indicators() {
    let cli = Client::new(&ApiConfig::default()).unwrap();
    let sources = cli.list_sources().unwrap();
    assert!(sources.iter().any(|s| s.id == "2"));
    let indicators = cli.list_indicators(2).unwrap();
    assert!(indicators.iter().any(|i| i.id == "NY.GDP.MKTP.CD"));
}

#[test]
fn end_to_end_into_memory() {
    let cli = Client::new(&ApiConfig::default()).unwrap();
    let mut wh = Warehouse::open_in_memory().unwrap();
    let report = run_download(&cli, &mut wh, &DownloadConfig::new("NY.GDP.MKTP.CD", "2022:2021")).unwrap();
    assert!(matches!(report.refresh, Refresh::Loaded { records } if records > 0));
    assert!(wh.row_count(&report.table).unwrap() > 100);
}
