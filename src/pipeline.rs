use crate::api::{Client, PageFetcher};
use crate::config::{DownloadConfig, TableName};
use crate::error::Result;
use crate::export::{ExportFormat, export_table};
use crate::storage::Warehouse;
use log::info;
use std::path::PathBuf;

/// What happened to the destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The table already existed and `force` was not set; nothing was downloaded.
    Skipped,
    /// The table was (re)built from this many downloaded records.
    Loaded { records: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub table: TableName,
    pub refresh: Refresh,
    pub exports: Vec<(ExportFormat, PathBuf)>,
}

/// Run one download: existence check, download, pivot, then the requested exports.
///
/// Exports run even when the refresh was skipped, against the existing table.
/// The first error aborts the run.
pub fn run_download<F: PageFetcher>(
    client: &Client<F>,
    warehouse: &mut Warehouse,
    config: &DownloadConfig,
) -> Result<DownloadReport> {
    let table = config.table_name()?;

    let refresh = if !config.force && warehouse.table_exists(&table) {
        info!("table {table} already exists, skipping download (use --force to refresh)");
        Refresh::Skipped
    } else {
        let records = client.download_indicator(&config.indicator, &config.timeframe)?;
        let records = warehouse.load_indicator(&table, &records)?;
        Refresh::Loaded { records }
    };

    let mut exports = Vec::new();
    let targets = [
        (ExportFormat::Csv, &config.csv),
        (ExportFormat::Parquet, &config.parquet),
    ];
    for (format, path) in targets {
        if let Some(path) = path {
            export_table(warehouse.connection(), &table, path, format)?;
            exports.push((format, path.clone()));
        }
    }

    Ok(DownloadReport {
        table,
        refresh,
        exports,
    })
}
