//! Copy a destination table out to flat files with DuckDB's `COPY ... TO`.

use crate::config::TableName;
use crate::error::Result;
use duckdb::Connection;
use log::info;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-delimited with a header row.
    Csv,
    Parquet,
}

impl ExportFormat {
    fn copy_options(self) -> &'static str {
        match self {
            ExportFormat::Csv => "(HEADER, DELIMITER ',')",
            ExportFormat::Parquet => "(FORMAT 'parquet')",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        })
    }
}

/// SQL string literal for a filesystem path.
fn sql_path(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', "''"))
}

/// Write the whole of `table` to `path`, overwriting any existing file.
pub fn export_table(
    conn: &Connection,
    table: &TableName,
    path: &Path,
    format: ExportFormat,
) -> Result<()> {
    info!("export {table} to {format}: {}", path.display());
    conn.execute_batch(&format!(
        "COPY {} TO {} {}",
        table.quoted(),
        sql_path(path),
        format.copy_options()
    ))?;
    Ok(())
}
