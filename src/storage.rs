//! DuckDB side of a download: the existence probe and the long-to-wide load.

use crate::config::TableName;
use crate::error::Result;
use crate::models::{IndicatorRecord, StagingRow};
use duckdb::{Connection, params};
use log::{debug, info};
use std::path::Path;

/// Connection-scoped table the records are staged in before the pivot.
const STAGING: &str = "staging_observations";

/// A single DuckDB connection held for the whole command.
pub struct Warehouse {
    conn: Connection,
}

impl Warehouse {
    /// Open the database file at `path`, or an in-memory database when `None`.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let conn = match path {
            Some(p) => {
                debug!("opening {}", p.display());
                Connection::open(p)?
            }
            None => Connection::open_in_memory()?,
        };
        conn.execute_batch("PRAGMA disable_progress_bar;")?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(None)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Probe the table by selecting (and discarding) one row.
    ///
    /// Any failure counts as "absent"; the error text is only logged at debug level.
    pub fn table_exists(&self, table: &TableName) -> bool {
        match self
            .conn
            .execute_batch(&format!("SELECT * FROM {} LIMIT 1", table.quoted()))
        {
            Ok(()) => true,
            Err(e) => {
                debug!("{table} not found: {e}");
                false
            }
        }
    }

    pub fn row_count(&self, table: &TableName) -> Result<usize> {
        let n: i64 = self.conn.query_row(
            &format!("SELECT count(*) FROM {}", table.quoted()),
            [],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Replace `table` with `records` pivoted by year.
    ///
    /// The result has one row per (name, iso3name) and one column per distinct year,
    /// holding `SUM(value)` for that pair. Every record must map onto a year and every
    /// insert must succeed, otherwise the existing table is left untouched. With no
    /// records the table is created with just the two key columns.
    ///
    /// Returns the number of staged rows.
    pub fn load_indicator(&mut self, table: &TableName, records: &[IndicatorRecord]) -> Result<usize> {
        let rows = records
            .iter()
            .map(StagingRow::try_from)
            .collect::<Result<Vec<_>>>()?;

        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TEMPORARY TABLE {STAGING} \
             (name VARCHAR, iso3name VARCHAR, year INTEGER, value DOUBLE)"
        ))?;

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!("INSERT INTO {STAGING} VALUES (?, ?, ?, ?)"))?;
            for r in &rows {
                stmt.execute(params![r.name, r.iso3, r.year, r.value])?;
            }
        }
        tx.commit()?;
        debug!("staged {} rows", rows.len());

        info!("creating table {table}");
        let ddl = if rows.is_empty() {
            format!(
                "CREATE OR REPLACE TABLE {} (name VARCHAR, iso3name VARCHAR)",
                table.quoted()
            )
        } else {
            format!(
                "CREATE OR REPLACE TABLE {} AS \
                 PIVOT {STAGING} ON year USING SUM(value) GROUP BY name, iso3name",
                table.quoted()
            )
        };
        self.conn.execute_batch(&ddl)?;
        self.conn.execute_batch(&format!("DROP TABLE {STAGING}"))?;
        Ok(rows.len())
    }
}
