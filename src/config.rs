//! Explicit configuration handed to the client and the download pipeline.

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";
/// Page size for indicator observations and the sources listing.
pub const DEFAULT_PER_PAGE: u32 = 1000;
/// The indicators-per-source listing is large; fetch it in one go.
pub const INDICATORS_PER_PAGE: u32 = 10_000;

/// Connection settings for the World Bank API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// `per_page` sent with indicator downloads.
    pub per_page: u32,
    /// Total request timeout. `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            per_page: DEFAULT_PER_PAGE,
            timeout: None,
        }
    }
}

/// One invocation of the download command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Indicator code, e.g. `NY.GDP.MKTP.CD`.
    pub indicator: String,
    /// Passed through to the API's `date` parameter, e.g. `2023:2010`.
    pub timeframe: String,
    /// Explicit destination table; derived from the indicator code when `None`.
    pub table: Option<String>,
    /// DuckDB file; in-memory when `None`.
    pub database: Option<PathBuf>,
    /// Rebuild the table even if it already exists.
    pub force: bool,
    pub csv: Option<PathBuf>,
    pub parquet: Option<PathBuf>,
}

impl DownloadConfig {
    pub fn new(indicator: impl Into<String>, timeframe: impl Into<String>) -> Self {
        Self {
            indicator: indicator.into(),
            timeframe: timeframe.into(),
            ..Default::default()
        }
    }

    /// Destination table for this download.
    pub fn table_name(&self) -> Result<TableName> {
        match &self.table {
            Some(name) => TableName::new(name),
            None => TableName::for_indicator(&self.indicator),
        }
    }
}

static IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// A validated destination table name.
///
/// Only ASCII letters, digits and underscores are accepted, so the name can be
/// embedded (double-quoted) in DDL without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if IDENT.is_match(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::InvalidTableName(name.to_string()))
        }
    }

    /// `NY.GDP.MKTP.CD` becomes `NY_GDP_MKTP_CD`.
    pub fn for_indicator(code: &str) -> Result<Self> {
        Self::new(&code.trim().replace('.', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier form for SQL statements.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
