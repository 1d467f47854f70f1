//! wbduck
//!
//! Download World Bank indicator series into DuckDB as wide tables (one row per
//! country, one column per year) and export them as CSV or Parquet. Pairs with
//! the `wbduck` CLI.
//!
//! ### Features
//! - Paginated download of one indicator over a timeframe
//! - Long-to-wide load with DuckDB `PIVOT ... USING SUM(value)`
//! - Skip the refresh when the destination table already exists (unless forced)
//! - `COPY` exports to CSV and Parquet
//! - Listing of data sources and of the indicators of a source
//!
//! ### Example
//! ```no_run
//! use wbduck::{ApiConfig, Client, DownloadConfig, Warehouse, run_download};
//!
//! let client = Client::new(&ApiConfig::default())?;
//! let mut warehouse = Warehouse::open(Some("wb.duckdb".as_ref()))?;
//! let mut config = DownloadConfig::new("NY.GDP.MKTP.CD", "2023:2010");
//! config.csv = Some("gdp.csv".into());
//! let report = run_download(&client, &mut warehouse, &config)?;
//! println!("{:?}", report.refresh);
//! # Ok::<(), wbduck::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod listing;
pub mod models;
pub mod pipeline;
pub mod storage;

pub use api::{Client, HttpFetcher, PageFetcher};
pub use config::{ApiConfig, DownloadConfig, TableName};
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use models::{IndicatorRecord, PageInfo};
pub use pipeline::{DownloadReport, Refresh, run_download};
pub use storage::Warehouse;
