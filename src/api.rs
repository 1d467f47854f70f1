//! Synchronous client for the **World Bank Indicators API (v2)**.
//!
//! Covers the three endpoints the CLI needs:
//! - `country/all/indicator/{code}`: paginated observations, see [`Client::download_indicator`]
//! - `sources`: available data sources, see [`Client::list_sources`]
//! - `sources/{id}/indicators`: indicators of one source, see [`Client::list_indicators`]
//!
//! Every endpoint answers with a two-element array `[page info, records]`.
//! HTTP is behind the [`PageFetcher`] trait so the pagination logic can be driven
//! by canned pages in tests.
//!
//! ### Notes
//! - Pages are fetched strictly in sequence; the first error aborts the whole download.
//! - There is no retry. A transient network failure is fatal.
//!
//! Typical usage:
//! ```no_run
//! # use wbduck::{ApiConfig, Client};
//! let client = Client::new(&ApiConfig::default())?;
//! let rows = client.download_indicator("NY.GDP.MKTP.CD", "2023:2010")?;
//! # Ok::<(), wbduck::Error>(())
//! ```
use crate::config::{ApiConfig, DEFAULT_PER_PAGE, INDICATORS_PER_PAGE};
use crate::error::{Error, Result};
use crate::models::{IndicatorInfo, IndicatorRecord, Page, PageInfo, SourceInfo};
use log::{debug, info, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Safety cap to avoid pathological jobs.
pub const MAX_PAGES: u32 = 1000;

/// Retrieves the raw body behind one page URL.
pub trait PageFetcher {
    /// Returns the body of a `200 OK` response, or an error for anything else.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`PageFetcher`] over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: HttpClient,
}

impl HttpFetcher {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = HttpClient::builder()
            .redirect(Policy::limited(5))
            .user_agent(concat!("wbduck/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| Error::Transport {
            url: config.base_url.clone(),
            source,
        })?;
        Ok(Self { http })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {url}");
        let transport = |source| Error::Transport {
            url: url.to_string(),
            source,
        };
        let resp = self.http.get(url).send().map_err(transport)?;
        if resp.status() != StatusCode::OK {
            return Err(Error::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }
        Ok(resp.bytes().map_err(transport)?.to_vec())
    }
}

/// Decode a `[page info, records]` response body.
///
/// The top-level array must have exactly two elements. Each slot is then decoded on
/// its own; a single malformed record rejects the whole page. A `null` second slot
/// (what the API sends for an empty result) decodes as no records. An error payload
/// (`[{"message": [...]}]`) surfaces as [`Error::Api`].
pub fn parse_page<T: DeserializeOwned>(body: &[u8]) -> Result<Page<T>> {
    let slots: Vec<Value> = serde_json::from_slice(body)?;

    if let Some(message) = slots.first().and_then(|v| v.get("message")) {
        return Err(Error::Api(api_message(message)));
    }

    let [info, records]: [Value; 2] = slots
        .try_into()
        .map_err(|v: Vec<Value>| Error::Shape(v.len()))?;

    let info: PageInfo = serde_json::from_value(info)?;
    let records: Option<Vec<T>> = serde_json::from_value(records)?;
    Ok(Page {
        info,
        records: records.unwrap_or_default(),
    })
}

// The API nests messages as [{"id": "120", "key": "...", "value": "..."}].
fn api_message(message: &Value) -> String {
    let parts: Vec<&str> = message
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|m| m.get("value").and_then(Value::as_str))
        .collect();
    if parts.is_empty() {
        message.to_string()
    } else {
        parts.join("; ")
    }
}

// Allow -, _, . and : unescaped (indicator ids and year ranges)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b':');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

#[derive(Debug, Clone)]
pub struct Client<F = HttpFetcher> {
    pub base_url: String,
    pub per_page: u32,
    fetcher: F,
}

impl Client<HttpFetcher> {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self::with_fetcher(config, HttpFetcher::new(config)?))
    }
}

impl<F: PageFetcher> Client<F> {
    pub fn with_fetcher(config: &ApiConfig, fetcher: F) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page.max(1),
            fetcher,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn indicator_url(&self, code: &str, timeframe: &str, page: u32) -> String {
        format!(
            "{}/country/all/indicator/{}?format=json&date={}&per_page={}&page={}",
            self.base_url,
            enc(code),
            enc(timeframe),
            self.per_page,
            page
        )
    }

    pub fn sources_url(&self) -> String {
        format!(
            "{}/sources?format=json&per_page={}",
            self.base_url, DEFAULT_PER_PAGE
        )
    }

    pub fn source_indicators_url(&self, source_id: u32) -> String {
        format!(
            "{}/sources/{}/indicators?format=json&per_page={}",
            self.base_url, source_id, INDICATORS_PER_PAGE
        )
    }

    fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>> {
        let body = self.fetcher.fetch(url)?;
        parse_page(&body)
    }

    /// Download every observation of `code` within `timeframe`.
    ///
    /// Page 1 decides how many pages follow; pages 2..=N are fetched one after the
    /// other and appended in arrival order. The first failure aborts the download
    /// and no partial result is returned.
    ///
    /// ### Errors
    /// - Network/HTTP error on any page
    /// - JSON shape or decoding error on any page
    /// - More than [`MAX_PAGES`] pages advertised
    pub fn download_indicator(&self, code: &str, timeframe: &str) -> Result<Vec<IndicatorRecord>> {
        let first: Page<IndicatorRecord> = self.fetch_page(&self.indicator_url(code, timeframe, 1))?;
        let PageInfo { pages, total, .. } = first.info;
        if pages > MAX_PAGES {
            return Err(Error::PageLimit(MAX_PAGES));
        }
        info!("page 1/{} ({total} records total)", pages.max(1));

        let mut out = first.records;
        for page in 2..=pages {
            // Later pages' metadata is decoded but only page 1 is trusted.
            let next: Page<IndicatorRecord> =
                self.fetch_page(&self.indicator_url(code, timeframe, page))?;
            info!("page {page}/{pages} ({total} records total)");
            out.extend(next.records);
        }

        if out.len() != total as usize {
            warn!(
                "{code}: received {} records, first page advertised {total}",
                out.len()
            );
        }
        Ok(out)
    }

    /// All data sources known to the API.
    pub fn list_sources(&self) -> Result<Vec<SourceInfo>> {
        self.fetch_listing(&self.sources_url())
    }

    /// Indicators published by one source.
    pub fn list_indicators(&self, source_id: u32) -> Result<Vec<IndicatorInfo>> {
        self.fetch_listing(&self.source_indicators_url(source_id))
    }

    // Listings are a single call sized to fit everything.
    fn fetch_listing<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let page: Page<T> = self.fetch_page(url)?;
        if page.info.pages > 1 {
            warn!(
                "listing truncated: showing page 1 of {} ({} of {} entries)",
                page.info.pages,
                page.records.len(),
                page.info.total
            );
        }
        Ok(page.records)
    }
}
