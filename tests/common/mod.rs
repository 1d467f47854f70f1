#![allow(dead_code)]

use serde_json::{Value, json};
use std::cell::RefCell;
use wbduck::{ApiConfig, Client, Error, PageFetcher, Result};

/// Serves canned bodies keyed by the `page=` query parameter and records every URL.
pub struct ScriptedApi {
    pages: Vec<Vec<u8>>,
    fail_page: Option<u32>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedApi {
    pub fn new(pages: Vec<Vec<u8>>) -> Self {
        Self {
            pages,
            fail_page: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Answer `page` with a transport-style failure.
    pub fn failing_on(mut self, page: u32) -> Self {
        self.fail_page = Some(page);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

fn page_param(url: &str) -> u32 {
    url.split(['?', '&'])
        .find_map(|kv| kv.strip_prefix("page="))
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

impl PageFetcher for ScriptedApi {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push(url.to_string());
        let page = page_param(url);
        if self.fail_page == Some(page) {
            return Err(Error::Api(format!("scripted failure on page {page}")));
        }
        self.pages
            .get(page as usize - 1)
            .cloned()
            .ok_or_else(|| Error::Api(format!("no scripted page {page}")))
    }
}

pub fn client(api: ScriptedApi) -> Client<ScriptedApi> {
    let config = ApiConfig {
        base_url: "https://api.test/v2".into(),
        per_page: 2,
        timeout: None,
    };
    Client::with_fetcher(&config, api)
}

/// One observation: (country name, iso3, date, value).
pub type Obs<'a> = (&'a str, &'a str, &'a str, Option<f64>);

pub fn record(indicator: &str, (name, iso3, date, value): Obs) -> Value {
    json!({
        "indicator": {"id": indicator, "value": "Test indicator"},
        "country": {"id": iso3.get(..2).unwrap_or(iso3), "value": name},
        "countryiso3code": iso3,
        "date": date,
        "value": value,
        "unit": "",
        "obs_status": "",
        "decimal": 1
    })
}

pub fn page_body(page: u32, pages: u32, total: u32, obs: &[Obs]) -> Vec<u8> {
    let records: Vec<Value> = obs.iter().map(|o| record("NY.GDP.MKTP.CD", *o)).collect();
    serde_json::to_vec(&json!([
        {
            "page": page,
            "pages": pages,
            "per_page": 2,
            "total": total,
            "sourceid": "2",
            "lastupdated": "2024-06-28"
        },
        records
    ]))
    .unwrap()
}

/// `pages` pages of two records each, countries C1, C2, ... in order.
pub fn paged_api(pages: u32) -> ScriptedApi {
    let total = pages * 2;
    let bodies = (1..=pages)
        .map(|p| {
            let a = format!("C{}", 2 * p - 1);
            let b = format!("C{}", 2 * p);
            page_body(
                p,
                pages,
                total,
                &[
                    (a.as_str(), "AAA", "2020", Some(p as f64)),
                    (b.as_str(), "BBB", "2020", Some(p as f64 + 0.5)),
                ],
            )
        })
        .collect();
    ScriptedApi::new(bodies)
}

pub fn empty_api() -> ScriptedApi {
    let body = serde_json::to_vec(&json!([
        {"page": 1, "pages": 0, "per_page": 2, "total": 0, "sourceid": null, "lastupdated": "2024-06-28"},
        null
    ]))
    .unwrap();
    ScriptedApi::new(vec![body])
}
