use crate::error::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Pagination metadata returned by the API (position 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub page: u32,
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub pages: u32,
    /// Data endpoints send numbers, listing endpoints send strings.
    /// Accept both and normalize to `u32`.
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub total: u32,
    #[serde(default, rename = "sourceid")]
    pub source_id: Option<String>,
    #[serde(default, rename = "lastupdated")]
    pub last_updated: Option<String>,
}

impl PageInfo {
    /// `lastupdated` as a date, when the API sent one in `YYYY-MM-DD` form.
    pub fn last_updated_date(&self) -> Option<NaiveDate> {
        self.last_updated
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }
}

/// Serde helper: parse `u32` from either a JSON number or a string.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl Visitor<'_> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom("negative or oversized value for u32"))
        }

        fn visit_str<E>(self, s: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeName {
    pub id: String,
    pub value: String,
}

/// One observation from `country/all/indicator/{code}` (position 1 array).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub indicator: CodeName,
    pub country: CodeName,
    pub countryiso3code: String,
    /// Period label, usually a year (`"2020"`).
    pub date: String,
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, rename = "obs_status")]
    pub obs_status: Option<String>,
    #[serde(default)]
    pub decimal: Option<i32>,
}

/// A data source, as listed by `/sources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "lastupdated")]
    pub last_updated: Option<String>,
    #[serde(default, rename = "dataavailability")]
    pub data_availability: Option<String>,
    #[serde(default, rename = "metadataavailability")]
    pub metadata_availability: Option<String>,
    #[serde(default)]
    pub concepts: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// Indicator metadata, as listed by `/sources/{id}/indicators`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub source: Option<CodeName>,
    #[serde(default, rename = "sourceNote")]
    pub source_note: Option<String>,
    #[serde(default, rename = "sourceOrganization")]
    pub source_organization: Option<String>,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// A decoded response: pagination metadata plus the records of that page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub info: PageInfo,
    pub records: Vec<T>,
}

/// Long-format row fed to the pivot: one (entity, year, value) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct StagingRow {
    pub name: String,
    pub iso3: String,
    pub year: i32,
    pub value: Option<f64>,
}

impl TryFrom<&IndicatorRecord> for StagingRow {
    type Error = Error;

    fn try_from(r: &IndicatorRecord) -> Result<Self> {
        Ok(Self {
            name: r.country.value.clone(),
            iso3: r.countryiso3code.clone(),
            year: period_year(&r.date)?,
            value: r.value,
        })
    }
}

static PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:Q[1-4]|M(?:0[1-9]|1[0-2])|-(?:0[1-9]|1[0-2])(?:-(?:0[1-9]|[12]\d|3[01]))?)?$")
        .unwrap()
});

/// Year of a period label.
///
/// Accepts `YYYY`, quarterly `YYYYQn`, monthly `YYYYMnn` and `YYYY-MM[-DD]`;
/// sub-annual periods collapse onto their year. Anything else is rejected.
pub fn period_year(period: &str) -> Result<i32> {
    let period = period.trim();
    PERIOD
        .captures(period)
        .and_then(|c| c[1].parse::<i32>().ok())
        .ok_or_else(|| Error::InvalidPeriod(period.to_string()))
}
