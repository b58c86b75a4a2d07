//! Runtime configuration.
//!
//! Every value has a default; `AnalyticsConfig::from_env` overrides them from `SALES_*`
//! environment variables:
//!
//! - `SALES_OUTPUT_DIR` (default: `output`)
//! - `SALES_TOP_N` (default: 5)
//! - `SALES_LOW_THRESHOLD` (default: 10)
//! - `SALES_NO_PROMPT` (default: false)
//! - `SALES_CATALOG_OFFLINE` (default: false)
//! - `SALES_CATALOG_URL` (default: `https://dummyjson.com`)
//! - `SALES_CATALOG_TIMEOUT_SECS` (default: 10)
//! - `SALES_CATALOG_RANGE` as `start-end` (default: unset, one lookup per product)

use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::ingestion::TextEncoding;

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub thousands_separators: Vec<char>,
    pub encodings: Vec<TextEncoding>,
    pub top_n: usize,
    pub low_performer_threshold: i64,
    pub output_dir: PathBuf,
    pub report_file: String,
    pub enriched_file: String,
    pub currency_symbol: String,
    /// Ask for filters on stdin when it is a terminal.
    pub interactive: bool,
    /// `None` disables enrichment.
    pub catalog: Option<CatalogConfig>
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// When set, the whole range is fetched in one batch request instead of per product.
    pub id_range: Option<RangeInclusive<u32>>,
    pub cache_capacity: u64,
    pub cache_ttl: Duration
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            thousands_separators: vec![','],
            encodings: vec![TextEncoding::Utf8Bom, TextEncoding::Utf8, TextEncoding::Latin1],
            top_n: 5,
            low_performer_threshold: 10,
            output_dir: PathBuf::from("output"),
            report_file: "sales_report.txt".to_string(),
            enriched_file: "enriched_sales_data.txt".to_string(),
            currency_symbol: "₹".to_string(),
            interactive: true,
            catalog: Some(CatalogConfig::default())
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dummyjson.com".to_string(),
            timeout: Duration::from_secs(10),
            id_range: None,
            cache_capacity: 1_024,
            cache_ttl: Duration::from_secs(600)
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("SALES_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        config.top_n = parsed(&lookup, "SALES_TOP_N").unwrap_or(config.top_n);
        config.low_performer_threshold = parsed(&lookup, "SALES_LOW_THRESHOLD").unwrap_or(config.low_performer_threshold);
        config.interactive = !parsed(&lookup, "SALES_NO_PROMPT").unwrap_or(false);

        if parsed(&lookup, "SALES_CATALOG_OFFLINE").unwrap_or(false) {
            config.catalog = None;
            return config;
        }

        let mut catalog = CatalogConfig::default();

        if let Some(url) = lookup("SALES_CATALOG_URL") {
            catalog.base_url = url;
        }

        if let Some(seconds) = parsed::<u64, _>(&lookup, "SALES_CATALOG_TIMEOUT_SECS") {
            catalog.timeout = Duration::from_secs(seconds);
        }

        catalog.id_range = lookup("SALES_CATALOG_RANGE").and_then(|value| parse_range(&value));
        config.catalog = Some(catalog);

        config
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }

    pub fn enriched_path(&self) -> PathBuf {
        self.output_dir.join(&self.enriched_file)
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>
{
    let value = lookup(key)?;

    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid value [{value}] for {key}");
            None
        }
    }
}

/// Parses `start-end` into an inclusive range of positive identifiers.
pub fn parse_range(value: &str) -> Option<RangeInclusive<u32>> {
    let (start, end) = value.split_once('-')?;
    let start: u32 = start.trim().parse().ok()?;
    let end: u32 = end.trim().parse().ok()?;

    (start > 0 && start <= end).then_some(start..=end)
}
