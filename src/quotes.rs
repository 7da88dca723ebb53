//! Daily closing prices from Stooq's CSV download endpoint.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};

const BASE_URL: &str = "https://stooq.com";

/// One trading session: date plus closing price. A close can be missing
/// on rows the provider ships without a usable numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

/// Anything that can produce a chronological daily close series for one
/// instrument over a date range. The transport is the implementor's
/// concern; callers only rely on ordering and the close field.
pub trait QuoteSource {
    fn daily_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>>;
}

/// Stooq daily-quote client.
pub struct StooqClient {
    client: Client,
}

impl StooqClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self { client }
    }
}

impl Default for StooqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteSource for StooqClient {
    fn daily_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        let symbol = stooq_symbol(ticker);
        let url = format!("{}/q/d/l/", BASE_URL);

        info!("Requesting daily closes for {} ({} to {})", symbol, start, end);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("s", symbol.as_str()),
                ("d1", &start.format("%Y%m%d").to_string()),
                ("d2", &end.format("%Y%m%d").to_string()),
                ("i", "d"),
            ])
            .send()
            .map_err(|e| Error::DataUnavailable {
                ticker: ticker.to_string(),
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::DataUnavailable {
                ticker: ticker.to_string(),
                detail: format!("quote request failed: {}", response.status()),
            });
        }

        let body = response.text().map_err(|e| Error::DataUnavailable {
            ticker: ticker.to_string(),
            detail: e.to_string(),
        })?;

        let points = parse_daily_csv(&body);

        if points.is_empty() {
            return Err(Error::DataUnavailable {
                ticker: ticker.to_string(),
                detail: "quote source returned zero rows".to_string(),
            });
        }

        Ok(points)
    }
}

/// Stooq expects lowercase symbols with a market suffix; bare US tickers
/// get ".us" appended.
fn stooq_symbol(ticker: &str) -> String {
    let lower = ticker.to_ascii_lowercase();
    if lower.contains('.') {
        lower
    } else {
        format!("{}.us", lower)
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Close")]
    close: String,
}

/// Normalize the provider's CSV body into a chronological price series.
///
/// Rows whose close fails to parse as a finite number keep their date
/// with `close: None`; rows that cannot be read at all are dropped.
/// An unrecognizable body (e.g. Stooq's "No data" response) yields an
/// empty series, which the caller treats as a no-data condition.
pub fn parse_daily_csv(body: &str) -> Vec<PricePoint> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut points: Vec<PricePoint> = reader
        .deserialize::<CsvRow>()
        .filter_map(|row| row.ok())
        .map(|row| PricePoint {
            date: row.date,
            close: row.close.trim().parse::<f64>().ok().filter(|c| c.is_finite()),
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points.dedup_by_key(|p| p.date);
    points
}
