//! OTE (Czech electricity market operator) day-ahead price provider.
//!
//! The chart-data endpoint returns several named data lines per day (volumes,
//! prices, ...). Only price lines are kept; their title carries the currency,
//! e.g. `Cena (EUR/MWh)`. A point without `y` means nothing was published for
//! that hour.

use super::http::Transport;
use super::provider::{FetchError, PriceSource};
use crate::config::UrlTemplate;
use crate::domain::{PriceLine, RawPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

/// Title prefixes of the lines that carry prices.
const PRICE_LINE_PREFIXES: [&str; 2] = ["Cena", "Price"];

#[derive(Debug, Deserialize)]
struct ChartResponse {
    data: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(rename = "dataLine", default)]
    data_line: Vec<DataLine>,
}

#[derive(Debug, Deserialize)]
struct DataLine {
    #[serde(default)]
    title: String,
    #[serde(default)]
    point: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct Point {
    #[serde(deserialize_with = "hour_from_number_or_string")]
    x: u32,
    #[serde(default)]
    y: Option<f64>,
}

/// The endpoint has sent the hour both as `3` and as `"3"`.
fn hour_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hour {
        Number(u32),
        Text(String),
    }

    match Hour::deserialize(deserializer)? {
        Hour::Number(h) => Ok(h),
        Hour::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Day-ahead prices from the OTE chart-data endpoint.
pub struct OtePriceProvider {
    transport: Arc<Transport>,
    url: UrlTemplate,
}

impl OtePriceProvider {
    pub fn new(transport: Arc<Transport>, url: UrlTemplate) -> Self {
        Self { transport, url }
    }
}

impl PriceSource for OtePriceProvider {
    fn name(&self) -> &str {
        "ote"
    }

    fn fetch_day(&self, date: NaiveDate) -> Result<Vec<PriceLine>, FetchError> {
        let url = self.url.render(date);
        let body = self.transport.get_text(&url)?;
        parse_chart_data(&body).map_err(|e| match e {
            FetchError::ResponseFormatChanged(msg) => {
                FetchError::ResponseFormatChanged(format!("{url}: {msg}"))
            }
            other => other,
        })
    }
}

/// Parse a chart-data JSON body into its price lines.
pub fn parse_chart_data(body: &str) -> Result<Vec<PriceLine>, FetchError> {
    let chart: ChartResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::ResponseFormatChanged(format!("failed to parse chart data: {e}")))?;

    Ok(chart
        .data
        .data_line
        .into_iter()
        .filter(|line| is_price_line(&line.title))
        .map(|line| PriceLine {
            unit: currency_label(&line.title).to_string(),
            points: line
                .point
                .into_iter()
                .map(|p| RawPoint {
                    hour: p.x,
                    price: p.y,
                })
                .collect(),
            title: line.title,
        })
        .collect())
}

fn is_price_line(title: &str) -> bool {
    PRICE_LINE_PREFIXES.iter().any(|p| title.starts_with(p))
}

/// Currency label from a title such as `Cena (EUR/MWh)`.
///
/// Titles without a `(CUR/unit)` suffix yield the whole title, which the
/// converter then rejects.
pub fn currency_label(title: &str) -> &str {
    title
        .split_once('(')
        .and_then(|(_, rest)| rest.split(['/', ')']).next())
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(title)
}
