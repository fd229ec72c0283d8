//! CNB (Czech National Bank) daily exchange rate provider.
//!
//! The rate table is plain text, one currency per line:
//!
//! ```text
//! 02.01.2024 #1
//! země|měna|množství|kód|kurz
//! EMU|euro|1|EUR|24,725
//! Japonsko|jen|100|JPY|15,812
//! ```
//!
//! The rate is `kurz / množství`: CZK per one unit of the foreign currency.

use super::http::Transport;
use super::provider::{FetchError, RateSource};
use crate::config::UrlTemplate;
use chrono::NaiveDate;
use std::sync::Arc;

/// Exchange rates from the CNB daily fixing.
pub struct CnbRateProvider {
    transport: Arc<Transport>,
    url: UrlTemplate,
}

impl CnbRateProvider {
    pub fn new(transport: Arc<Transport>, url: UrlTemplate) -> Self {
        Self { transport, url }
    }
}

impl RateSource for CnbRateProvider {
    fn name(&self) -> &str {
        "cnb"
    }

    fn fetch_rate(&self, date: NaiveDate, currency: &str) -> Result<f64, FetchError> {
        let url = self.url.render(date);
        let text = self.transport.get_text(&url)?;
        parse_rate_table(&text, currency)?.ok_or_else(|| FetchError::CurrencyNotListed {
            currency: currency.to_string(),
            url,
        })
    }
}

/// Find `currency` in a rate table. `Ok(None)` when no row lists it.
pub fn parse_rate_table(text: &str, currency: &str) -> Result<Option<f64>, FetchError> {
    for line in text.lines() {
        let columns: Vec<&str> = line.split('|').collect();
        if columns.len() < 5 || columns[3].trim() != currency {
            continue;
        }

        let amount = parse_number(columns[2]).ok_or_else(|| {
            FetchError::ResponseFormatChanged(format!("bad amount '{}' for {currency}", columns[2]))
        })?;
        let price = parse_number(columns[4]).ok_or_else(|| {
            FetchError::ResponseFormatChanged(format!("bad rate '{}' for {currency}", columns[4]))
        })?;
        if amount <= 0.0 {
            return Err(FetchError::ResponseFormatChanged(format!(
                "non-positive amount {amount} for {currency}"
            )));
        }
        return Ok(Some(price / amount));
    }
    Ok(None)
}

/// Parse a decimal-comma number, ignoring digit-group spaces.
fn parse_number(field: &str) -> Option<f64> {
    let normalized: String = field
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
