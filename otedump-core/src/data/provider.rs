//! Provider traits, fetch errors, and progress reporting.
//!
//! `PriceSource` and `RateSource` abstract over the OTE and CNB endpoints so the
//! download loop can run against in-memory sources in tests.

use super::download::DumpSummary;
use crate::domain::PriceLine;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Why a fetch produced no data. Never fatal to the download loop.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("response from {url} doesn't contain {currency}")]
    CurrencyNotListed { currency: String, url: String },
}

/// Source of day-ahead price lines.
pub trait PriceSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch all price lines published for `date`.
    fn fetch_day(&self, date: NaiveDate) -> Result<Vec<PriceLine>, FetchError>;
}

/// Source of daily exchange rates.
pub trait RateSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Local currency units per one unit of `currency` on `date`.
    fn fetch_rate(&self, date: NaiveDate, currency: &str) -> Result<f64, FetchError>;
}

/// Progress callbacks for the download loop.
pub trait DownloadProgress {
    /// Called before a day is fetched.
    fn on_day_start(&self, date: NaiveDate);

    /// Called after a day's rows were appended (zero when the day failed).
    fn on_day_complete(&self, date: NaiveDate, rows: usize);

    /// Called after the dataset was written to disk.
    fn on_checkpoint(&self, up_to: NaiveDate, path: &Path, rows: usize);

    /// Called once when the loop is done.
    fn on_finish(&self, summary: &DumpSummary);
}

/// Terminal progress: one line rewritten in place per day, one kept line per checkpoint.
pub struct StdoutProgress;

impl DownloadProgress for StdoutProgress {
    fn on_day_start(&self, date: NaiveDate) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "Downloading ... {date}\x1b[K\r");
        let _ = out.flush();
    }

    fn on_day_complete(&self, _date: NaiveDate, _rows: usize) {}

    fn on_checkpoint(&self, up_to: NaiveDate, path: &Path, _rows: usize) {
        println!("Saved up to {up_to} ... {}\x1b[K", path.display());
    }

    fn on_finish(&self, summary: &DumpSummary) {
        println!(
            "\nDownload complete: {} days, {} failed, {} without rate, {} rows added",
            summary.days_attempted,
            summary.days_failed,
            summary.days_without_rate,
            summary.rows_added
        );
    }
}

/// Reports nothing.
pub struct SilentProgress;

impl DownloadProgress for SilentProgress {
    fn on_day_start(&self, _date: NaiveDate) {}
    fn on_day_complete(&self, _date: NaiveDate, _rows: usize) {}
    fn on_checkpoint(&self, _up_to: NaiveDate, _path: &Path, _rows: usize) {}
    fn on_finish(&self, _summary: &DumpSummary) {}
}
