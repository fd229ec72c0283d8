//! Download loop: day by day from the resume point, with periodic checkpoints.

use super::provider::{DownloadProgress, PriceSource, RateSource};
use super::store::{DatasetStore, StoreError};
use crate::config::DumpConfig;
use crate::convert::{convert_labeled, ConvertError};
use crate::domain::{Dataset, DatasetError, PricePoint};
use chrono::NaiveDate;
use log::{info, warn};
use thiserror::Error;

/// Conditions that stop the loop. Fetch failures are not among them.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Resolved bounds of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DumpPlan {
    /// First day when the store holds no data yet.
    pub start: NaiveDate,
    /// Exclusive end.
    pub end: NaiveDate,
    /// Currency the day's rate is looked up for.
    pub currency: String,
    pub checkpoint_interval: chrono::Duration,
}

impl DumpPlan {
    /// Resolve a config against `today`: a missing end date becomes tomorrow.
    pub fn from_config(config: &DumpConfig, today: NaiveDate) -> Self {
        Self {
            start: config.start_date,
            end: config.resolved_end(today),
            currency: config.currency.clone(),
            checkpoint_interval: chrono::Duration::days(config.checkpoint_interval_days),
        }
    }
}

/// Summary of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DumpSummary {
    /// Day the loop started from (resume point or configured start).
    pub first_day: Option<NaiveDate>,
    pub days_attempted: usize,
    /// Days whose price fetch failed; they contributed no rows.
    pub days_failed: usize,
    /// Days with prices but no exchange rate; derived prices are missing.
    pub days_without_rate: usize,
    pub rows_added: usize,
    pub total_rows: usize,
    pub checkpoints: usize,
    /// Where the next run will continue.
    pub next_day: Option<NaiveDate>,
}

/// Prices of one day after conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    Fetched {
        rows: Vec<PricePoint>,
        /// `Some(false)` when the rate lookup failed, `None` when no lookup was needed.
        rate_known: Option<bool>,
    },
    Failed,
}

/// Fetch and convert one day.
///
/// The rate is looked up at most once, and only if the day has a price line. A failed
/// price fetch is reported and yields `DayOutcome::Failed`; a failed rate lookup is
/// reported and leaves the derived prices missing.
pub fn fetch_day_rows(
    prices: &dyn PriceSource,
    rates: &dyn RateSource,
    date: NaiveDate,
    currency: &str,
) -> Result<DayOutcome, ConvertError> {
    let lines = match prices.fetch_day(date) {
        Ok(lines) => lines,
        Err(e) => {
            warn!("failed to fetch {} prices for {date}: {e}", prices.name());
            return Ok(DayOutcome::Failed);
        }
    };

    let mut rate: Option<Option<f64>> = None;
    let mut rows = Vec::new();

    for line in &lines {
        let day_rate = *rate.get_or_insert_with(|| match rates.fetch_rate(date, currency) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!("no {} {currency} rate for {date}: {e}", rates.name());
                None
            }
        });

        for point in &line.points {
            let pair = convert_labeled(point.price, &line.unit, day_rate)?;
            rows.push(PricePoint::new(date, point.hour, pair));
        }
    }

    Ok(DayOutcome::Fetched {
        rows,
        rate_known: rate.map(|r| r.is_some()),
    })
}

/// Download every day from the resume point up to `plan.end`.
///
/// Existing data in `store` is authoritative: when it holds rows, the loop continues
/// from the day after the last one and `plan.start` is ignored. The dataset is
/// written whenever more than `plan.checkpoint_interval` passed since the previous
/// checkpoint, and once more at the end.
pub fn dump_all(
    prices: &dyn PriceSource,
    rates: &dyn RateSource,
    store: &DatasetStore,
    plan: &DumpPlan,
    progress: &dyn DownloadProgress,
) -> Result<DumpSummary, DumpError> {
    let (resume, rows) = store.load()?;
    let mut dataset = Dataset::from_rows(rows);

    let mut cur = match resume {
        Some(date) => {
            info!(
                "resuming {} from {date} ({} rows stored)",
                store.path().display(),
                dataset.len()
            );
            date
        }
        None => plan.start,
    };
    let mut last_saved = cur;

    let mut summary = DumpSummary {
        first_day: Some(cur),
        ..DumpSummary::default()
    };

    while cur < plan.end {
        progress.on_day_start(cur);
        summary.days_attempted += 1;

        let added = match fetch_day_rows(prices, rates, cur, &plan.currency)? {
            DayOutcome::Fetched { rows, rate_known } => {
                if rate_known == Some(false) {
                    summary.days_without_rate += 1;
                }
                dataset.append_day(cur, rows)?
            }
            DayOutcome::Failed => {
                summary.days_failed += 1;
                0
            }
        };
        summary.rows_added += added;
        progress.on_day_complete(cur, added);

        if cur - last_saved > plan.checkpoint_interval {
            store.save(dataset.rows())?;
            summary.checkpoints += 1;
            progress.on_checkpoint(cur, store.path(), dataset.len());
            last_saved = cur;
        }

        match cur.succ_opt() {
            Some(next) => cur = next,
            None => break,
        }
    }

    store.save(dataset.rows())?;
    summary.checkpoints += 1;
    progress.on_checkpoint(cur, store.path(), dataset.len());

    summary.total_rows = dataset.len();
    summary.next_day = Some(dataset.resume_date().unwrap_or(plan.start));
    progress.on_finish(&summary);

    Ok(summary)
}
