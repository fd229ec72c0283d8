//! Dataset — the accumulated price history, appended one day at a time.

use super::price::PricePoint;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("day {day} does not follow the last stored day {last}")]
    OutOfOrder { day: NaiveDate, last: NaiveDate },

    #[error("row dated {row} appended under day {day}")]
    ForeignRow { day: NaiveDate, row: String },
}

/// Ordered price rows. Days only ever grow; the whole set is rewritten on save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<PricePoint>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap rows loaded from storage. Rows are taken as stored.
    pub fn from_rows(rows: Vec<PricePoint>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PricePoint] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<PricePoint> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().and_then(PricePoint::date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().and_then(PricePoint::date)
    }

    /// The day after the last stored row.
    pub fn resume_date(&self) -> Option<NaiveDate> {
        self.last_date().and_then(|d| d.succ_opt())
    }

    /// Append one day's rows. Returns the number of rows added.
    ///
    /// `day` must be later than the last stored day and every row must be dated `day`.
    /// An empty day is accepted and leaves the dataset untouched.
    pub fn append_day(&mut self, day: NaiveDate, rows: Vec<PricePoint>) -> Result<usize, DatasetError> {
        if rows.is_empty() {
            return Ok(0);
        }
        if let Some(last) = self.last_date() {
            if day <= last {
                return Err(DatasetError::OutOfOrder { day, last });
            }
        }
        if let Some(row) = rows.iter().find(|r| r.date() != Some(day)) {
            return Err(DatasetError::ForeignRow {
                day,
                row: format!("{:04}-{:02}-{:02}", row.year, row.month, row.day),
            });
        }

        let added = rows.len();
        self.rows.extend(rows);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::PricePair;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rows_for(day: NaiveDate, hours: u32) -> Vec<PricePoint> {
        (1..=hours)
            .map(|h| {
                PricePoint::new(
                    day,
                    h,
                    PricePair {
                        eur: Some(h as f64),
                        czk: Some(h as f64 * 25.0),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn empty_dataset_has_no_resume_date() {
        let ds = Dataset::new();
        assert!(ds.is_empty());
        assert_eq!(ds.resume_date(), None);
    }

    #[test]
    fn resume_date_is_day_after_last_row() {
        let mut ds = Dataset::new();
        ds.append_day(d(2023, 12, 31), rows_for(d(2023, 12, 31), 24))
            .unwrap();
        assert_eq!(ds.len(), 24);
        assert_eq!(ds.first_date(), Some(d(2023, 12, 31)));
        assert_eq!(ds.resume_date(), Some(d(2024, 1, 1)));
    }

    #[test]
    fn rejects_day_not_after_last() {
        let mut ds = Dataset::new();
        ds.append_day(d(2024, 3, 2), rows_for(d(2024, 3, 2), 2)).unwrap();

        let err = ds
            .append_day(d(2024, 3, 2), rows_for(d(2024, 3, 2), 2))
            .unwrap_err();
        assert_eq!(
            err,
            DatasetError::OutOfOrder {
                day: d(2024, 3, 2),
                last: d(2024, 3, 2)
            }
        );
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn rejects_rows_from_another_day() {
        let mut ds = Dataset::new();
        let err = ds
            .append_day(d(2024, 3, 3), rows_for(d(2024, 3, 4), 1))
            .unwrap_err();
        assert!(matches!(err, DatasetError::ForeignRow { .. }));
        assert!(ds.is_empty());
    }

    #[test]
    fn empty_day_is_a_no_op() {
        let mut ds = Dataset::new();
        ds.append_day(d(2024, 3, 5), rows_for(d(2024, 3, 5), 3)).unwrap();
        // Even an earlier day is fine when it carries no rows.
        assert_eq!(ds.append_day(d(2024, 3, 1), Vec::new()), Ok(0));
        assert_eq!(ds.len(), 3);
    }
}
