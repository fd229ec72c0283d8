//! CSV dataset store.
//!
//! Layout: one file, header `year,month,day,hour,price_eur,price_czk`, one row per
//! published hour. Missing prices are empty fields.
//!
//! Writes are atomic: the table goes to `{path}.tmp` and is renamed into place, so
//! an interrupted checkpoint never damages the file the next run resumes from.

use crate::domain::PricePoint;
use chrono::NaiveDate;
use log::info;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HEADER: [&str; 6] = ["year", "month", "day", "hour", "price_eur", "price_czk"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dataset I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("dataset CSV in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("dataset {path} ends with an invalid date {year}-{month}-{day}")]
    InvalidDate {
        path: PathBuf,
        year: i32,
        month: u32,
        day: u32,
    },
}

/// The persisted dataset file.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Load stored rows and the day after the last one.
    ///
    /// A missing file is not an error: it yields no resume date and no rows. So does
    /// a file holding only the header.
    pub fn load(&self) -> Result<(Option<NaiveDate>, Vec<PricePoint>), StoreError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((None, Vec::new())),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let rows = read_csv(file).map_err(|source| StoreError::Csv {
            path: self.path.clone(),
            source,
        })?;

        let resume = match rows.last() {
            None => None,
            Some(last) => {
                let date = last.date().ok_or_else(|| StoreError::InvalidDate {
                    path: self.path.clone(),
                    year: last.year,
                    month: last.month,
                    day: last.day,
                })?;
                date.succ_opt()
            }
        };

        Ok((resume, rows))
    }

    /// Overwrite the file with `rows`.
    pub fn save(&self, rows: &[PricePoint]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = self.tmp_path();
        let io_err = |source: std::io::Error| StoreError::Io {
            path: tmp_path.clone(),
            source,
        };

        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        write_csv(&mut file, rows).map_err(|source| StoreError::Csv {
            path: tmp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        })?;

        match rows.last().and_then(PricePoint::date) {
            Some(last) => info!(
                "saved {} rows up to {last} to {}",
                rows.len(),
                self.path.display()
            ),
            None => info!("saved empty dataset to {}", self.path.display()),
        }
        Ok(())
    }
}

/// Write the header and `rows`. Date and hour columns are integers.
pub fn write_csv<W: Write>(writer: W, rows: &[PricePoint]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a table written by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<PricePoint>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    rdr.deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, hour: u32, eur: Option<f64>, czk: Option<f64>) -> PricePoint {
        PricePoint {
            year: 2024,
            month: 1,
            day,
            hour,
            price_eur: eur,
            price_czk: czk,
        }
    }

    #[test]
    fn writes_integer_date_columns_and_empty_missing() {
        let mut out = Vec::new();
        write_csv(
            &mut out,
            &[
                row(2, 3, Some(50.0), Some(1250.0)),
                row(2, 4, None, None),
            ],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "year,month,day,hour,price_eur,price_czk\n\
             2024,1,2,3,50.0,1250.0\n\
             2024,1,2,4,,\n"
        );
    }

    #[test]
    fn empty_table_is_header_only() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "year,month,day,hour,price_eur,price_czk\n"
        );
    }

    #[test]
    fn reads_back_missing_as_none() {
        let text = "year,month,day,hour,price_eur,price_czk\n2024,1,2,4,,\n2024,1,2,5,1.5,\n";
        let rows = read_csv(text.as_bytes()).unwrap();
        assert_eq!(rows, vec![row(2, 4, None, None), row(2, 5, Some(1.5), None)]);
    }

    #[test]
    fn rejects_non_integer_hour() {
        let text = "year,month,day,hour,price_eur,price_czk\n2024,1,2,four,1.0,25.0\n";
        assert!(read_csv(text.as_bytes()).is_err());
    }
}
