//! Integration tests for the CSV dataset store: resume point, round trip, idempotent saves.

use chrono::NaiveDate;
use otedump_core::data::{DatasetStore, StoreError};
use otedump_core::PricePoint;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn sample_rows() -> Vec<PricePoint> {
    vec![
        PricePoint {
            year: 2009,
            month: 1,
            day: 31,
            hour: 1,
            price_eur: Some(40.0),
            price_czk: Some(1106.8),
        },
        PricePoint {
            year: 2009,
            month: 1,
            day: 31,
            hour: 2,
            price_eur: None,
            price_czk: None,
        },
        PricePoint {
            year: 2009,
            month: 2,
            day: 1,
            hour: 25,
            price_eur: Some(-0.1),
            price_czk: None,
        },
    ]
}

#[test]
fn missing_file_means_no_prior_data() {
    let dir = tempfile::tempdir().unwrap();
    let store = DatasetStore::new(dir.path().join("nope.csv"));

    let (resume, rows) = store.load().unwrap();
    assert_eq!(resume, None);
    assert!(rows.is_empty());
}

#[test]
fn resume_is_day_after_last_row() {
    let dir = tempfile::tempdir().unwrap();
    let store = DatasetStore::new(dir.path().join("prices.csv"));
    store.save(&sample_rows()).unwrap();

    let (resume, rows) = store.load().unwrap();
    assert_eq!(resume, Some(d(2009, 2, 2)));
    assert_eq!(rows.len(), 3);
}

#[test]
fn resume_crosses_year_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = DatasetStore::new(dir.path().join("prices.csv"));
    store
        .save(&[PricePoint {
            year: 2023,
            month: 12,
            day: 31,
            hour: 24,
            price_eur: Some(1.0),
            price_czk: Some(24.7),
        }])
        .unwrap();

    assert_eq!(store.load().unwrap().0, Some(d(2024, 1, 1)));
}

#[test]
fn save_load_save_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    let store = DatasetStore::new(&path);

    let rows = sample_rows();
    store.save(&rows).unwrap();
    let first = std::fs::read(&path).unwrap();

    let (_, loaded) = store.load().unwrap();
    assert_eq!(loaded, rows);

    store.save(&loaded).unwrap();
    let second = std::fs::read(&path).unwrap();
    assert_eq!(first, second);

    let (_, reloaded) = store.load().unwrap();
    assert_eq!(reloaded, rows);
}

#[test]
fn repeated_save_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    let store = DatasetStore::new(&path);

    store.save(&sample_rows()).unwrap();
    let a = std::fs::read(&path).unwrap();
    store.save(&sample_rows()).unwrap();
    let b = std::fs::read(&path).unwrap();
    assert_eq!(a, b);
}

#[test]
fn file_format_is_plain_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    DatasetStore::new(&path).save(&sample_rows()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "year,month,day,hour,price_eur,price_czk\n\
         2009,1,31,1,40.0,1106.8\n\
         2009,1,31,2,,\n\
         2009,2,1,25,-0.1,\n"
    );
}

#[test]
fn save_overwrites_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    let store = DatasetStore::new(&path);

    store.save(&sample_rows()).unwrap();
    store.save(&sample_rows()[..1]).unwrap();

    let (_, rows) = store.load().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!dir.path().join("prices.csv.tmp").exists());
}

#[test]
fn save_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("ote").join("prices.csv");
    DatasetStore::new(&path).save(&sample_rows()).unwrap();
    assert!(path.exists());
}

#[test]
fn header_only_file_has_no_resume_date() {
    let dir = tempfile::tempdir().unwrap();
    let store = DatasetStore::new(dir.path().join("prices.csv"));
    store.save(&[]).unwrap();

    let (resume, rows) = store.load().unwrap();
    assert_eq!(resume, None);
    assert!(rows.is_empty());
}

#[test]
fn garbage_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    std::fs::write(
        &path,
        "year,month,day,hour,price_eur,price_czk\n2009,1,x,1,1.0,2.0\n",
    )
    .unwrap();

    match DatasetStore::new(&path).load() {
        Err(StoreError::Csv { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Csv error, got {other:?}"),
    }
}

#[test]
fn impossible_last_date_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    std::fs::write(
        &path,
        "year,month,day,hour,price_eur,price_czk\n2009,2,30,1,1.0,2.0\n",
    )
    .unwrap();

    assert!(matches!(
        DatasetStore::new(&path).load(),
        Err(StoreError::InvalidDate { day: 30, .. })
    ));
}
