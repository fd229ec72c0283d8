//! PricePoint — one hour of the day-ahead market in both currencies.

use crate::convert::{ConvertError, PricePair};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currencies the market publishes prices in.
///
/// OTE quoted CZK until 2009-02-01 and EUR afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Eur,
    Czk,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Czk => "CZK",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "EUR" => Ok(Currency::Eur),
            "CZK" => Ok(Currency::Czk),
            other => Err(ConvertError::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// One published point of a price line, before conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    /// Hour index as published. Runs past 23 on the autumn DST day.
    pub hour: u32,
    /// `None` when nothing was published for the hour.
    pub price: Option<f64>,
}

/// A price line of one day: points denominated in a single currency.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLine {
    /// Line title as published, e.g. `Cena (EUR/MWh)`.
    pub title: String,
    /// Currency label taken from the title, e.g. `EUR`.
    pub unit: String,
    pub points: Vec<RawPoint>,
}

impl PriceLine {
    /// Parse the currency label. Labels other than EUR and CZK are a data-contract violation.
    pub fn currency(&self) -> Result<Currency, ConvertError> {
        self.unit.parse()
    }
}

/// One row of the dataset.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub price_eur: Option<f64>,
    pub price_czk: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, hour: u32, prices: PricePair) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour,
            price_eur: prices.eur,
            price_czk: prices.czk,
        }
    }

    /// Calendar date of the row, `None` if the stored fields do not form a valid date.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// True when the source published nothing for this hour.
    pub fn is_missing(&self) -> bool {
        self.price_eur.is_none() && self.price_czk.is_none()
    }
}
