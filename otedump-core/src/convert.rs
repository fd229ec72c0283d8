//! EUR/CZK price conversion using the day's CNB rate.
//!
//! One of the two prices is always the value the market published; the other is
//! derived from it. A missing point stays missing in both currencies, and an
//! unknown rate leaves only the derived side missing.

use crate::domain::Currency;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("conversion to CZK and EUR is not implemented for \"{0}\"")]
    UnsupportedCurrency(String),
}

/// A price in both currencies. `None` means missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PricePair {
    pub eur: Option<f64>,
    pub czk: Option<f64>,
}

impl PricePair {
    pub const MISSING: PricePair = PricePair {
        eur: None,
        czk: None,
    };
}

/// Derive both prices from a native one.
///
/// `rate` is CZK per 1 EUR.
pub fn convert(price: Option<f64>, currency: Currency, rate: Option<f64>) -> PricePair {
    let Some(price) = price else {
        return PricePair::MISSING;
    };

    match currency {
        Currency::Eur => PricePair {
            eur: Some(price),
            czk: rate.map(|r| price * r),
        },
        Currency::Czk => PricePair {
            eur: rate.filter(|r| *r != 0.0).map(|r| price / r),
            czk: Some(price),
        },
    }
}

/// Like [`convert`], taking the currency label a price line was published with.
///
/// A missing point converts to missing whatever the label says.
pub fn convert_labeled(
    price: Option<f64>,
    label: &str,
    rate: Option<f64>,
) -> Result<PricePair, ConvertError> {
    if price.is_none() {
        return Ok(PricePair::MISSING);
    }
    let currency: Currency = label.parse()?;
    Ok(convert(price, currency, rate))
}
