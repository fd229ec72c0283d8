//! Domain types: price points, currencies, and the accumulated dataset.

pub mod dataset;
pub mod price;

pub use dataset::{Dataset, DatasetError};
pub use price::{Currency, PriceLine, PricePoint, RawPoint};
