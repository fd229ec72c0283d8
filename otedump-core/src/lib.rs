//! otedump core — resumable download of OTE day-ahead prices merged with CNB exchange rates.
//!
//! This crate contains everything except the command line:
//! - Domain types (price points, the two market currencies, the accumulated dataset)
//! - EUR/CZK conversion with explicit missing-value propagation
//! - HTTP transport with a bounded retry budget for connection failures
//! - OTE price and CNB exchange rate providers
//! - CSV dataset store with atomic checkpoint writes
//! - The day-by-day download loop with periodic checkpoints and resume

pub mod config;
pub mod convert;
pub mod data;
pub mod domain;

pub use config::{ConfigError, DumpConfig, HttpConfig, UrlTemplate};
pub use convert::{convert, convert_labeled, ConvertError, PricePair};
pub use domain::{Currency, Dataset, DatasetError, PricePoint};

#[cfg(test)]
mod tests {
    use super::*;

    /// The accumulated dataset is handed between the loop and the store by value;
    /// keep its parts movable across threads so a caller may run the loop off the main thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PricePoint>();
        require_sync::<PricePoint>();
        require_send::<Dataset>();
        require_sync::<Dataset>();
        require_send::<Currency>();
        require_sync::<Currency>();
        require_send::<DumpConfig>();
        require_sync::<DumpConfig>();
        require_send::<data::FetchError>();
        require_sync::<data::FetchError>();
        require_send::<data::Transport>();
        require_sync::<data::Transport>();
    }
}
