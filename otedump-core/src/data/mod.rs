//! Data sources, the dataset store, and the download loop.

pub mod cnb;
pub mod download;
pub mod http;
pub mod ote;
pub mod provider;
pub mod store;

pub use cnb::CnbRateProvider;
pub use download::{dump_all, DumpError, DumpPlan, DumpSummary};
pub use http::Transport;
pub use ote::OtePriceProvider;
pub use provider::{
    DownloadProgress, FetchError, PriceSource, RateSource, SilentProgress, StdoutProgress,
};
pub use store::{DatasetStore, StoreError};
