//! Dump configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) describes a full
//! historical download into `ote_prices.csv`:
//!
//! ```toml
//! start_date = "2009-02-01"
//! output = "data/ote_prices.csv"
//!
//! [http]
//! max_retries = 5
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// OTE daily market chart data, parameterized by report date.
pub const DEFAULT_PRICE_URL: &str = "https://www.ote-cr.cz/cs/kratkodobe-trhy/elektrina/denni-trh/@@chart-data?report_date={year}-{month}-{day}";

/// CNB daily exchange rate table, parameterized by date.
pub const DEFAULT_RATE_URL: &str = "http://www.cnb.cz/cs/financni-trhy/devizovy-trh/kurzy-devizoveho-trhu/kurzy-devizoveho-trhu/denni_kurz.txt?date={day}.{month}.{year}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("URL template '{template}' is missing the {placeholder} placeholder")]
    Template {
        template: String,
        placeholder: &'static str,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// URL with `{year}`, `{month}` and `{day}` placeholders.
///
/// Rendering zero-pads month and day to two digits and the year to four.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrlTemplate(String);

impl UrlTemplate {
    const PLACEHOLDERS: [&'static str; 3] = ["{year}", "{month}", "{day}"];

    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = template.into();
        for placeholder in Self::PLACEHOLDERS {
            if !template.contains(placeholder) {
                return Err(ConfigError::Template {
                    template,
                    placeholder,
                });
            }
        }
        Ok(Self(template))
    }

    pub fn render(&self, date: NaiveDate) -> String {
        self.0
            .replace("{year}", &format!("{:04}", date.year()))
            .replace("{month}", &format!("{:02}", date.month()))
            .replace("{day}", &format!("{:02}", date.day()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UrlTemplate {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UrlTemplate> for String {
    fn from(value: UrlTemplate) -> Self {
        value.0
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP transport settings shared by both providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Retries after a connection failure or timeout. Status codes are never retried.
    pub max_retries: u32,
    /// First backoff delay; doubles on every further retry.
    pub retry_base_delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_base_delay_ms: 500,
            timeout_secs: 30,
            user_agent: concat!("otedump/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Everything a dump run needs besides the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpConfig {
    /// First day to download when no dataset exists yet. OTE data starts 2002-01-01.
    pub start_date: NaiveDate,
    /// Exclusive end. `None` means tomorrow, so today is included.
    pub end_date: Option<NaiveDate>,
    /// Dataset CSV path.
    pub output: PathBuf,
    /// CNB currency code the day's rate is looked up for.
    pub currency: String,
    /// A checkpoint is written once more than this many days passed since the last one.
    pub checkpoint_interval_days: i64,
    pub price_url: UrlTemplate,
    pub rate_url: UrlTemplate,
    pub http: HttpConfig,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2002, 1, 1).unwrap_or_default(),
            end_date: None,
            output: PathBuf::from("ote_prices.csv"),
            currency: "EUR".to_string(),
            checkpoint_interval_days: 30,
            price_url: UrlTemplate(DEFAULT_PRICE_URL.to_string()),
            rate_url: UrlTemplate(DEFAULT_RATE_URL.to_string()),
            http: HttpConfig::default(),
        }
    }
}

impl DumpConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.checkpoint_interval_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "checkpoint_interval_days must not be negative, got {}",
                self.checkpoint_interval_days
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency must not be empty".into()));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ConfigError::Invalid(format!(
                    "end_date {end} is before start_date {}",
                    self.start_date
                )));
            }
        }
        Ok(())
    }

    /// The end of the run, resolved against `today`.
    pub fn resolved_end(&self, today: NaiveDate) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| today.succ_opt().unwrap_or(today))
    }
}
