//! Process configuration.
//!
//! Everything is read once at startup from environment (optionally populated
//! from `.env`) into an immutable `Config` that is then handed to components
//! explicitly. API keys are never compiled in.



use std::{
    env,
    path::PathBuf,
    time::Duration,
};

use crate::{
    error::ConfigError,
    price_source::Provider,
};



/// Pure-metal weights in grams used to value items. These are fixed domain
/// constants, not something that should be tuned per deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    pub sovereign_gold_grams: f64,
    pub half_shekel_opinion_a_grams: f64,
    pub half_shekel_opinion_b_grams: f64,
}



impl Default for Weights {
    fn default() -> Self {
        Self {
            // 22 karat sovereign coin.
            sovereign_gold_grams: 7.32,
            half_shekel_opinion_a_grams: 9.0,
            half_shekel_opinion_b_grams: 9.6,
        }
    }
}



#[derive(Debug, Clone, PartialEq)]
pub enum StorageKind {
    File,
    Stdout,
}



/// Configuration for metal price and exchange rate sources.
///
/// `gold_api_key` - token sent in `x-access-token` header to GoldAPI.
/// `metals_api_key` - `access_key` query parameter for Metals-API.
/// `base`, `quote` - currency pair for exchange rate, i.e. USD/ILS.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub provider: Provider,
    pub gold_api_url: String,
    pub gold_api_key: Option<String>,
    pub metals_api_url: String,
    pub metals_api_key: Option<String>,
    pub exchange_rate_url: String,
    pub base: String,
    pub quote: String,
    pub timeout: Duration,
}



#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub storage: StorageKind,
    pub data_path: PathBuf,
    pub weights: Weights,
}



macro_rules! env_load_or_default {
    ($lookup:expr, $name:expr, $default:expr) => {{
        match $lookup($name) {
            Some(val) if !val.trim().is_empty() => val.trim().to_string(),
            _ => $default.to_string(),
        }
    }}
}



impl Config {
    /// Load configuration from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }



    /// Build configuration from arbitrary key lookup. Missing or blank values
    /// fall back to defaults, malformed values are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let provider = env_load_or_default!(lookup, "METAL_PROVIDER", "goldapi");
        let provider = match provider.to_ascii_lowercase().as_str() {
            "goldapi" => Provider::GoldApi,
            "metals" | "metalsapi" => Provider::MetalsApi,
            _ => {
                return Err(ConfigError::Unsupported {
                    name: "METAL_PROVIDER",
                    value: provider,
                })
            }
        };

        let timeout = env_load_or_default!(lookup, "HTTP_TIMEOUT_SECS", "10");
        let timeout = match timeout.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::InvalidNumber {
                    name: "HTTP_TIMEOUT_SECS",
                    value: timeout,
                })
            }
        };

        let storage = env_load_or_default!(lookup, "STORAGE", "file");
        let storage = match storage.to_ascii_lowercase().as_str() {
            "file" => StorageKind::File,
            "stdout" => StorageKind::Stdout,
            _ => {
                return Err(ConfigError::Unsupported {
                    name: "STORAGE",
                    value: storage,
                })
            }
        };

        let key = |name: &str| {
            lookup(name)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };

        let source = SourceConfig {
            provider,
            gold_api_url: env_load_or_default!(lookup, "GOLD_API_URL",
                "https://www.goldapi.io/api"),
            gold_api_key: key("GOLD_API_KEY"),
            metals_api_url: env_load_or_default!(lookup, "METALS_API_URL",
                "https://api.metals.live/v1/spot"),
            metals_api_key: key("METALS_API_KEY"),
            exchange_rate_url: env_load_or_default!(lookup, "EXCHANGE_RATE_URL",
                "https://api.exchangerate-api.com/v4/latest"),
            base: env_load_or_default!(lookup, "EXCHANGE_BASE", "USD")
                .to_ascii_uppercase(),
            quote: env_load_or_default!(lookup, "EXCHANGE_QUOTE", "ILS")
                .to_ascii_uppercase(),
            timeout,
        };

        let data_path = env_load_or_default!(lookup, "DATA_PATH", "gold-data.json");

        Ok(Self {
            source,
            storage,
            data_path: PathBuf::from(data_path),
            weights: Weights::default(),
        })
    }
}



impl SourceConfig {
    /// Name of environment variable holding key for the selected provider,
    /// if that key is not configured.
    pub fn missing_key(&self) -> Option<&'static str> {
        match self.provider {
            Provider::GoldApi if self.gold_api_key.is_none() => {
                Some("GOLD_API_KEY")
            }
            Provider::MetalsApi if self.metals_api_key.is_none() => {
                Some("METALS_API_KEY")
            }
            _ => None,
        }
    }
}
