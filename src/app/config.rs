//! Application Configuration
//!
//! Read from environment variables at startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::network::chain::{ChainClientConfig, DEFAULT_HUB_ADDRESS, DEFAULT_LIVES_PRICE_WEI};
use crate::network::wallet::Address;

/// Default leaderboard API.
pub const DEFAULT_API_URL: &str = "https://api.catchthemine.xyz";

/// Default directory for lives records.
pub const DEFAULT_STORAGE_DIR: &str = ".catch-the-mine";

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but unusable.
    #[error("invalid value for {name}: {value}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Leaderboard API base URL
    pub api_url: String,
    /// Where lives records are stored
    pub storage_dir: PathBuf,
    /// Contract settings
    pub chain: ChainClientConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// - `CATCH_THE_MINE_API_URL`
    /// - `CATCH_THE_MINE_STORAGE_DIR`
    /// - `CATCH_THE_MINE_CONTRACT`
    /// - `CATCH_THE_MINE_LIVES_PRICE_WEI`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = var("CATCH_THE_MINE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "CATCH_THE_MINE_API_URL",
                value: api_url,
            });
        }

        let storage_dir = var("CATCH_THE_MINE_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        let contract = var("CATCH_THE_MINE_CONTRACT").unwrap_or_else(|| DEFAULT_HUB_ADDRESS.to_string());
        let hub_address = Address::parse(&contract).map_err(|_| ConfigError::Invalid {
            name: "CATCH_THE_MINE_CONTRACT",
            value: contract.clone(),
        })?;

        let lives_price_wei = match var("CATCH_THE_MINE_LIVES_PRICE_WEI") {
            Some(raw) => raw.trim().parse::<u128>().map_err(|_| ConfigError::Invalid {
                name: "CATCH_THE_MINE_LIVES_PRICE_WEI",
                value: raw.clone(),
            })?,
            None => DEFAULT_LIVES_PRICE_WEI,
        };

        let mut chain = ChainClientConfig::for_hub(hub_address);
        chain.lives_price_wei = lives_price_wei;

        Ok(Self {
            api_url,
            storage_dir,
            chain,
        })
    }
}
