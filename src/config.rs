// src/config.rs
use log::warn;
use std::env;

pub const DEFAULT_CORES_URL: &str = "https://api.orats.io/datav2/cores";
pub const DEFAULT_SUMMARIES_URL: &str = "https://api.orats.io/datav2/summaries";
pub const DEFAULT_TICKER: &str = "AAPL";
pub const DEFAULT_PORT: u16 = 3030;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct Config {
    pub api_token: String,
    pub cores_url: String,
    pub summaries_url: String,
    /// Fetch the current price from `summaries` instead of relying on `clsPx`.
    pub live_price: bool,
    pub default_ticker: String,
    pub port: u16,
}

// Hand-written so the token never reaches a log line.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("cores_url", &self.cores_url)
            .field("summaries_url", &self.summaries_url)
            .field("live_price", &self.live_price)
            .field("default_ticker", &self.default_ticker)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("ORATS_API_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("ORATS_API_TOKEN"))?;

        let cores_url = lookup("ORATS_CORES_URL").unwrap_or_else(|| DEFAULT_CORES_URL.to_string());
        let summaries_url =
            lookup("ORATS_SUMMARIES_URL").unwrap_or_else(|| DEFAULT_SUMMARIES_URL.to_string());

        let live_price = match lookup("ORATS_LIVE_PRICE") {
            None => true,
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                name: "ORATS_LIVE_PRICE",
                value,
            })?,
        };

        let default_ticker = lookup("DEFAULT_TICKER")
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TICKER.to_string());

        let port = match lookup("PORT") {
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
        };

        Ok(Config {
            api_token,
            cores_url,
            summaries_url,
            live_price,
            default_ticker,
            port,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
