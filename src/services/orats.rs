// src/services/orats.rs
use log::{error, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::models::{PriceSummary, RawEarningsRecord, Ticker};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to ORATS failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Error: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("could not decode ORATS response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// Client for the ORATS datav2 endpoints. The token rides along as a query parameter.
pub struct OratsClient {
    http: Client,
    token: String,
    cores_url: String,
    summaries_url: String,
}

impl OratsClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(concat!("earnings-move-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            token: config.api_token.clone(),
            cores_url: config.cores_url.clone(),
            summaries_url: config.summaries_url.clone(),
        })
    }

    /// First `cores` record for the ticker, `None` when ORATS has nothing for it.
    pub async fn fetch_core_record(
        &self,
        ticker: &Ticker,
    ) -> Result<Option<RawEarningsRecord>, FetchError> {
        info!("Fetching core earnings data for {}", ticker);
        let records: Vec<RawEarningsRecord> = self.get_data(&self.cores_url, ticker).await?;
        if records.is_empty() {
            warn!("No core data returned for {}", ticker);
        }
        Ok(records.into_iter().next())
    }

    pub async fn fetch_price(&self, ticker: &Ticker) -> Result<Option<f64>, FetchError> {
        info!("Fetching current stock price for {}", ticker);
        let summaries: Vec<PriceSummary> = self.get_data(&self.summaries_url, ticker).await?;
        let price = summaries.into_iter().next().and_then(|s| s.stock_price);
        match price {
            Some(p) => info!("Found stock price for {}: {}", ticker, p),
            None => warn!("No stock price returned for {}", ticker),
        }
        Ok(price)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        url: &str,
        ticker: &Ticker,
    ) -> Result<Vec<T>, FetchError> {
        let resp = self
            .http
            .get(url)
            .query(&[("token", self.token.as_str()), ("ticker", ticker.as_str())])
            .send()
            .await
            .map_err(|e| {
                // reqwest puts the full URL, token included, into its errors
                let e = e.without_url();
                error!("ORATS request for {} failed: {}", ticker, e);
                e
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unable to read body".to_string());
            error!("ORATS returned status {} for {}: {}", status, ticker, body);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| e.without_url())?;
        decode_envelope(&bytes)
    }
}

fn decode_envelope<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>, FetchError> {
    let envelope: DataEnvelope<T> = serde_json::from_slice(bytes).map_err(|e| {
        let preview = String::from_utf8_lossy(&bytes[..bytes.len().min(300)]);
        error!("Failed to parse ORATS response: {}; body preview: {}", e, preview);
        e
    })?;
    Ok(envelope.data)
}
