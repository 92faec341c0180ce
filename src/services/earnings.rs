// src/services/earnings.rs
use log::{debug, info, warn};
use serde::Serialize;

use crate::models::{DerivedView, Ticker};

use super::deriver::{derive, NOT_AVAILABLE};
use super::orats::{FetchError, OratsClient};

/// Everything one ticker lookup produces for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct EarningsLookup {
    pub ticker: Ticker,
    #[serde(flatten)]
    pub view: DerivedView,
    pub warnings: Vec<String>,
}

/// Fetches and derives the earnings view for one ticker.
///
/// `Ok(None)` means ORATS has no record for the ticker. A failed price lookup
/// is downgraded to a warning and the record's close price is used instead.
pub async fn lookup_earnings(
    client: &OratsClient,
    ticker: &Ticker,
    live_price: bool,
) -> Result<Option<EarningsLookup>, FetchError> {
    let record = match client.fetch_core_record(ticker).await? {
        Some(record) => record,
        None => return Ok(None),
    };

    let mut warnings = Vec::new();

    let external_price = if live_price {
        match client.fetch_price(ticker).await {
            Ok(Some(price)) => Some(price),
            Ok(None) => {
                warnings.push(format!(
                    "No current price found for {}; using the last close price.",
                    ticker
                ));
                None
            }
            Err(e) => {
                warn!("Price lookup for {} failed, falling back to clsPx: {}", ticker, e);
                warnings.push(format!(
                    "Current price lookup failed ({}); using the last close price.",
                    e
                ));
                None
            }
        }
    } else {
        None
    };

    let view = derive(&record, external_price);
    debug!("Derived view for {}: {:?}", ticker, view);

    warnings.extend(view_warnings(&view));
    info!("Earnings lookup for {} complete with {} warning(s)", ticker, warnings.len());

    Ok(Some(EarningsLookup {
        ticker: ticker.clone(),
        view,
        warnings,
    }))
}

fn view_warnings(view: &DerivedView) -> Vec<String> {
    let mut warnings = Vec::new();
    if view.has_zero_price_change() {
        warnings.push(
            "Expected price move came out as $0.00; the price or implied move may be bad data."
                .to_string(),
        );
    }
    if view.resolved_next_earnings_date == NOT_AVAILABLE {
        warnings.push("Next earnings date is not available.".to_string());
    }
    warnings
}
