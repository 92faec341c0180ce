// src/handlers/earnings.rs
use log::{error, info, warn};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::Ticker;
use crate::services::earnings::lookup_earnings;
use crate::state::AppState;

pub async fn get_earnings(ticker: String, state: Arc<AppState>) -> Result<Json, Rejection> {
    info!("Handling request to get earnings moves for {}", ticker);

    let ticker = Ticker::parse(&ticker).map_err(|e| {
        warn!("Rejected ticker: {}", e);
        warp::reject::custom(ApiError::bad_request(e.to_string()))
    })?;

    match lookup_earnings(&state.client, &ticker, state.live_price).await {
        Ok(Some(lookup)) => Ok(warp::reply::json(&lookup)),
        Ok(None) => Err(warp::reject::custom(ApiError::not_found(format!(
            "No data found for the specified ticker ({}).",
            ticker
        )))),
        Err(e) => {
            error!("Earnings lookup for {} failed: {}", ticker, e);
            Err(warp::reject::custom(ApiError::upstream(&e)))
        }
    }
}
