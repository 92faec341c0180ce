// src/handlers/dashboard.rs
use log::{error, info};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reply::Html;

use crate::models::Ticker;
use crate::render::{render_page, PageState};
use crate::services::earnings::lookup_earnings;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub ticker: Option<String>,
}

/// Renders the page. Failures are shown inside the page so the form stays usable.
pub async fn get_dashboard(
    query: DashboardQuery,
    state: Arc<AppState>,
) -> Result<Html<String>, Infallible> {
    let input = match query.ticker {
        Some(t) => t,
        None => {
            let page = render_page(&state.default_ticker, &PageState::Idle);
            return Ok(warp::reply::html(page));
        }
    };

    info!("Dashboard lookup requested for {:?}", input);
    let page_state = match Ticker::parse(&input) {
        Err(e) => PageState::Invalid(e.to_string()),
        Ok(ticker) => match lookup_earnings(&state.client, &ticker, state.live_price).await {
            Ok(Some(lookup)) => PageState::Loaded(lookup),
            Ok(None) => PageState::NotFound(ticker.to_string()),
            Err(e) => {
                error!("Dashboard lookup for {} failed: {}", ticker, e);
                PageState::Failed(e.to_string())
            }
        },
    };

    let shown = input.trim().to_uppercase();
    Ok(warp::reply::html(render_page(&shown, &page_state)))
}
