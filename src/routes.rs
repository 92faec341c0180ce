// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::dashboard::{get_dashboard, DashboardQuery};
use crate::handlers::earnings::get_earnings;
use crate::handlers::error::ApiError;
use crate::state::AppState;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let dashboard_route = warp::path::end()
        .and(warp::get())
        .and(warp::query::<DashboardQuery>())
        .and(state_filter.clone())
        .and_then(get_dashboard);

    let earnings_route = warp::path!("api" / "v1" / "earnings" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_earnings);

    let health_route = warp::path!("api" / "v1" / "health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    info!("All routes configured successfully.");

    dashboard_route
        .or(earnings_route)
        .or(health_route)
        .recover(handle_rejection)
}
