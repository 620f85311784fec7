//! HTTP request handlers for API endpoints

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use super::error::ApiError;
use super::state::AppState;
use crate::archive::{ProbeReport, Table};
use crate::config::FetchMode;
use crate::date_token::DateToken;

/// Text returned by `GET /`
pub const WELCOME_TEXT: &str = "Welcome to NSE API! Use /nse?date=DDMMYYYY";

/// GET / - Usage hint
pub async fn home() -> &'static str {
    WELCOME_TEXT
}

/// Health check endpoint
///
/// Returns a fixed payload; does not touch the upstream host.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "NSE API"
    }))
}

/// GET /test-connection - One plain request to the upstream landing page
pub async fn test_connection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConnectionResponse>, ApiError> {
    let report = state.source.probe().await.map_err(|e| {
        error!(error = %e, "connectivity probe failed");
        ApiError::ConnectionFailed(e.to_string())
    })?;

    Ok(Json(ConnectionResponse {
        status: "success",
        report,
    }))
}

/// Response for a successful connection test
#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub report: ProbeReport,
}

/// Response for a successful data fetch
#[derive(Debug, Serialize)]
pub struct NseDataResponse {
    pub date: DateToken,
    pub rows: usize,
    pub data: Table,
}

/// First value of `name` among the query pairs; later repeats are ignored.
fn first_param(params: Vec<(String, String)>, name: &str) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

/// GET /nse?date=DDMMYYYY - Fetch and parse the archive file for a date
///
/// Strict mode validates the date and wraps the table with its date and row
/// count; minimal mode passes the date through and returns the bare table.
pub async fn get_nse_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let raw = first_param(params, "date")
        .filter(|d| !d.is_empty())
        .ok_or(ApiError::MissingDate)?;

    let mode = state.mode();
    let date = match mode {
        FetchMode::Strict => DateToken::parse(raw)?,
        FetchMode::Minimal => DateToken::unchecked(raw),
    };

    info!(date = %date, mode = %mode, "fetching NSE data");

    let table = match state.source.fetch(date.as_str()).await {
        Ok(Some(table)) => table,
        Ok(None) => return Err(ApiError::DataUnavailable(date.to_string())),
        Err(e) => {
            error!(date = %date, error_kind = e.kind(), error = %e, "fetch failed");
            return Err(ApiError::FetchFailed {
                date: date.to_string(),
                details: e.to_string(),
            });
        }
    };

    let response = match mode {
        FetchMode::Strict => Json(NseDataResponse {
            date,
            rows: table.len(),
            data: table,
        })
        .into_response(),
        FetchMode::Minimal => Json(table).into_response(),
    };

    Ok(response)
}
