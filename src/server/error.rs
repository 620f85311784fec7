//! Error types for the REST API server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::date_token::DateTokenError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// `date` query parameter missing or empty
    MissingDate,
    /// `date` query parameter is not eight digits
    InvalidDate(String),
    /// Every candidate failed; carries the requested date
    DataUnavailable(String),
    /// The fetch routine returned an error (minimal mode)
    FetchFailed { date: String, details: String },
    /// Connectivity probe failed
    ConnectionFailed(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::MissingDate => write!(f, "Date parameter is required"),
            ApiError::InvalidDate(date) => write!(f, "Invalid date: {}", date),
            ApiError::DataUnavailable(date) => write!(f, "No data for date: {}", date),
            ApiError::FetchFailed { date, details } => {
                write!(f, "Fetch failed for {}: {}", date, details)
            }
            ApiError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingDate => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Date parameter is required (DDMMYYYY)" }),
            ),
            ApiError::InvalidDate(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Date should be in DDMMYYYY format (8 digits)" }),
            ),
            ApiError::DataUnavailable(date) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Failed to fetch data",
                    "details": "Check server logs for more information",
                    "date": date,
                    "suggestion": "Try a different date or check if the date exists in NSE archives",
                }),
            ),
            ApiError::FetchFailed { date, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Failed to fetch data",
                    "details": details,
                    "date": date,
                }),
            ),
            ApiError::ConnectionFailed(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "status": "error",
                    "error": msg,
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DateTokenError> for ApiError {
    fn from(err: DateTokenError) -> Self {
        match err {
            DateTokenError::Empty => ApiError::MissingDate,
            other => ApiError::InvalidDate(other.to_string()),
        }
    }
}
