//! Crate-wide error type and its HTTP representation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Stable error codes shared by the server responses and the clients that read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InternalServerError,
    InvalidRequest,
    ValidationError,
    RestaurantNotFound,
    DuplicateRestaurant,
    InvalidLocation,
    InvalidRating,
    InvalidCategory,
}

impl ErrorCode {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::InternalServerError => "C001",
            ErrorCode::InvalidRequest => "C002",
            ErrorCode::ValidationError => "C003",
            ErrorCode::RestaurantNotFound => "R001",
            ErrorCode::DuplicateRestaurant => "R002",
            ErrorCode::InvalidLocation => "R003",
            ErrorCode::InvalidRating => "R004",
            ErrorCode::InvalidCategory => "R005",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::RestaurantNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DuplicateRestaurant => StatusCode::CONFLICT,
            ErrorCode::InvalidRequest
            | ErrorCode::ValidationError
            | ErrorCode::InvalidLocation
            | ErrorCode::InvalidRating
            | ErrorCode::InvalidCategory => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(ThisError, Debug)]
pub enum Error {
    /// One or more fields failed the required-field / range checks
    #[error("Input validation failed: {}", summarize(.field_errors))]
    Validation { field_errors: BTreeMap<String, String> },

    #[error("Invalid location. Latitude: {latitude}, longitude: {longitude}")]
    InvalidLocation { latitude: f64, longitude: f64 },

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),

    #[error("Unknown category '{0}'")]
    InvalidCategory(String),

    /// Malformed request (unparseable body, bad query string)
    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("Restaurant not found. ID: {id}")]
    NotFound { id: i64 },

    #[error("Restaurant already registered. Name: {name}, address: {address}")]
    Duplicate { name: String, address: String },

    /// Remote API failure, as reported by the server or the network layer
    #[error("{message}")]
    Transport { status: Option<u16>, message: String },

    #[error("Geocoding failed: {0}")]
    Geocoding(String),

    /// Durable store backend failure
    #[error(transparent)]
    Storage(#[from] anyhow::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

fn summarize(field_errors: &BTreeMap<String, String>) -> String {
    field_errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Single-field validation failure.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut field_errors = BTreeMap::new();
        field_errors.insert(field.to_string(), message.into());
        Error::Validation { field_errors }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Validation { .. } => ErrorCode::ValidationError,
            Error::InvalidLocation { .. } => ErrorCode::InvalidLocation,
            Error::InvalidRating(_) => ErrorCode::InvalidRating,
            Error::InvalidCategory(_) => ErrorCode::InvalidCategory,
            Error::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            Error::NotFound { .. } => ErrorCode::RestaurantNotFound,
            Error::Duplicate { .. } => ErrorCode::DuplicateRestaurant,
            Error::Transport { .. }
            | Error::Geocoding(_)
            | Error::Storage(_)
            | Error::Serialization(_) => ErrorCode::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Transport {
                status: Some(status),
                ..
            } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            Error::Transport { status: None, .. } | Error::Geocoding(_) => StatusCode::BAD_GATEWAY,
            other => other.code().status(),
        }
    }

    /// True for a missing record, whether reported locally or by the remote API.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::Transport {
                    status: Some(404),
                    ..
                }
        )
    }

    /// Message safe to show to API callers, without leaking backend details.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { .. } => "Input validation failed".to_string(),
            Error::Storage(_) | Error::Serialization(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// JSON error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        let field_errors = match err {
            Error::Validation { field_errors } => Some(field_errors.clone()),
            _ => None,
        };
        ErrorResponse {
            code: err.code().code().to_string(),
            message: err.user_message(),
            status: err.status_code().as_u16(),
            timestamp: Utc::now(),
            field_errors,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Storage(_) | Error::Serialization(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Transport { .. } | Error::Geocoding(_) => {
                tracing::error!("Upstream error: {}", self);
            }
            Error::Duplicate { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
            _ => {
                tracing::warn!("Client error: {}", self);
            }
        }

        let body = ErrorResponse::from(&self);
        (self.status_code(), Json(body)).into_response()
    }
}
