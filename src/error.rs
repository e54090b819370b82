//! Error types shared by the loader, analytics, prediction and web layers.

use std::path::PathBuf;

use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::pages;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Dataset file could not be opened or read
    #[error("failed to read dataset {path}: {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A dataset row did not match the expected schema
    #[error("malformed dataset row {row}: {source}")]
    DatasetRow {
        row: u64,
        #[source]
        source: csv::Error,
    },

    /// Classifier artifact missing or unreadable
    #[error("failed to read classifier artifact {path}: {source}")]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Classifier artifact is not valid JSON for the expected shape
    #[error("failed to parse classifier artifact {path}: {source}")]
    ModelParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Classifier artifact was trained on a different feature schema
    #[error("classifier schema mismatch: {0}")]
    ModelSchema(String),

    /// Display label missing from its catalog
    #[error("unknown {catalog} label: {label:?}")]
    UnknownLabel { catalog: &'static str, label: String },

    /// Column name outside the dataset schema
    #[error("unknown dataset column: {0}")]
    UnknownColumn(String),

    /// Form value outside its allowed range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Classifier returned something other than a binary label and a probability pair
    #[error("invalid classifier output: {0}")]
    InvalidModelOutput(String),

    /// Chart figure could not be serialized
    #[error("failed to serialize chart: {0}")]
    Chart(#[from] serde_json::Error),
}

impl DashboardError {
    /// True for errors caused by request input rather than by the server.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DashboardError::UnknownLabel { .. } | DashboardError::OutOfRange { .. }
        )
    }
}

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        if self.is_user_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(pages::error_page(&self.to_string()))
    }
}
