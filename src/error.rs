//! Error handling for the application

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Pricing(PricingError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Pricing(PricingError::NoTierFound { .. })
            | AppError::Pricing(PricingError::TierMisconfigured { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Pricing(PricingError::ConfigurationUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Database(_) | AppError::InvalidData(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::Pricing(e) => e.error_type(),
            AppError::Database(_) => "database_error",
            AppError::InvalidData(_) => "invalid_data",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Pricing(PricingError::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Pricing(PricingError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side details stay in the log, clients get a generic message
        let (error, details) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ("Database error".to_string(), None)
            }
            AppError::InvalidData(msg) => {
                tracing::error!("Invalid stored data: {}", msg);
                ("Invalid pricing configuration data".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal error".to_string(), None)
            }
            AppError::Pricing(PricingError::ConfigurationUnavailable(msg)) => {
                tracing::error!("Pricing configuration unavailable: {}", msg);
                (
                    "Pricing configuration unavailable".to_string(),
                    Some("The pricing store could not be reached; no price was calculated".to_string()),
                )
            }
            AppError::Pricing(PricingError::NoTierFound { context, .. }) => {
                (self.to_string(), Some(context.clone()))
            }
            other => (other.to_string(), None),
        };

        let body = PricingErrorResponse {
            success: false,
            error,
            error_type: self.error_type().to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
