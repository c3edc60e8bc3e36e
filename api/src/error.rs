use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to HTTP clients by the prediction endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing field: '{0}'")]
    MissingField(&'static str),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Invalid input, please check your categories.")]
    InvalidCategory,

    #[error("{0}")]
    MalformedBody(String),

    #[error(transparent)]
    Prediction(#[from] PredictError),
}

impl ApiError {
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_)
            | ApiError::InvalidValue { .. }
            | ApiError::InvalidCategory
            | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "prediction failed");
        } else {
            tracing::warn!(error = %self, "rejected prediction request");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Failure raised by a predictor while scoring a single feature vector.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("feature {index} is not a finite number")]
    NonFiniteFeature { index: usize },
}

/// Failure raised while loading a model artifact at startup.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

impl ModelLoadError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}
