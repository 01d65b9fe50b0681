//! Service and assessment-client error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use ats_engine::EngineError;

#[derive(Debug, Error)]
pub enum ServiceError {
  #[error("invalid request: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("configuration: {0}")]
  Config(String),

  #[error(transparent)]
  Engine(EngineError),

  #[error("analysis task failed: {0}")]
  Task(#[from] tokio::task::JoinError),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}

impl ServiceError {
  pub fn config(message: impl Into<String>) -> Self {
    Self::Config(message.into())
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::Validation { .. } => StatusCode::BAD_REQUEST,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<EngineError> for ServiceError {
  fn from(e: EngineError) -> Self {
    match e {
      EngineError::Validation { field, reason } => Self::Validation { field, reason },
      other => Self::Engine(other),
    }
  }
}

impl IntoResponse for ServiceError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

/// Why an assessment could not be obtained. Never leaves the client.
#[derive(Debug, Error)]
pub enum AssessmentError {
  #[error("transport: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("http {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body: String,
  },

  #[error("decode: {0}")]
  Decode(String),
}

impl AssessmentError {
  /// Timeouts, connection failures, 429 and 5xx are worth one more try.
  pub fn is_retryable(&self) -> bool {
    match self {
      Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
      Self::Status { status, .. } => {
        *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
      }
      Self::Decode(_) => false,
    }
  }
}
