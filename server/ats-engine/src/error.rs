//! Structured error types for the ATS engine.
//!
//! Only the edges can fail (input validation, config validation, page-count
//! lookups). The analysis pipeline itself always returns a report.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("io: {context}: {source}")]
  Io {
    context: String,
    #[source]
    source: std::io::Error,
  },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl EngineError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
    Self::Io {
      context: context.into(),
      source,
    }
  }
}

/// Why a page count could not be determined. Always swallowed by the pipeline.
#[derive(Debug, Error)]
pub enum PageCountError {
  #[error("cannot read {path}: {source}")]
  Unreadable {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{path} is not a regular file")]
  NotAFile { path: String },

  #[error("{path} is {size} bytes, over the {limit} byte limit")]
  TooLarge { path: String, size: u64, limit: u64 },

  #[error("{path} has no page objects")]
  NoPages { path: String },
}
