//! Input/output types for the ATS engine (JSON contract with the host).

use serde::{Deserialize, Serialize};

use crate::assessment::QualitativeAssessment;
use crate::config::Config;
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the caller sends)
// ---------------------------------------------------------------------------

/// One analysis request. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
  /// Cleaned UTF-8 text from the extraction collaborator.
  pub text: String,
  pub mime_type: String,
  #[serde(default)]
  pub file_path: Option<String>,
  /// Page count reported by the extractor, when it knows it.
  #[serde(default)]
  pub page_count: Option<u32>,
  #[serde(default)]
  pub assessment: Option<QualitativeAssessment>,
  /// Calibration overrides; omitted fields keep their defaults.
  #[serde(default)]
  pub config: Option<Config>,
}

impl Input {
  pub fn validate(&self) -> Result<(), EngineError> {
    if self.text.trim().is_empty() {
      return Err(EngineError::validation("text", "must not be empty"));
    }
    if self.mime_type.trim().is_empty() {
      return Err(EngineError::validation("mimeType", "must not be empty"));
    }
    if let Some(config) = &self.config {
      config.validate()?;
    }
    Ok(())
  }

  pub fn document(&self) -> Document<'_> {
    Document {
      text: &self.text,
      mime_type: &self.mime_type,
      file_path: self.file_path.as_deref(),
    }
  }
}

/// Borrowed view of the document under analysis.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
  pub text: &'a str,
  pub mime_type: &'a str,
  pub file_path: Option<&'a str>,
}

impl<'a> Document<'a> {
  pub fn new(text: &'a str, mime_type: &'a str) -> Self {
    Self {
      text,
      mime_type,
      file_path: None,
    }
  }

  pub fn with_file_path(mut self, path: &'a str) -> Self {
    self.file_path = Some(path);
    self
  }

  pub fn is_pdf(&self) -> bool {
    self.mime_type.eq_ignore_ascii_case("application/pdf")
      || self
        .file_path
        .map(|p| p.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
  }
}

// ---------------------------------------------------------------------------
// Shared enums
// ---------------------------------------------------------------------------

/// Coarse label derived from how many findings an analysis raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
  High,
  Medium,
  Low,
}

impl Confidence {
  pub fn from_finding_count(count: usize) -> Self {
    match count {
      0 => Self::High,
      1..=2 => Self::Medium,
      _ => Self::Low,
    }
  }
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
  pub parseability: u8,
  pub format: u8,
  pub keyword: u8,
  pub contact: u8,
  pub content: u8,
}

/// Final, categorized analysis handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedAnalysis {
  pub overall_score: u8,
  pub confidence: Confidence,
  pub scores: CategoryScores,
  pub critical: Vec<String>,
  pub warnings: Vec<String>,
  pub improvements: Vec<String>,
  pub estimated_cost: f64,
  pub assessment_unavailable: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unavailable_message: Option<String>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for invalid input.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}
