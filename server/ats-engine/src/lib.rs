//! ATS compatibility engine: deterministic, rule-based resume analysis.
//!
//! Runs independent signal detectors over extracted resume text, scores
//! them into a parseability report, and reconciles that report with an
//! optional external qualitative assessment into one bounded, explainable
//! CombinedAnalysis.
//!
//! No AI, no DB, no network; pure computation. The assessment is fetched
//! by the caller (see the analysis service).

pub mod assessment;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod pages;
pub mod parseability;
pub mod signals;
pub mod types;
pub mod validator;

use std::path::Path;

use tracing::{info, info_span};

pub use assessment::QualitativeAssessment;
pub use config::Config;
pub use error::EngineError;
pub use parseability::{analyze, ParseabilityReport};
pub use types::{CombinedAnalysis, Document, Input};
pub use validator::combine;

use pages::{KnownPages, PdfPageCounter};

/// Full pipeline for one request: validate, detect, aggregate, combine.
pub fn run(input: &Input) -> Result<CombinedAnalysis, EngineError> {
  input.validate()?;

  let config = input.config.clone().unwrap_or_default();
  let doc = input.document();
  let span = info_span!("analysis", document = %fingerprint::document_id(&input.text));
  let _guard = span.enter();

  // A reported page count wins over re-reading the file.
  let report = match input.page_count {
    Some(pages) => analyze(&doc, &KnownPages(Some(pages)), &config),
    None => analyze(&doc, &PdfPageCounter, &config),
  };
  let analysis = combine(&report, input.assessment.as_ref(), &config);

  info!(
    parseability = report.score,
    overall = analysis.overall_score,
    critical = analysis.critical.len(),
    warnings = analysis.warnings.len(),
    assessed = !analysis.assessment_unavailable,
    "analysis complete"
  );
  Ok(analysis)
}

/// Load calibration overrides from a JSON file. Omitted fields keep defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, EngineError> {
  let path = path.as_ref();
  let raw = std::fs::read_to_string(path)
    .map_err(|e| EngineError::io(format!("reading {}", path.display()), e))?;
  let config: Config = serde_json::from_str(&raw)?;
  config.validate()?;
  Ok(config)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input(text: &str) -> Input {
    serde_json::from_value(serde_json::json!({
      "text": text,
      "mimeType": "text/plain",
    }))
    .unwrap()
  }

  #[test]
  fn run_rejects_invalid_input() {
    let err = run(&input("  ")).unwrap_err();
    assert!(matches!(err, EngineError::Validation { .. }));
  }

  #[test]
  fn run_without_assessment_degrades() {
    let out = run(&input("Jane Doe\njane@example.com")).unwrap();
    assert!(out.assessment_unavailable);
  }

  #[test]
  fn embedded_config_is_validated() {
    let bad: Input = serde_json::from_value(serde_json::json!({
      "text": "Jane Doe",
      "mimeType": "text/plain",
      "config": {"baseline_score": 140},
    }))
    .unwrap();
    assert!(run(&bad).is_err());
  }

  #[test]
  fn embedded_config_with_extreme_penalty_is_rejected() {
    let bad: Input = serde_json::from_value(serde_json::json!({
      "text": "Jane Doe",
      "mimeType": "text/plain",
      "config": {"penalties": {"no_name": 2147483647}},
    }))
    .unwrap();
    let err = run(&bad).unwrap_err();
    assert!(matches!(err, EngineError::Validation { .. }));
  }

  #[test]
  fn load_config_reports_missing_file() {
    let err = load_config("/nonexistent/ats-engine.json").unwrap_err();
    assert!(matches!(err, EngineError::Io { .. }));
  }

  #[test]
  fn load_config_reads_partial_overrides() {
    let path = std::env::temp_dir().join(format!("ats-engine-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"penalties": {"tables": 12}}"#).unwrap();
    let config = load_config(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(config.penalties.tables, 12);
    assert_eq!(config.penalties.multi_column, Config::default().penalties.multi_column);
  }
}
