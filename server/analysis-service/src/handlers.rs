//! HTTP handlers for the analysis service.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use ats_engine::fingerprint::document_id;
use ats_engine::{CombinedAnalysis, Input};

use crate::error::ServiceError;
use crate::state::AppState;

/// Extracted document as sent by the upload pipeline.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
  pub text: String,
  pub mime_type: String,
  #[serde(default)]
  pub file_path: Option<String>,
  #[serde(default)]
  pub page_count: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
  pub document_id: String,
  pub analysis: CombinedAnalysis,
}

pub async fn health() -> &'static str {
  "ok"
}

pub async fn analyze(
  State(state): State<Arc<AppState>>,
  Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ServiceError> {
  let mut input = Input {
    text: req.text,
    mime_type: req.mime_type,
    file_path: req.file_path,
    page_count: req.page_count,
    assessment: None,
    config: Some(state.engine_config.clone()),
  };
  // Reject bad input before paying for an assessment.
  input.validate()?;

  let document_id = document_id(&input.text);
  if let Some(assessor) = &state.assessor {
    input.assessment = assessor.assess(&input.text).await;
  }

  // Page counting may read the stored PDF.
  let analysis = tokio::task::spawn_blocking(move || ats_engine::run(&input)).await??;
  info!(
    document = %document_id,
    overall = analysis.overall_score,
    "analysis served"
  );

  Ok(Json(AnalyzeResponse {
    document_id,
    analysis,
  }))
}
