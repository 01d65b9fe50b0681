//! External qualitative assessment over an OpenAI-compatible chat API.
//!
//! Any failure (transport, status, decode) is logged and turned into `None`;
//! the engine's no-assessment branch handles the rest.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ats_engine::assessment::request_text;
use ats_engine::QualitativeAssessment;

use crate::config::AssessorConfig;
use crate::error::{AssessmentError, ServiceError};

const SYSTEM_PROMPT: &str = r#"You review resumes for applicant tracking system (ATS) compatibility.
Reply with a single JSON object and nothing else, using exactly these keys:
{
  "overallScore": 0-100,
  "format": {"score": 0-100, "issues": [string]},
  "keyword": {"score": 0-100, "matchedKeywords": [string], "missingKeywords": [string]},
  "contact": {"score": 0-100, "location": "header|body|footer|missing", "hasEmail": bool, "hasPhone": bool},
  "content": {"score": 0-100, "achievementExamples": [string], "hasQuantifiedAchievements": bool},
  "redFlags": [string],
  "requiredFixes": [string],
  "recommendedImprovements": [string]
}
achievementExamples must quote concrete, quantified accomplishments from the resume.
Leave a list empty rather than inventing entries."#;

/// Chat-completions client with one bounded retry.
#[derive(Clone)]
pub struct Assessor {
  client: Client,
  endpoint: String,
  model: String,
  retry_backoff: Duration,
  max_chars: usize,
  pricing: Pricing,
}

/// USD per 1K tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
  pub input_per_1k: f64,
  pub output_per_1k: f64,
}

impl Pricing {
  pub fn cost(&self, usage: &Usage) -> f64 {
    usage.prompt_tokens as f64 / 1000.0 * self.input_per_1k
      + usage.completion_tokens as f64 / 1000.0 * self.output_per_1k
  }
}

impl Assessor {
  pub fn new(config: &AssessorConfig) -> Result<Self, ServiceError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(key) = &config.api_key {
      let auth = HeaderValue::from_str(&format!("Bearer {}", key))
        .map_err(|_| ServiceError::config("ASSESSMENT_API_KEY is not a valid header value"))?;
      headers.insert(AUTHORIZATION, auth);
    }
    let client = Client::builder()
      .timeout(config.timeout)
      .default_headers(headers)
      .build()
      .map_err(|e| ServiceError::config(format!("building assessment HTTP client: {}", e)))?;

    Ok(Self {
      client,
      endpoint: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
      model: config.model.clone(),
      retry_backoff: config.retry_backoff,
      max_chars: config.max_chars,
      pricing: Pricing {
        input_per_1k: config.input_cost_per_1k,
        output_per_1k: config.output_cost_per_1k,
      },
    })
  }

  /// Assess one resume. `None` on any failure.
  pub async fn assess(&self, text: &str) -> Option<QualitativeAssessment> {
    match self.assess_with_retry(text).await {
      Ok(assessment) => {
        debug!(
          overall = assessment.overall_score,
          cost = assessment.estimated_cost,
          "assessment received"
        );
        Some(assessment)
      }
      Err(e) => {
        warn!(error = %e, "assessment unavailable");
        None
      }
    }
  }

  async fn assess_with_retry(&self, text: &str) -> Result<QualitativeAssessment, AssessmentError> {
    let request = ChatRequest {
      model: &self.model,
      messages: vec![
        ChatMessage {
          role: "system",
          content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
          role: "user",
          content: request_text(text, self.max_chars),
        },
      ],
      response_format: ResponseFormat {
        kind: "json_object",
      },
      temperature: 0.0,
    };

    match self.send(&request).await {
      Err(e) if e.is_retryable() => {
        debug!(error = %e, backoff_ms = self.retry_backoff.as_millis() as u64, "retrying assessment");
        tokio::time::sleep(self.retry_backoff).await;
        self.send(&request).await
      }
      other => other,
    }
  }

  async fn send(&self, request: &ChatRequest<'_>) -> Result<QualitativeAssessment, AssessmentError> {
    let resp = self.client.post(&self.endpoint).json(request).send().await?;
    let status = resp.status();
    if !status.is_success() {
      let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());
      return Err(AssessmentError::Status { status, body });
    }
    let body = resp.text().await?;
    decode_completion(&body, &self.pricing)
  }
}

/// Pull the assessment JSON out of a chat-completions body and price it.
pub fn decode_completion(body: &str, pricing: &Pricing) -> Result<QualitativeAssessment, AssessmentError> {
  let completion: ChatResponse =
    serde_json::from_str(body).map_err(|e| AssessmentError::Decode(e.to_string()))?;
  let content = completion
    .choices
    .into_iter()
    .next()
    .and_then(|c| c.message.content)
    .ok_or_else(|| AssessmentError::Decode("completion has no content".to_string()))?;

  let mut assessment: QualitativeAssessment = serde_json::from_str(strip_code_fence(&content))
    .map_err(|e| AssessmentError::Decode(e.to_string()))?;
  assessment.estimated_cost = completion
    .usage
    .map(|usage| pricing.cost(&usage))
    .unwrap_or(0.0);
  Ok(assessment)
}

/// Some models wrap JSON in ```json fences despite the response format.
fn strip_code_fence(content: &str) -> &str {
  let trimmed = content.trim();
  match trimmed.strip_prefix("```") {
    Some(rest) => rest
      .trim_start_matches("json")
      .trim_end()
      .trim_end_matches("```")
      .trim(),
    None => trimmed,
  }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage>,
  response_format: ResponseFormat,
  temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
  role: &'static str,
  content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
  #[serde(rename = "type")]
  kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<ChatChoice>,
  #[serde(default)]
  usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
  #[serde(default)]
  content: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
  #[serde(default)]
  pub prompt_tokens: u64,
  #[serde(default)]
  pub completion_tokens: u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  const PRICING: Pricing = Pricing {
    input_per_1k: 0.00015,
    output_per_1k: 0.0006,
  };

  #[test]
  fn cost_from_usage() {
    let cost = PRICING.cost(&Usage {
      prompt_tokens: 2000,
      completion_tokens: 500,
    });
    assert!((cost - 0.0006).abs() < 1e-12);
  }

  #[test]
  fn decodes_fenced_content() {
    let body = serde_json::json!({
      "choices": [{"message": {"content": "```json\n{\"overallScore\": 77, \"redFlags\": null}\n```"}}],
      "usage": {"prompt_tokens": 1000, "completion_tokens": 1000}
    })
    .to_string();
    let a = decode_completion(&body, &PRICING).unwrap();
    assert_eq!(a.overall_score, 77);
    assert!(a.red_flags.is_empty());
    assert!((a.estimated_cost - 0.00075).abs() < 1e-12);
  }

  #[test]
  fn empty_choices_is_a_decode_error() {
    let err = decode_completion(r#"{"choices": []}"#, &PRICING).unwrap_err();
    assert!(matches!(err, AssessmentError::Decode(_)));
  }
}
