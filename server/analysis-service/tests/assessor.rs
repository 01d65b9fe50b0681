//! Assessment client against a local mock chat-completions endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use analysis_service::assessor::Assessor;
use analysis_service::config::AssessorConfig;

/// Fails with `status` for the first `failures` calls, then succeeds.
async fn mock_endpoint(failures: usize, status: StatusCode) -> (String, Arc<AtomicUsize>) {
  let calls = Arc::new(AtomicUsize::new(0));
  let handler = move |State(calls): State<Arc<AtomicUsize>>| async move {
    let n = calls.fetch_add(1, Ordering::SeqCst);
    if n < failures {
      return (status, Json(json!({ "error": "busy" })));
    }
    let content = json!({
      "overallScore": 81,
      "content": { "score": 70, "achievementExamples": ["Cut costs 30%"] },
      "recommendedImprovements": ["Add more keywords"]
    })
    .to_string();
    (
      StatusCode::OK,
      Json::<Value>(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }],
        "usage": { "prompt_tokens": 1000, "completion_tokens": 200 }
      })),
    )
  };

  let app = Router::new()
    .route("/v1/chat/completions", post(handler))
    .with_state(calls.clone());
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  (format!("http://{}/v1", addr), calls)
}

fn assessor(api_url: String) -> Assessor {
  Assessor::new(&AssessorConfig {
    api_url,
    api_key: Some("test-key".into()),
    model: "test-model".into(),
    timeout: Duration::from_secs(5),
    retry_backoff: Duration::from_millis(10),
    max_chars: 100,
    input_cost_per_1k: 0.001,
    output_cost_per_1k: 0.002,
  })
  .unwrap()
}

#[tokio::test]
async fn successful_assessment_is_priced() {
  let (url, calls) = mock_endpoint(0, StatusCode::OK).await;
  let a = assessor(url).assess("Jane Doe resume text").await.unwrap();
  assert_eq!(a.overall_score, 81);
  assert_eq!(a.content.achievement_examples.len(), 1);
  assert!((a.estimated_cost - 0.0014).abs() < 1e-9);
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn one_retry_after_server_error() {
  let (url, calls) = mock_endpoint(1, StatusCode::SERVICE_UNAVAILABLE).await;
  let a = assessor(url).assess("Jane Doe resume text").await;
  assert!(a.is_some());
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn gives_up_after_second_failure() {
  let (url, calls) = mock_endpoint(5, StatusCode::TOO_MANY_REQUESTS).await;
  assert!(assessor(url).assess("Jane Doe resume text").await.is_none());
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
  let (url, calls) = mock_endpoint(5, StatusCode::BAD_REQUEST).await;
  assert!(assessor(url).assess("Jane Doe resume text").await.is_none());
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_endpoint_degrades_to_none() {
  // Nothing listens on the loopback discard port.
  let a = assessor("http://127.0.0.1:9/v1".into()).assess("text").await;
  assert!(a.is_none());
}
