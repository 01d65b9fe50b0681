//! Binary entrypoint for the analysis service.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use analysis_service::{router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .init();

  let config = ServiceConfig::from_env()?;
  let state = Arc::new(AppState::from_config(&config)?);
  if state.assessor.is_none() {
    info!("ASSESSMENT_API_URL not set; analyses will use parseability only");
  }

  let addr = config.socket_addr();
  let app = router(state);
  info!("analysis-service listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
