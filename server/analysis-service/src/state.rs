//! Shared, read-only service state.

use ats_engine::Config;

use crate::assessor::Assessor;
use crate::config::ServiceConfig;
use crate::error::ServiceError;

pub struct AppState {
  /// None when no assessment endpoint is configured.
  pub assessor: Option<Assessor>,
  pub engine_config: Config,
}

impl AppState {
  pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
    let engine_config = match &config.engine_config_path {
      Some(path) => ats_engine::load_config(path)?,
      None => Config::default(),
    };
    let assessor = config.assessment.as_ref().map(Assessor::new).transpose()?;
    Ok(Self {
      assessor,
      engine_config,
    })
  }

  /// Engine defaults, no assessment.
  pub fn offline() -> Self {
    Self {
      assessor: None,
      engine_config: Config::default(),
    }
  }
}
