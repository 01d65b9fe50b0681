//! Service configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ServiceError;

pub const DEFAULT_PORT: u16 = 5005;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
  pub bind_addr: IpAddr,
  pub port: u16,
  /// None disables the external assessment; every analysis degrades.
  pub assessment: Option<AssessorConfig>,
  pub engine_config_path: Option<PathBuf>,
}

/// OpenAI-compatible chat-completions endpoint and its pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessorConfig {
  pub api_url: String,
  pub api_key: Option<String>,
  pub model: String,
  pub timeout: Duration,
  pub retry_backoff: Duration,
  pub max_chars: usize,
  /// USD per 1K prompt tokens.
  pub input_cost_per_1k: f64,
  /// USD per 1K completion tokens.
  pub output_cost_per_1k: f64,
}

impl ServiceConfig {
  pub fn from_env() -> Result<Self, ServiceError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build from any key lookup; empty values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServiceError> {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let assessment = match get("ASSESSMENT_API_URL") {
      Some(api_url) => Some(AssessorConfig {
        api_url,
        api_key: get("ASSESSMENT_API_KEY"),
        model: get("ASSESSMENT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        timeout: Duration::from_secs(parse_or(&get, "ASSESSMENT_TIMEOUT_SECS", 30)?),
        retry_backoff: Duration::from_millis(parse_or(&get, "ASSESSMENT_RETRY_BACKOFF_MS", 1000)?),
        max_chars: parse_or(&get, "ASSESSMENT_MAX_CHARS", 12_000)?,
        input_cost_per_1k: parse_or(&get, "ASSESSMENT_INPUT_COST_PER_1K", 0.00015)?,
        output_cost_per_1k: parse_or(&get, "ASSESSMENT_OUTPUT_COST_PER_1K", 0.0006)?,
      }),
      None => None,
    };

    Ok(Self {
      bind_addr: parse_or(&get, "BIND_ADDR", IpAddr::V4(Ipv4Addr::LOCALHOST))?,
      port: parse_or(&get, "PORT", DEFAULT_PORT)?,
      assessment,
      engine_config_path: get("ENGINE_CONFIG_PATH").map(PathBuf::from),
    })
  }

  pub fn socket_addr(&self) -> SocketAddr {
    SocketAddr::new(self.bind_addr, self.port)
  }
}

fn parse_or<T: FromStr>(
  get: &impl Fn(&str) -> Option<String>,
  key: &str,
  default: T,
) -> Result<T, ServiceError> {
  match get(key) {
    Some(raw) => raw
      .parse()
      .map_err(|_| ServiceError::config(format!("{} has an invalid value: {}", key, raw))),
    None => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn from(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ServiceError> {
    let map: HashMap<String, String> = pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    ServiceConfig::from_lookup(|key| map.get(key).cloned())
  }

  #[test]
  fn defaults_bind_localhost_without_assessment() {
    let config = from(&[]).unwrap();
    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5005");
    assert!(config.assessment.is_none());
    assert!(config.engine_config_path.is_none());
  }

  #[test]
  fn assessment_enabled_by_url() {
    let config = from(&[
      ("ASSESSMENT_API_URL", "http://localhost:9000/v1"),
      ("ASSESSMENT_TIMEOUT_SECS", "5"),
      ("ASSESSMENT_API_KEY", "  "),
    ])
    .unwrap();
    let a = config.assessment.unwrap();
    assert_eq!(a.model, DEFAULT_MODEL);
    assert_eq!(a.timeout, Duration::from_secs(5));
    assert_eq!(a.retry_backoff, Duration::from_millis(1000));
    assert_eq!(a.max_chars, 12_000);
    assert!(a.api_key.is_none());
  }

  #[test]
  fn invalid_port_is_rejected() {
    let err = from(&[("PORT", "http")]).unwrap_err();
    assert!(err.to_string().contains("PORT"));
  }
}
