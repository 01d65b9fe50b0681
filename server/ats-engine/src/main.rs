//! Binary entrypoint: read one JSON Input from stdin, write one JSON object
//! to stdout.
//!
//! The output is either a CombinedAnalysis or an ErrorOutput (invalid input).
//! Logs go to stderr only; stdout carries the JSON contract.

use ats_engine::types::ErrorOutput;
use ats_engine::{run, EngineError, Input};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

fn main() {
  init_tracing();
  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "ats-engine error: {}", e);
    std::process::exit(1);
  }
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(false)
    .with_ansi(false)
    .try_init();
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;

  let json = match serde_json::from_str::<Input>(&raw) {
    Ok(input) => match run(&input) {
      Ok(analysis) => serde_json::to_vec(&analysis)?,
      Err(EngineError::Validation { field, reason }) => {
        serde_json::to_vec(&ErrorOutput::new(reason).with_field(field))?
      }
      Err(e) => serde_json::to_vec(&ErrorOutput::new(e.to_string()))?,
    },
    Err(e) => serde_json::to_vec(&ErrorOutput::new(format!("json parse: {}", e)))?,
  };

  let mut out = io::stdout().lock();
  out.write_all(&json)?;
  out.write_all(b"\n")?;
  out.flush()?;
  Ok(())
}
