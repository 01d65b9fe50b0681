//! Multi-column layout detection.
//!
//! Two-column PDFs extract as interleaved fragments: short labels next to long
//! runs of body text, wide internal gaps, and lines whose length jumps around.
//! Only the head of the document is scanned.

use serde::Serialize;

use super::char_len;
use crate::config::DetectionThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnConfidence {
  None,
  Low,
  Medium,
  High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSignal {
  pub is_multi_column: bool,
  pub suspicious_patterns: usize,
  pub confidence: ColumnConfidence,
  pub message: String,
}

pub fn detect(text: &str, t: &DetectionThresholds) -> ColumnSignal {
  let lines: Vec<&str> = text.lines().take(t.column_scan_lines).collect();
  let lengths: Vec<usize> = lines.iter().map(|l| char_len(l.trim())).collect();

  // Short line immediately followed by a long one.
  let short_then_long = lengths
    .windows(2)
    .filter(|w| w[0] > 0 && w[0] < t.column_short_line && w[1] > t.column_long_line)
    .count();

  // Left/right aligned content separated by a wide gap.
  let gap = " ".repeat(t.column_gap_spaces);
  let wide_gaps = lines
    .iter()
    .filter(|l| l.trim().contains(gap.as_str()))
    .count();

  // A line that differs sharply from both neighbours.
  let jumps = lengths
    .windows(3)
    .filter(|w| {
      w[1].abs_diff(w[0]) > t.column_length_jump && w[1].abs_diff(w[2]) > t.column_length_jump
    })
    .count();

  let suspicious_patterns = short_then_long + wide_gaps + jumps;
  let is_multi_column = suspicious_patterns >= t.column_min_patterns;
  let confidence = if suspicious_patterns >= t.column_high_patterns {
    ColumnConfidence::High
  } else if is_multi_column {
    ColumnConfidence::Medium
  } else if suspicious_patterns > 0 {
    ColumnConfidence::Low
  } else {
    ColumnConfidence::None
  };

  let message = if is_multi_column {
    format!(
      "{} column-layout patterns in the first {} lines",
      suspicious_patterns,
      lines.len()
    )
  } else {
    "Single-column layout".to_string()
  };

  ColumnSignal {
    is_multi_column,
    suspicious_patterns,
    confidence,
    message,
  }
}
