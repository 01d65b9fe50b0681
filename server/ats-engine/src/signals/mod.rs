//! Independent signal detectors. Each is a pure function of its input text
//! (plus the injected page count where noted) and returns an immutable record.

/// Lazily compiled static regex.
macro_rules! regex {
  ($re:expr $(,)?) => {{
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| regex::Regex::new($re).expect("static regex"))
  }};
}

pub mod bullets;
pub mod columns;
pub mod contact;
pub mod dates;
pub mod experience;
pub mod extractability;
pub mod length;
pub mod metrics;
pub mod name;
pub mod sections;
pub mod summary;
pub mod tables;

use serde::Serialize;

use crate::config::DetectionThresholds;
use crate::types::Document;

pub use bullets::BulletSignal;
pub use columns::ColumnSignal;
pub use contact::{ContactPlacement, ContactSignal};
pub use dates::DateSignal;
pub use experience::ExperienceSignal;
pub use extractability::ExtractabilitySignal;
pub use length::{LengthSignal, LengthVerdict};
pub use metrics::MetricsSignal;
pub use name::NameSignal;
pub use summary::SummarySignal;
pub use tables::TableSignal;

/// Every detector's finding for one document, keyed by detector name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalDetails {
  pub extractability: ExtractabilitySignal,
  pub tables: TableSignal,
  pub columns: ColumnSignal,
  pub length: LengthSignal,
  pub contact: ContactSignal,
  pub dates: DateSignal,
  pub experience: ExperienceSignal,
  pub name: NameSignal,
  pub summary: SummarySignal,
  pub bullets: BulletSignal,
  pub metrics: MetricsSignal,
}

/// Run every detector over the same document. Order does not matter.
pub fn detect_all(
  doc: &Document<'_>,
  page_count: Option<u32>,
  t: &DetectionThresholds,
) -> SignalDetails {
  let text = doc.text;
  SignalDetails {
    extractability: extractability::detect(doc, page_count, t),
    tables: tables::detect(text, t),
    columns: columns::detect(text, t),
    length: length::detect(text, page_count, t),
    contact: contact::detect(text, t),
    dates: dates::detect(text, t),
    experience: experience::detect(text, t),
    name: name::detect(text, t),
    summary: summary::detect(text, t),
    bullets: bullets::detect(text, t),
    metrics: metrics::detect(text, t),
  }
}

/// Drop control and other non-printable characters, keeping whitespace.
pub fn strip_non_printable(text: &str) -> String {
  text
    .chars()
    .filter(|c| c.is_whitespace() || !(c.is_control() || is_format_char(*c)))
    .collect()
}

/// Zero-width and BOM characters that PDF extraction leaves behind.
fn is_format_char(c: char) -> bool {
  matches!(c, '\u{200B}'..='\u{200F}' | '\u{2060}' | '\u{FEFF}')
}

/// Whitespace-tokenized word count after stripping non-printables.
pub fn word_count(text: &str) -> usize {
  strip_non_printable(text).split_whitespace().count()
}

/// Character count (not bytes).
pub(crate) fn char_len(s: &str) -> usize {
  s.chars().count()
}

/// Longest prefix of `s` holding at most `max_chars` characters.
pub(crate) fn prefix_chars(s: &str, max_chars: usize) -> &str {
  match s.char_indices().nth(max_chars) {
    Some((idx, _)) => &s[..idx],
    None => s,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn word_count_ignores_control_chars() {
    assert_eq!(word_count("one\u{0007} two\u{200B}  three\n"), 3);
    assert_eq!(word_count("\u{0001}\u{0002}"), 0);
  }

  #[test]
  fn prefix_respects_char_boundaries() {
    assert_eq!(prefix_chars("héllo", 2), "hé");
    assert_eq!(prefix_chars("abc", 10), "abc");
  }
}
