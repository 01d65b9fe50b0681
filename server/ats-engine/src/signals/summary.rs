//! Professional-summary detection. A bare header does not count.

use serde::Serialize;

use super::{prefix_chars, word_count};
use crate::config::DetectionThresholds;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySignal {
  pub has_summary: bool,
  pub header_found: bool,
  /// Words following the best header occurrence, within the window.
  pub content_words: usize,
  pub message: String,
}

pub fn detect(text: &str, t: &DetectionThresholds) -> SummarySignal {
  // Header at the start of its own line, alone or followed by a colon.
  let header = regex!(
    r"(?im)^[ \t]*(?:(?:(?:professional|career|executive|personal)[ \t]+)?(?:summary|objective|profile)|about[ \t]+me)(?:[ \t]*:|[ \t]*\r?$)"
  );

  let content_words = header
    .find_iter(text)
    .map(|m| {
      let following = prefix_chars(&text[m.end()..], t.summary_window_chars);
      word_count(following.trim_start_matches(|c: char| c == ':' || c.is_whitespace()))
    })
    .max();

  let header_found = content_words.is_some();
  let content_words = content_words.unwrap_or(0);
  let has_summary = content_words >= t.summary_min_words;

  let message = if has_summary {
    format!("Summary found ({} words)", content_words)
  } else if header_found {
    format!(
      "Summary header found but only {} words of content",
      content_words
    )
  } else {
    "No summary or objective section".to_string()
  };

  SummarySignal {
    has_summary,
    header_found,
    content_words,
    message,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn t() -> DetectionThresholds {
    DetectionThresholds::default()
  }

  #[test]
  fn summary_with_content() {
    let text = "PROFESSIONAL SUMMARY\nBackend engineer with a track record of building reliable payment \
      systems, mentoring engineers, and leading migrations to cloud infrastructure across three companies.\nEXPERIENCE";
    let sig = detect(text, &t());
    assert!(sig.has_summary);
    assert!(sig.content_words >= 20);
  }

  #[test]
  fn bare_header_does_not_count() {
    let sig = detect("Summary\n\nExperience\nEngineer at Acme", &t());
    assert!(sig.header_found);
    assert!(!sig.has_summary);
  }

  #[test]
  fn inline_header_with_colon() {
    let text = "Jane Doe\nSummary: Platform engineer who has spent six years running payment \
      infrastructure, leading incident reviews and coaching teams through large database migrations.";
    let sig = detect(text, &t());
    assert!(sig.header_found);
    assert!(sig.has_summary);
  }

  #[test]
  fn keyword_inside_a_sentence_is_not_a_header() {
    let text = "Jane Doe\nExperience\n\u{2022} Rebuilt the customer profile service so that \
      account pages load in under a second for every region, cutting support tickets \
      about stale data and summary emails by a third over two quarters";
    let sig = detect(text, &t());
    assert!(!sig.header_found);
    assert!(!sig.has_summary);
    assert_eq!(sig.content_words, 0);
  }

  #[test]
  fn missing_header() {
    let sig = detect("Jane Doe\nExperience\nEngineer", &t());
    assert!(!sig.header_found);
    assert!(!sig.has_summary);
  }
}
