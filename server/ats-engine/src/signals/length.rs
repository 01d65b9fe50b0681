//! Document length in words and pages.

use serde::Serialize;

use super::word_count;
use crate::config::DetectionThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthVerdict {
  TooShort,
  Optimal,
  TooLong,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthSignal {
  pub word_count: usize,
  pub page_count: u32,
  /// True when `page_count` was derived from the word count.
  pub pages_estimated: bool,
  pub verdict: LengthVerdict,
  pub message: String,
}

impl LengthSignal {
  pub fn is_optimal(&self) -> bool {
    self.verdict == LengthVerdict::Optimal
  }
}

pub fn estimate_pages(words: usize, t: &DetectionThresholds) -> u32 {
  words.div_ceil(t.words_per_page.max(1)).max(1) as u32
}

pub fn detect(text: &str, page_count: Option<u32>, t: &DetectionThresholds) -> LengthSignal {
  let words = word_count(text);
  let (pages, pages_estimated) = match page_count {
    Some(p) if p > 0 => (p, false),
    _ => (estimate_pages(words, t), true),
  };

  let verdict = if words < t.optimal_min_words || pages < t.optimal_min_pages {
    LengthVerdict::TooShort
  } else if words > t.optimal_max_words || pages > t.optimal_max_pages {
    LengthVerdict::TooLong
  } else {
    LengthVerdict::Optimal
  };

  let message = match verdict {
    LengthVerdict::TooShort => format!(
      "{} words; at least {} recommended",
      words, t.optimal_min_words
    ),
    LengthVerdict::TooLong => format!(
      "{} words over {} page(s); aim for {}-{} words on {}-{} pages",
      words,
      pages,
      t.optimal_min_words,
      t.optimal_max_words,
      t.optimal_min_pages,
      t.optimal_max_pages
    ),
    LengthVerdict::Optimal => format!("{} words over {} page(s)", words, pages),
  };

  LengthSignal {
    word_count: words,
    page_count: pages,
    pages_estimated,
    verdict,
    message,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
  }

  #[test]
  fn lower_boundary_is_exact() {
    let t = DetectionThresholds::default();
    assert_eq!(detect(&words(399), None, &t).verdict, LengthVerdict::TooShort);
    assert_eq!(detect(&words(400), None, &t).verdict, LengthVerdict::Optimal);
  }

  #[test]
  fn upper_boundary_is_exact() {
    let t = DetectionThresholds::default();
    assert_eq!(detect(&words(800), None, &t).verdict, LengthVerdict::Optimal);
    assert_eq!(detect(&words(801), None, &t).verdict, LengthVerdict::TooLong);
  }

  #[test]
  fn reported_pages_override_estimate() {
    let t = DetectionThresholds::default();
    let sig = detect(&words(500), Some(3), &t);
    assert_eq!(sig.verdict, LengthVerdict::TooLong);
    assert!(!sig.pages_estimated);
  }

  #[test]
  fn estimate_never_below_one_page() {
    let t = DetectionThresholds::default();
    assert_eq!(estimate_pages(0, &t), 1);
    assert_eq!(estimate_pages(401, &t), 2);
  }
}
