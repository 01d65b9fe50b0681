//! Experience-level inference. Only used to modulate the length penalty.

use serde::Serialize;

use crate::config::DetectionThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceSource {
  Explicit,
  Keywords,
  Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceSignal {
  pub years: u32,
  pub source: ExperienceSource,
  pub seniority_keywords: usize,
  pub is_experienced: bool,
  pub message: String,
}

/// Largest "N years of experience" claim in the text.
fn explicit_years(text: &str) -> Option<u32> {
  let re = regex!(
    r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\.?\s+(?:of\s+)?(?:professional\s+|industry\s+|relevant\s+|hands-on\s+|progressive\s+)?(?:work\s+)?experience\b"
  );
  re.captures_iter(text)
    .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
    .max()
}

fn seniority_keywords(text: &str) -> usize {
  regex!(
    r"(?i)\b(?:senior|sr|lead|principal|staff|manager|director|head\s+of|architect|vice\s+president|vp|chief)\b"
  )
  .find_iter(text)
  .count()
}

pub fn detect(text: &str, t: &DetectionThresholds) -> ExperienceSignal {
  let keywords = seniority_keywords(text);

  let (years, source) = match explicit_years(text) {
    Some(y) => (y, ExperienceSource::Explicit),
    None if keywords >= t.senior_keyword_count => (t.senior_years, ExperienceSource::Keywords),
    None if keywords >= t.mid_keyword_count => (t.mid_years, ExperienceSource::Keywords),
    None => (0, ExperienceSource::Unknown),
  };

  let is_experienced = years >= t.experienced_min_years;
  let message = match source {
    ExperienceSource::Explicit => format!("{} years of experience stated", years),
    ExperienceSource::Keywords => format!(
      "About {} years inferred from {} seniority keywords",
      years, keywords
    ),
    ExperienceSource::Unknown => "Experience level not stated".to_string(),
  };

  ExperienceSignal {
    years,
    source,
    seniority_keywords: keywords,
    is_experienced,
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
  fn explicit_claim_wins() {
    let sig = detect("Engineer with 7+ years of professional experience. Senior lead architect.", &t());
    assert_eq!(sig.years, 7);
    assert_eq!(sig.source, ExperienceSource::Explicit);
    assert!(sig.is_experienced);
  }

  #[test]
  fn largest_claim_is_used() {
    assert_eq!(explicit_years("2 years experience in Go, 10 years of experience overall"), Some(10));
  }

  #[test]
  fn keywords_estimate_years() {
    assert_eq!(detect("Senior Engineer. Tech Lead. Staff Engineer.", &t()).years, 5);
    assert_eq!(detect("Senior Engineer, later Lead", &t()).years, 3);
    let junior = detect("Junior developer and intern", &t());
    assert_eq!(junior.years, 0);
    assert!(!junior.is_experienced);
  }
}
