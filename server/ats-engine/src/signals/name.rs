//! Candidate-name detection at the top of the document.

use serde::Serialize;

use super::prefix_chars;
use super::sections::HEADER_WORDS;
use crate::config::DetectionThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMethod {
  /// A dedicated 2-4 word line in all caps or title case.
  Line,
  /// A title-case word pair anywhere near the start.
  Loose,
  None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameSignal {
  pub has_name: bool,
  pub candidate: Option<String>,
  pub method: NameMethod,
  pub message: String,
}

const MIN_NAME_WORDS: usize = 2;
const MAX_NAME_WORDS: usize = 4;

fn is_header_word(word: &str) -> bool {
  let lower = word.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase();
  HEADER_WORDS.contains(&lower.as_str())
}

/// "JANE", "Jane", "O'Neil", "Smith-Jones", or an initial like "Q.".
fn is_name_word(word: &str) -> bool {
  let all_caps = regex!(r"^[\p{Lu}][\p{Lu}'’.-]*$");
  let title_case = regex!(r"^[\p{Lu}][\p{Ll}'’-]*(?:-[\p{Lu}][\p{Ll}]+)?\.?$");
  all_caps.is_match(word) || title_case.is_match(word)
}

fn line_candidate(line: &str) -> Option<String> {
  let words: Vec<&str> = line.split_whitespace().collect();
  if words.len() < MIN_NAME_WORDS || words.len() > MAX_NAME_WORDS {
    return None;
  }
  if words.iter().any(|w| is_header_word(w)) {
    return None;
  }
  // At least one word must be longer than an initial.
  if !words.iter().any(|w| w.trim_end_matches('.').chars().count() > 1) {
    return None;
  }
  words
    .iter()
    .all(|w| is_name_word(w))
    .then(|| words.join(" "))
}

fn loose_candidate(head: &str) -> Option<String> {
  let pair = regex!(r"\b[\p{Lu}][\p{Ll}]+(?:\s+[\p{Lu}]\.?)?\s+[\p{Lu}][\p{Ll}]+\b");
  pair
    .find_iter(head)
    .map(|m| m.as_str())
    .find(|s| !s.split_whitespace().any(is_header_word))
    .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
}

pub fn detect(text: &str, t: &DetectionThresholds) -> NameSignal {
  let head = prefix_chars(text, t.name_window_chars);
  let from_lines = head
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .take(t.name_window_lines)
    .find_map(line_candidate);

  let (candidate, method) = match from_lines {
    Some(name) => (Some(name), NameMethod::Line),
    None => match loose_candidate(prefix_chars(text, t.name_loose_window_chars)) {
      Some(name) => (Some(name), NameMethod::Loose),
      None => (None, NameMethod::None),
    },
  };

  let message = match &candidate {
    Some(name) => format!("Name detected: {}", name),
    None => "No candidate name near the top of the document".to_string(),
  };

  NameSignal {
    has_name: candidate.is_some(),
    candidate,
    method,
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
  fn title_case_first_line() {
    let sig = detect("Jane Q. Doe\njane@example.com", &t());
    assert_eq!(sig.candidate.as_deref(), Some("Jane Q. Doe"));
    assert_eq!(sig.method, NameMethod::Line);
  }

  #[test]
  fn all_caps_name_after_blank_lines() {
    let sig = detect("\n\n  MARÍA LÓPEZ-GARCÍA  \nData Engineer", &t());
    assert!(sig.has_name);
    assert_eq!(sig.candidate.as_deref(), Some("MARÍA LÓPEZ-GARCÍA"));
  }

  #[test]
  fn section_headers_are_not_names() {
    let sig = detect("PROFESSIONAL SUMMARY\nWork Experience\nbuilt things", &t());
    assert!(!sig.has_name);
  }

  #[test]
  fn loose_fallback_inside_a_line() {
    let sig = detect("Resume of John Smith, software engineer based in Austin", &t());
    assert_eq!(sig.method, NameMethod::Loose);
    assert_eq!(sig.candidate.as_deref(), Some("John Smith"));
  }
}
