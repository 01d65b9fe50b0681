//! Employment-date detection: real dates vs template placeholders.

use chrono::Month;
use serde::Serialize;
use std::ops::Range;

use crate::config::DetectionThresholds;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateSignal {
  pub valid_dates: usize,
  pub has_valid_dates: bool,
  pub has_placeholders: bool,
  pub placeholders: Vec<String>,
  pub message: String,
}

const MONTH_NAMES: &str =
  r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// Month-name token recognized by chrono ("Sept" is normalized to "sep").
fn is_month(token: &str) -> bool {
  let lower = token.trim_end_matches('.').to_ascii_lowercase();
  let name = if lower.starts_with("sept") && lower != "september" {
    "sep"
  } else {
    lower.as_str()
  };
  name.parse::<Month>().is_ok()
}

fn overlaps(claimed: &[Range<usize>], span: &Range<usize>) -> bool {
  claimed.iter().any(|c| c.start < span.end && span.start < c.end)
}

/// Count date mentions. Specific formats claim their spans first, so
/// "Jan 2020" is one date rather than a month date plus a bare year.
fn count_valid_dates(text: &str) -> usize {
  let month_year = regex!(&format!(
    r"(?i)\b(?P<month>{})\.?,?\s+(?:19|20)\d{{2}}\b",
    MONTH_NAMES
  ));
  let iso = regex!(r"\b(?:19|20)\d{2}-(?:0[1-9]|1[0-2])(?:-(?:0[1-9]|[12]\d|3[01]))?\b");
  let month_slash_year = regex!(r"\b(?:0?[1-9]|1[0-2])/(?:19|20)\d{2}\b");
  let bare_year = regex!(r"\b(?:19|20)\d{2}\b");

  let mut claimed: Vec<Range<usize>> = Vec::new();

  for caps in month_year.captures_iter(text) {
    let (Some(whole), Some(month)) = (caps.get(0), caps.name("month")) else {
      continue;
    };
    if is_month(month.as_str()) {
      claimed.push(whole.range());
    }
  }
  for re in [iso, month_slash_year] {
    for m in re.find_iter(text) {
      if !overlaps(&claimed, &m.range()) {
        claimed.push(m.range());
      }
    }
  }
  let bare = bare_year
    .find_iter(text)
    .filter(|m| !overlaps(&claimed, &m.range()))
    .count();

  claimed.len() + bare
}

fn find_placeholders(text: &str) -> Vec<String> {
  let patterns = [
    regex!(r"(?i)\b(?:19|20)xx\b"),
    regex!(r"\bXX/(?:XX){1,2}\b"),
    regex!(&format!(r"(?i)\b(?:{})\.?\s+XX(?:XX)?\b", MONTH_NAMES)),
    regex!(r"\bXXXX\b"),
  ];
  let mut found: Vec<String> = Vec::new();
  let mut claimed: Vec<Range<usize>> = Vec::new();
  for re in patterns {
    for m in re.find_iter(text) {
      if overlaps(&claimed, &m.range()) {
        continue;
      }
      claimed.push(m.range());
      let s = m.as_str().to_string();
      if !found.contains(&s) {
        found.push(s);
      }
    }
  }
  found
}

pub fn detect(text: &str, t: &DetectionThresholds) -> DateSignal {
  let valid_dates = count_valid_dates(text);
  let placeholders = find_placeholders(text);
  let has_placeholders = !placeholders.is_empty();
  let has_valid_dates = valid_dates >= t.min_valid_dates;

  let message = if has_placeholders {
    format!("Placeholder dates found: {}", placeholders.join(", "))
  } else if !has_valid_dates {
    format!(
      "{} valid date(s) found; start and end dates are needed",
      valid_dates
    )
  } else {
    format!("{} valid dates found", valid_dates)
  };

  DateSignal {
    valid_dates,
    has_valid_dates,
    has_placeholders,
    placeholders,
    message,
  }
}
