//! External qualitative assessment: the structured judgement an outside
//! reviewer (usually an LLM) returns for the same resume.
//!
//! The engine never fails on a malformed assessment. Missing, null, or
//! wrongly-typed fields decode as zero/false/empty.

use serde::{Deserialize, Serialize};

/// Marker appended when the request text is cut to the character budget.
pub const TRUNCATION_MARKER: &str = "\n...[truncated]";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualitativeAssessment {
  #[serde(deserialize_with = "lenient::score")]
  pub overall_score: u8,
  #[serde(deserialize_with = "lenient::or_default")]
  pub format: FormatAssessment,
  #[serde(deserialize_with = "lenient::or_default")]
  pub keyword: KeywordAssessment,
  #[serde(deserialize_with = "lenient::or_default")]
  pub contact: ContactAssessment,
  #[serde(deserialize_with = "lenient::or_default")]
  pub content: ContentAssessment,
  #[serde(deserialize_with = "lenient::strings")]
  pub red_flags: Vec<String>,
  #[serde(deserialize_with = "lenient::strings")]
  pub required_fixes: Vec<String>,
  #[serde(deserialize_with = "lenient::strings")]
  pub recommended_improvements: Vec<String>,
  /// Cost of obtaining this assessment, filled in by the client.
  #[serde(deserialize_with = "lenient::number")]
  pub estimated_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatAssessment {
  #[serde(deserialize_with = "lenient::score")]
  pub score: u8,
  #[serde(deserialize_with = "lenient::strings")]
  pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordAssessment {
  #[serde(deserialize_with = "lenient::score")]
  pub score: u8,
  #[serde(deserialize_with = "lenient::strings")]
  pub matched_keywords: Vec<String>,
  #[serde(deserialize_with = "lenient::strings")]
  pub missing_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactAssessment {
  #[serde(deserialize_with = "lenient::score")]
  pub score: u8,
  /// Free-form placement label such as "header", "body" or "missing".
  #[serde(deserialize_with = "lenient::text")]
  pub location: String,
  #[serde(deserialize_with = "lenient::flag")]
  pub has_email: bool,
  #[serde(deserialize_with = "lenient::flag")]
  pub has_phone: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentAssessment {
  #[serde(deserialize_with = "lenient::score")]
  pub score: u8,
  #[serde(deserialize_with = "lenient::strings")]
  pub achievement_examples: Vec<String>,
  #[serde(deserialize_with = "lenient::flag")]
  pub has_quantified_achievements: bool,
}

/// Text sent to the assessor, cut to `max_chars` characters when needed.
pub fn request_text(text: &str, max_chars: usize) -> String {
  let trimmed = text.trim();
  match trimmed.char_indices().nth(max_chars) {
    Some((idx, _)) => format!("{}{}", &trimmed[..idx], TRUNCATION_MARKER),
    None => trimmed.to_string(),
  }
}

mod lenient {
  use serde::de::DeserializeOwned;
  use serde::{Deserialize, Deserializer};
  use serde_json::Value;

  fn as_f64(value: &Value) -> Option<f64> {
    match value {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
      _ => None,
    }
  }

  pub fn score<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(
      as_f64(&value)
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0),
    )
  }

  pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(as_f64(&value).filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0))
  }

  pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
      Value::Bool(b) => b,
      Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
      Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
      _ => false,
    })
  }

  pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
      Value::String(s) => s,
      Value::Null => String::new(),
      other => other.to_string(),
    })
  }

  pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
      Value::Array(items) => items
        .into_iter()
        .filter_map(|item| match item {
          Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
          Value::Number(n) => Some(n.to_string()),
          _ => None,
        })
        .collect(),
      Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
      _ => Vec::new(),
    })
  }

  /// Nested objects: anything that fails to decode becomes the default.
  pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
  where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
  {
    let value = Value::deserialize(d)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_fields_default_to_zero() {
    let a: QualitativeAssessment = serde_json::from_str("{}").unwrap();
    assert_eq!(a, QualitativeAssessment::default());
  }

  #[test]
  fn lenient_values() {
    let a: QualitativeAssessment = serde_json::from_str(
      r#"{
        "overallScore": "82.6",
        "format": null,
        "keyword": {"score": 140, "missingKeywords": ["kubernetes", null, ""]},
        "contact": {"score": 90, "location": "header", "hasEmail": "yes", "hasPhone": 0},
        "content": {"score": -5, "achievementExamples": "Cut costs 30%"},
        "redFlags": null,
        "requiredFixes": ["Add dates"],
        "unknownField": true
      }"#,
    )
    .unwrap();
    assert_eq!(a.overall_score, 83);
    assert_eq!(a.format, FormatAssessment::default());
    assert_eq!(a.keyword.score, 100);
    assert_eq!(a.keyword.missing_keywords, vec!["kubernetes".to_string()]);
    assert!(a.contact.has_email);
    assert!(!a.contact.has_phone);
    assert_eq!(a.content.score, 0);
    assert_eq!(a.content.achievement_examples.len(), 1);
    assert!(a.red_flags.is_empty());
    assert_eq!(a.required_fixes, vec!["Add dates".to_string()]);
  }

  #[test]
  fn malformed_nested_object_becomes_default() {
    let a: QualitativeAssessment =
      serde_json::from_str(r#"{"content": "great", "overallScore": 70}"#).unwrap();
    assert_eq!(a.content, ContentAssessment::default());
    assert_eq!(a.overall_score, 70);
  }

  #[test]
  fn request_text_truncates_on_char_boundary() {
    let text = "é".repeat(10);
    let out = request_text(&text, 4);
    assert_eq!(out, format!("éééé{}", TRUNCATION_MARKER));
    assert_eq!(request_text("short", 100), "short");
  }
}
