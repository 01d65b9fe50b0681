//! Calibration table: every penalty, threshold and weight the engine uses.
//!
//! The magnitudes were calibrated against a fixed set of benchmark resumes
//! scored by an external ATS checker. Re-run that benchmark before changing
//! any of them.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Top-level engine configuration. Every field has a calibrated default, so a
/// partial JSON document is a valid override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Parseability score before any penalty is applied.
  pub baseline_score: i32,
  pub penalties: Penalties,
  pub detection: DetectionThresholds,
  pub overrides: OverrideRules,
  pub scoring: ScoringRules,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      baseline_score: 90,
      penalties: Penalties::default(),
      detection: DetectionThresholds::default(),
      overrides: OverrideRules::default(),
      scoring: ScoringRules::default(),
    }
  }
}

impl Config {
  /// Reject configurations that would break the [0,100] score invariant.
  pub fn validate(&self) -> Result<(), EngineError> {
    if !(0..=100).contains(&self.baseline_score) {
      return Err(EngineError::validation(
        "baseline_score",
        "must be within 0..=100",
      ));
    }
    for (field, value) in self.point_values() {
      if !(0..=100).contains(&value) {
        return Err(EngineError::validation(field, "must be within 0..=100"));
      }
    }
    let w = &self.scoring.weights;
    let sum = w.parseability + w.format + w.keyword + w.contact + w.content;
    if (sum - 1.0).abs() > 1e-6 {
      return Err(EngineError::validation(
        "scoring.weights",
        &format!("must sum to 1.0, got {:.4}", sum),
      ));
    }
    let d = &self.detection;
    if d.optimal_min_words > d.optimal_max_words {
      return Err(EngineError::validation(
        "detection.optimal_min_words",
        "must not exceed optimal_max_words",
      ));
    }
    if d.words_per_page == 0 {
      return Err(EngineError::validation(
        "detection.words_per_page",
        "must be positive",
      ));
    }
    let factors = [
      ("overrides.contact_missing_factor", self.overrides.contact_missing_factor),
      ("overrides.long_document_content_factor", self.overrides.long_document_content_factor),
      ("scoring.calibration_clean", self.scoring.calibration_clean),
      ("scoring.calibration_one_critical", self.scoring.calibration_one_critical),
      ("scoring.calibration_many_critical", self.scoring.calibration_many_critical),
    ];
    for (field, value) in factors {
      if !(0.0..=1.0).contains(&value) {
        return Err(EngineError::validation(field, "must be within 0.0..=1.0"));
      }
    }
    Ok(())
  }

  /// Every penalty, override delta and score threshold, all measured in score points.
  fn point_values(&self) -> Vec<(&'static str, i32)> {
    let p = &self.penalties;
    let o = &self.overrides;
    let s = &self.scoring;
    vec![
      ("penalties.scanned_image", p.scanned_image),
      ("penalties.tables", p.tables),
      ("penalties.multi_column", p.multi_column),
      ("penalties.too_short", p.too_short),
      ("penalties.too_long", p.too_long),
      ("penalties.contact_missing", p.contact_missing),
      ("penalties.contact_misplaced", p.contact_misplaced),
      ("penalties.contact_header_footer", p.contact_header_footer),
      ("penalties.date_placeholders", p.date_placeholders),
      ("penalties.no_valid_dates", p.no_valid_dates),
      ("penalties.experienced_short", p.experienced_short),
      ("penalties.no_name", p.no_name),
      ("penalties.no_summary", p.no_summary),
      ("penalties.bullets_very_few", p.bullets_very_few),
      ("penalties.bullets_few", p.bullets_few),
      ("penalties.bullets_some", p.bullets_some),
      ("penalties.experience_bullets_very_few", p.experience_bullets_very_few),
      ("penalties.experience_bullets_few", p.experience_bullets_few),
      ("penalties.few_metrics", p.few_metrics),
      ("overrides.trust_threshold", o.trust_threshold),
      ("overrides.scanned_cap", o.scanned_cap),
      ("overrides.placeholder_format", o.placeholder_format),
      ("overrides.no_dates_format", o.no_dates_format),
      ("overrides.no_name_format", o.no_name_format),
      ("overrides.no_summary_format", o.no_summary_format),
      ("overrides.bullets_content_severe", o.bullets_content_severe),
      ("overrides.bullets_content_moderate", o.bullets_content_moderate),
      ("overrides.bullets_content_mild", o.bullets_content_mild),
      ("overrides.no_metrics_content", o.no_metrics_content),
      ("overrides.tables_format", o.tables_format),
      ("overrides.multi_column_format", o.multi_column_format),
      ("overrides.thin_content_cap", o.thin_content_cap),
      ("overrides.thin_content_extra", o.thin_content_extra),
      ("scoring.thin_overall_cap", s.thin_overall_cap),
      ("scoring.floor_below", s.floor_below),
      ("scoring.floor_score", s.floor_score),
      ("scoring.weak_content_below", s.weak_content_below),
      ("scoring.weak_content_penalty", s.weak_content_penalty),
      ("scoring.strong_format_above", s.strong_format_above),
      ("scoring.format_content_mismatch_cap", s.format_content_mismatch_cap),
      ("scoring.critical_score_below", s.critical_score_below),
      ("scoring.unavailable_bonus", s.unavailable_bonus),
      ("scoring.contact_top", s.contact_top),
      ("scoring.contact_header_footer", s.contact_header_footer),
      ("scoring.contact_misplaced", s.contact_misplaced),
      ("scoring.contact_partial_penalty", s.contact_partial_penalty),
    ]
  }
}

/// Points subtracted from the parseability baseline per finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Penalties {
  pub scanned_image: i32,
  pub tables: i32,
  pub multi_column: i32,
  pub too_short: i32,
  pub too_long: i32,
  pub contact_missing: i32,
  pub contact_misplaced: i32,
  pub contact_header_footer: i32,
  pub date_placeholders: i32,
  pub no_valid_dates: i32,
  /// Extra penalty when an experienced candidate submits a short resume.
  pub experienced_short: i32,
  pub no_name: i32,
  pub no_summary: i32,
  /// Fewer than `bullets_very_few_below` bullets in total.
  pub bullets_very_few: i32,
  /// Fewer than `bullets_few_below` bullets in total.
  pub bullets_few: i32,
  /// Fewer than `bullets_optimal_total` bullets in total.
  pub bullets_some: i32,
  /// Experience section holds fewer than half the optimal bullet count.
  pub experience_bullets_very_few: i32,
  /// Experience section holds fewer than the optimal bullet count.
  pub experience_bullets_few: i32,
  pub few_metrics: i32,
}

impl Default for Penalties {
  fn default() -> Self {
    Self {
      scanned_image: 30,
      tables: 30,
      multi_column: 25,
      too_short: 15,
      too_long: 10,
      contact_missing: 25,
      contact_misplaced: 15,
      contact_header_footer: 5,
      date_placeholders: 20,
      no_valid_dates: 25,
      experienced_short: 10,
      no_name: 20,
      no_summary: 10,
      bullets_very_few: 20,
      bullets_few: 15,
      bullets_some: 10,
      experience_bullets_very_few: 10,
      experience_bullets_few: 5,
      few_metrics: 15,
    }
  }
}

/// Detector thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionThresholds {
  // -- extractability
  pub scanned_multi_page_min_chars: usize,
  pub scanned_min_chars: usize,

  // -- tables
  pub table_min_separators: usize,
  pub table_min_cells: usize,
  pub table_min_lines: usize,

  // -- columns
  pub column_scan_lines: usize,
  pub column_short_line: usize,
  pub column_long_line: usize,
  pub column_gap_spaces: usize,
  pub column_length_jump: usize,
  pub column_min_patterns: usize,
  pub column_high_patterns: usize,

  // -- length
  pub optimal_min_words: usize,
  pub optimal_max_words: usize,
  pub optimal_min_pages: u32,
  pub optimal_max_pages: u32,
  /// Used to estimate pages when the extractor could not report them.
  pub words_per_page: usize,

  // -- contact
  pub contact_window_chars: usize,
  pub contact_window_lines: usize,

  // -- dates
  pub min_valid_dates: usize,

  // -- experience
  pub experienced_min_years: u32,
  pub senior_keyword_count: usize,
  pub senior_years: u32,
  pub mid_keyword_count: usize,
  pub mid_years: u32,

  // -- name
  pub name_window_chars: usize,
  pub name_window_lines: usize,
  pub name_loose_window_chars: usize,

  // -- summary
  pub summary_window_chars: usize,
  pub summary_min_words: usize,

  // -- bullets
  pub bullet_min_content_chars: usize,
  pub bullet_lookahead_lines: usize,
  /// Loose-prefix fallback runs only while the total stays below this.
  pub bullet_fallback_below: usize,
  pub bullet_loose_prefix_chars: usize,
  pub implicit_min_chars: usize,
  pub implicit_max_chars: usize,
  /// Implicit action-verb fallback runs only while experience bullets stay below this.
  pub implicit_experience_below: usize,
  pub bullets_optimal_total: usize,
  pub bullets_optimal_experience: usize,
  pub bullets_very_few_below: usize,
  pub bullets_few_below: usize,

  // -- metrics
  pub metrics_optimal: usize,
}

impl Default for DetectionThresholds {
  fn default() -> Self {
    Self {
      scanned_multi_page_min_chars: 50,
      scanned_min_chars: 20,
      table_min_separators: 3,
      table_min_cells: 3,
      table_min_lines: 3,
      column_scan_lines: 50,
      column_short_line: 30,
      column_long_line: 80,
      column_gap_spaces: 10,
      column_length_jump: 60,
      column_min_patterns: 10,
      column_high_patterns: 20,
      optimal_min_words: 400,
      optimal_max_words: 800,
      optimal_min_pages: 1,
      optimal_max_pages: 2,
      words_per_page: 400,
      contact_window_chars: 300,
      contact_window_lines: 10,
      min_valid_dates: 2,
      experienced_min_years: 3,
      senior_keyword_count: 3,
      senior_years: 5,
      mid_keyword_count: 2,
      mid_years: 3,
      name_window_chars: 200,
      name_window_lines: 5,
      name_loose_window_chars: 100,
      summary_window_chars: 300,
      summary_min_words: 20,
      bullet_min_content_chars: 10,
      bullet_lookahead_lines: 3,
      bullet_fallback_below: 5,
      bullet_loose_prefix_chars: 5,
      implicit_min_chars: 20,
      implicit_max_chars: 300,
      implicit_experience_below: 5,
      bullets_optimal_total: 12,
      bullets_optimal_experience: 8,
      bullets_very_few_below: 5,
      bullets_few_below: 8,
      metrics_optimal: 3,
    }
  }
}

/// Hard-check overrides applied to the assessment's sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideRules {
  /// Both scores above this and no critical issue: trust the assessment.
  pub trust_threshold: i32,
  pub scanned_cap: i32,
  pub placeholder_format: i32,
  pub no_dates_format: i32,
  pub no_name_format: i32,
  pub no_summary_format: i32,
  pub bullets_content_severe: i32,
  pub bullets_content_moderate: i32,
  pub bullets_content_mild: i32,
  pub no_metrics_content: i32,
  pub tables_format: i32,
  pub multi_column_format: i32,
  pub contact_missing_factor: f64,
  pub long_document_pages: u32,
  pub long_document_content_factor: f64,
  pub thin_word_count: usize,
  pub thin_achievements: usize,
  pub thin_content_cap: i32,
  pub thin_content_extra: i32,
}

impl Default for OverrideRules {
  fn default() -> Self {
    Self {
      trust_threshold: 70,
      scanned_cap: 20,
      placeholder_format: 25,
      no_dates_format: 30,
      no_name_format: 20,
      no_summary_format: 10,
      bullets_content_severe: 25,
      bullets_content_moderate: 20,
      bullets_content_mild: 15,
      no_metrics_content: 20,
      tables_format: 20,
      multi_column_format: 15,
      contact_missing_factor: 0.3,
      long_document_pages: 2,
      long_document_content_factor: 0.8,
      thin_word_count: 400,
      thin_achievements: 3,
      thin_content_cap: 35,
      thin_content_extra: 15,
    }
  }
}

/// Category weights for the final weighted average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
  pub parseability: f64,
  pub format: f64,
  pub keyword: f64,
  pub contact: f64,
  pub content: f64,
}

impl Default for CategoryWeights {
  fn default() -> Self {
    Self {
      parseability: 0.25,
      format: 0.25,
      keyword: 0.25,
      contact: 0.10,
      content: 0.15,
    }
  }
}

/// Overall-score combination, calibration and categorization rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
  pub weights: CategoryWeights,
  /// Share of the assessment's own overall score when it is trusted.
  pub trusted_assessment_share: f64,
  pub thin_overall_cap: i32,
  pub floor_below: i32,
  pub floor_score: i32,
  pub calibration_clean: f64,
  pub calibration_one_critical: f64,
  pub calibration_many_critical: f64,
  pub weak_content_below: i32,
  pub weak_content_penalty: i32,
  pub strong_format_above: i32,
  pub format_content_mismatch_cap: i32,
  /// Overall/format/contact below this keeps issues critical.
  pub critical_score_below: i32,
  /// Phrases that keep an issue critical regardless of scores (case-insensitive).
  pub hard_failure_phrases: Vec<String>,
  /// Added to the parseability score when no assessment is available.
  pub unavailable_bonus: i32,
  pub contact_top: i32,
  pub contact_header_footer: i32,
  pub contact_misplaced: i32,
  /// Subtracted when only one of email/phone was found.
  pub contact_partial_penalty: i32,
}

impl Default for ScoringRules {
  fn default() -> Self {
    Self {
      weights: CategoryWeights::default(),
      trusted_assessment_share: 0.5,
      thin_overall_cap: 40,
      floor_below: 50,
      floor_score: 52,
      calibration_clean: 0.92,
      calibration_one_critical: 0.90,
      calibration_many_critical: 0.88,
      weak_content_below: 40,
      weak_content_penalty: 10,
      strong_format_above: 70,
      format_content_mismatch_cap: 50,
      critical_score_below: 30,
      hard_failure_phrases: vec![
        "unparseable".to_string(),
        "no contact".to_string(),
        "scanned image".to_string(),
      ],
      unavailable_bonus: 20,
      contact_top: 100,
      contact_header_footer: 80,
      contact_misplaced: 50,
      contact_partial_penalty: 20,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_validate() {
    assert!(Config::default().validate().is_ok());
  }

  #[test]
  fn weights_must_sum_to_one() {
    let mut config = Config::default();
    config.scoring.weights.content = 0.5;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("scoring.weights"));
  }

  #[test]
  fn partial_json_override_keeps_other_defaults() {
    let config: Config =
      serde_json::from_str(r#"{"penalties": {"tables": 12}, "baseline_score": 85}"#).unwrap();
    assert_eq!(config.penalties.tables, 12);
    assert_eq!(config.baseline_score, 85);
    assert_eq!(config.penalties.multi_column, 25);
    assert_eq!(config.detection.optimal_min_words, 400);
  }

  #[test]
  fn oversized_penalty_rejected() {
    let config: Config =
      serde_json::from_str(r#"{"penalties": {"no_name": 2147483647}}"#).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("penalties.no_name"));
  }

  #[test]
  fn negative_override_delta_rejected() {
    let mut config = Config::default();
    config.overrides.tables_format = -40;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("overrides.tables_format"));
  }

  #[test]
  fn out_of_range_factor_rejected() {
    let mut config = Config::default();
    config.overrides.contact_missing_factor = 1.5;
    assert!(config.validate().is_err());
  }
}
