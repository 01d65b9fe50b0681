//! Score validator: merges the parseability report with the external
//! assessment, applies hard-check overrides where deterministic signals
//! contradict the assessment, computes the overall score and sorts every
//! issue into critical / warning / improvement.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::assessment::QualitativeAssessment;
use crate::config::{Config, OverrideRules, ScoringRules};
use crate::parseability::ParseabilityReport;
use crate::signals::bullets::BulletShortfall;
use crate::signals::{ContactPlacement, ContactSignal};
use crate::types::{CategoryScores, CombinedAnalysis, Confidence};

pub const UNAVAILABLE_MESSAGE: &str =
  "Detailed content review is unavailable right now. Scores are based on document structure only.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
  Format,
  Keyword,
  Contact,
  Content,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
  CapAt(i32),
  Subtract(i32),
  Scale(f64),
}

/// Which deterministic signal triggered an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideRule {
  ScannedImage,
  DatePlaceholders,
  NoValidDates,
  NoName,
  NoSummary,
  FewBullets,
  NoMetrics,
  Tables,
  MultiColumn,
  ContactMissing,
  LongWithCriticalIssues,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Override {
  pub rule: OverrideRule,
  pub category: Category,
  pub adjustment: Adjustment,
}

/// Working copy of the four assessment sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubScores {
  format: i32,
  keyword: i32,
  contact: i32,
  content: i32,
}

impl SubScores {
  fn from_assessment(a: &QualitativeAssessment) -> Self {
    Self {
      format: a.format.score as i32,
      keyword: a.keyword.score as i32,
      contact: a.contact.score as i32,
      content: a.content.score as i32,
    }
  }

  fn slot(&mut self, category: Category) -> &mut i32 {
    match category {
      Category::Format => &mut self.format,
      Category::Keyword => &mut self.keyword,
      Category::Contact => &mut self.contact,
      Category::Content => &mut self.content,
    }
  }

  fn apply(&mut self, o: &Override) {
    let slot = self.slot(o.category);
    let next = match o.adjustment {
      Adjustment::CapAt(cap) => (*slot).min(cap),
      Adjustment::Subtract(n) => slot.saturating_sub(n),
      Adjustment::Scale(f) => (*slot as f64 * f).round() as i32,
    };
    *slot = next.max(0);
  }
}

/// Every override the deterministic signals support, in application order.
pub fn hard_check_overrides(report: &ParseabilityReport, config: &Config) -> Vec<Override> {
  let d = &report.details;
  let r: &OverrideRules = &config.overrides;
  let mut out = Vec::new();
  let mut push = |rule, category, adjustment| {
    out.push(Override {
      rule,
      category,
      adjustment,
    })
  };

  if d.extractability.is_scanned {
    for category in [Category::Format, Category::Keyword, Category::Content] {
      push(OverrideRule::ScannedImage, category, Adjustment::CapAt(r.scanned_cap));
    }
  }
  if d.dates.has_placeholders {
    push(
      OverrideRule::DatePlaceholders,
      Category::Format,
      Adjustment::Subtract(r.placeholder_format),
    );
  }
  if !d.dates.has_valid_dates {
    push(
      OverrideRule::NoValidDates,
      Category::Format,
      Adjustment::Subtract(r.no_dates_format),
    );
  }
  if !d.name.has_name {
    push(OverrideRule::NoName, Category::Format, Adjustment::Subtract(r.no_name_format));
  }
  if !d.summary.has_summary {
    push(
      OverrideRule::NoSummary,
      Category::Format,
      Adjustment::Subtract(r.no_summary_format),
    );
  }
  let bullets = match d.bullets.shortfall {
    BulletShortfall::Severe => Some(r.bullets_content_severe),
    BulletShortfall::Moderate => Some(r.bullets_content_moderate),
    BulletShortfall::Mild => Some(r.bullets_content_mild),
    BulletShortfall::None => None,
  };
  if let Some(delta) = bullets {
    push(OverrideRule::FewBullets, Category::Content, Adjustment::Subtract(delta));
  }
  if d.metrics.count == 0 {
    push(
      OverrideRule::NoMetrics,
      Category::Content,
      Adjustment::Subtract(r.no_metrics_content),
    );
  }
  if d.tables.has_tables {
    push(OverrideRule::Tables, Category::Format, Adjustment::Subtract(r.tables_format));
  }
  if d.columns.is_multi_column {
    push(
      OverrideRule::MultiColumn,
      Category::Format,
      Adjustment::Subtract(r.multi_column_format),
    );
  }
  if d.contact.placement == ContactPlacement::Missing {
    push(
      OverrideRule::ContactMissing,
      Category::Contact,
      Adjustment::Scale(r.contact_missing_factor),
    );
  }
  if d.length.page_count > r.long_document_pages && report.has_critical_issues() {
    push(
      OverrideRule::LongWithCriticalIssues,
      Category::Content,
      Adjustment::Scale(r.long_document_content_factor),
    );
  }

  out
}

/// Both sides score well and nothing deterministic is critical.
fn assessment_trusted(report: &ParseabilityReport, a: &QualitativeAssessment, config: &Config) -> bool {
  let threshold = config.overrides.trust_threshold;
  !report.has_critical_issues()
    && report.score as i32 > threshold
    && a.overall_score as i32 > threshold
}

fn is_thin(report: &ParseabilityReport, a: &QualitativeAssessment, r: &OverrideRules) -> bool {
  report.details.length.word_count < r.thin_word_count
    && a.content.achievement_examples.len() < r.thin_achievements
}

/// Combine the report with the assessment, or degrade when there is none.
pub fn combine(
  report: &ParseabilityReport,
  assessment: Option<&QualitativeAssessment>,
  config: &Config,
) -> CombinedAnalysis {
  match assessment {
    Some(a) => with_assessment(report, a, config),
    None => without_assessment(report, config),
  }
}

fn without_assessment(report: &ParseabilityReport, config: &Config) -> CombinedAnalysis {
  let s = &config.scoring;
  warn!(score = report.score, "assessment unavailable; using parseability only");

  let overall = (report.score as i32).saturating_add(s.unavailable_bonus).clamp(0, 100);
  let mut seen = HashSet::new();

  CombinedAnalysis {
    overall_score: overall as u8,
    confidence: Confidence::Medium,
    scores: CategoryScores {
      parseability: report.score,
      format: 0,
      keyword: 0,
      contact: contact_from_signal(&report.details.contact, s),
      content: 0,
    },
    critical: unique(&report.critical_issues, &mut seen),
    warnings: unique(&report.warnings, &mut seen),
    improvements: Vec::new(),
    estimated_cost: 0.0,
    assessment_unavailable: true,
    unavailable_message: Some(UNAVAILABLE_MESSAGE.to_string()),
  }
}

/// Contact sub-score from placement alone.
fn contact_from_signal(c: &ContactSignal, s: &ScoringRules) -> u8 {
  let base = match c.placement {
    ContactPlacement::Top => s.contact_top,
    ContactPlacement::HeaderFooter => s.contact_header_footer,
    ContactPlacement::Misplaced => s.contact_misplaced,
    ContactPlacement::Missing => return 0,
  };
  let partial = if c.has_email && c.has_phone {
    0
  } else {
    s.contact_partial_penalty
  };
  base.saturating_sub(partial).clamp(0, 100) as u8
}

fn with_assessment(
  report: &ParseabilityReport,
  a: &QualitativeAssessment,
  config: &Config,
) -> CombinedAnalysis {
  let r = &config.overrides;
  let s = &config.scoring;
  let d = &report.details;
  let mut scores = SubScores::from_assessment(a);

  // Thin content: short and nothing quantifiable.
  if d.length.word_count < r.thin_word_count && d.metrics.count == 0 {
    scores.content = scores.content.min(r.thin_content_cap);
    if a.content.achievement_examples.len() < r.thin_achievements {
      scores.content = scores.content.saturating_sub(r.thin_content_extra).max(0);
    }
  }

  let trusted = assessment_trusted(report, a, config);
  let overrides: Vec<Override> = hard_check_overrides(report, config)
    .into_iter()
    .filter(|o| !trusted || o.rule == OverrideRule::ScannedImage)
    .collect();
  for o in &overrides {
    scores.apply(o);
  }
  debug!(
    trusted,
    applied = overrides.len(),
    format = scores.format,
    content = scores.content,
    "overrides applied"
  );

  let thin = is_thin(report, a, r);
  let critical_count = report.critical_issues.len();
  let overall = if trusted {
    let blended = (s.trusted_assessment_share * a.overall_score as f64
      + (1.0 - s.trusted_assessment_share) * report.score as f64)
      .round() as i32;
    if thin {
      blended.min(s.thin_overall_cap)
    } else {
      blended
    }
  } else {
    weighted_overall(report.score as i32, &scores, critical_count, thin, s)
  };
  let overall = overall.clamp(0, 100);

  let clamp = |v: i32| v.clamp(0, 100) as u8;
  let final_scores = CategoryScores {
    parseability: report.score,
    format: clamp(scores.format),
    keyword: clamp(scores.keyword),
    contact: clamp(scores.contact),
    content: clamp(scores.content),
  };

  let (critical, warnings, improvements) = categorize(report, a, overall, &final_scores, s);

  CombinedAnalysis {
    overall_score: overall as u8,
    confidence: report.confidence,
    scores: final_scores,
    critical,
    warnings,
    improvements,
    estimated_cost: a.estimated_cost,
    assessment_unavailable: false,
    unavailable_message: None,
  }
}

fn weighted_overall(
  parseability: i32,
  scores: &SubScores,
  critical_count: usize,
  thin: bool,
  s: &ScoringRules,
) -> i32 {
  let w = &s.weights;
  let mut overall = (w.parseability * parseability as f64
    + w.format * scores.format as f64
    + w.keyword * scores.keyword as f64
    + w.contact * scores.contact as f64
    + w.content * scores.content as f64)
    .round() as i32;

  if overall < s.floor_below && critical_count == 0 && !thin {
    overall = s.floor_score;
  }

  let calibration = match critical_count {
    0 => s.calibration_clean,
    1 => s.calibration_one_critical,
    _ => s.calibration_many_critical,
  };
  overall = (overall as f64 * calibration).round() as i32;

  if scores.content < s.weak_content_below {
    overall = overall.saturating_sub(s.weak_content_penalty);
  }
  if scores.format > s.strong_format_above && scores.content < s.weak_content_below {
    overall = overall.min(s.format_content_mismatch_cap);
  }
  if thin {
    overall = overall.min(s.thin_overall_cap);
  }
  overall
}

/// Split candidate issues into critical and demoted, then build the lists.
fn categorize(
  report: &ParseabilityReport,
  a: &QualitativeAssessment,
  overall: i32,
  scores: &CategoryScores,
  s: &ScoringRules,
) -> (Vec<String>, Vec<String>, Vec<String>) {
  let severe = overall < s.critical_score_below
    || (scores.format as i32) < s.critical_score_below
    || (scores.contact as i32) < s.critical_score_below;

  let mut seen = HashSet::new();
  let candidates: Vec<String> = report
    .critical_issues
    .iter()
    .chain(&a.red_flags)
    .chain(&a.required_fixes)
    .cloned()
    .collect();
  let candidates = unique(&candidates, &mut seen);

  let (critical, demoted): (Vec<String>, Vec<String>) = candidates
    .into_iter()
    .partition(|issue| severe || is_hard_failure(issue, s));

  let mut warnings = demoted;
  warnings.extend(unique(&report.warnings, &mut seen));
  let improvements = unique(&a.recommended_improvements, &mut seen);

  (critical, warnings, improvements)
}

fn is_hard_failure(issue: &str, s: &ScoringRules) -> bool {
  let lower = issue.to_lowercase();
  s.hard_failure_phrases
    .iter()
    .any(|phrase| lower.contains(&phrase.to_lowercase()))
}

/// Order-preserving, case-insensitive dedupe against a shared seen-set.
fn unique(items: &[String], seen: &mut HashSet<String>) -> Vec<String> {
  items
    .iter()
    .filter(|item| !item.trim().is_empty())
    .filter(|item| seen.insert(item.trim().to_lowercase()))
    .cloned()
    .collect()
}
