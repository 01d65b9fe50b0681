//! Parseability aggregator: runs every detector and turns findings into a
//! penalty-scored report with critical issues and warnings.

use serde::Serialize;
use tracing::debug;

use crate::config::{Config, Penalties};
use crate::pages::{self, PageCounter};
use crate::signals::bullets::BulletShortfall;
use crate::signals::{self, ContactPlacement, LengthVerdict, SignalDetails};
use crate::types::{Confidence, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Critical,
  Warning,
}

/// One penalized observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
  pub severity: Severity,
  pub penalty: i32,
  pub message: String,
}

impl Finding {
  fn critical(penalty: i32, message: impl Into<String>) -> Self {
    Self {
      severity: Severity::Critical,
      penalty,
      message: message.into(),
    }
  }

  fn warning(penalty: i32, message: impl Into<String>) -> Self {
    Self {
      severity: Severity::Warning,
      penalty,
      message: message.into(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseabilityReport {
  pub score: u8,
  pub critical_issues: Vec<String>,
  pub warnings: Vec<String>,
  pub confidence: Confidence,
  pub details: SignalDetails,
}

impl ParseabilityReport {
  pub fn has_critical_issues(&self) -> bool {
    !self.critical_issues.is_empty()
  }
}

/// Run every detector over the document and score the result.
pub fn analyze(doc: &Document<'_>, counter: &dyn PageCounter, config: &Config) -> ParseabilityReport {
  let page_count = pages::resolve(doc, counter);
  let details = signals::detect_all(doc, page_count, &config.detection);
  report_from_details(details, config)
}

/// Score an already-computed set of signals.
pub fn report_from_details(details: SignalDetails, config: &Config) -> ParseabilityReport {
  let found = findings(&details, config);

  let penalty = found.iter().fold(0i32, |acc, f| acc.saturating_add(f.penalty));
  let score = config.baseline_score.saturating_sub(penalty).clamp(0, 100) as u8;

  let (critical, warning): (Vec<&Finding>, Vec<&Finding>) =
    found.iter().partition(|f| f.severity == Severity::Critical);

  debug!(
    score,
    penalty,
    critical = critical.len(),
    warnings = warning.len(),
    "parseability scored"
  );

  ParseabilityReport {
    score,
    critical_issues: critical.iter().map(|f| f.message.clone()).collect(),
    warnings: warning.iter().map(|f| f.message.clone()).collect(),
    confidence: Confidence::from_finding_count(found.len()),
    details,
  }
}

/// Every finding the signals support, in detector order.
pub fn findings(d: &SignalDetails, config: &Config) -> Vec<Finding> {
  let p: &Penalties = &config.penalties;
  let t = &config.detection;
  let mut out = Vec::new();

  if d.extractability.is_scanned {
    out.push(Finding::critical(
      p.scanned_image,
      "Document appears to be a scanned image - ATS systems cannot read text from images",
    ));
  }

  if d.tables.has_tables {
    out.push(Finding::warning(
      p.tables,
      format!(
        "Tables detected ({} table-like lines) - ATS systems often scramble table content",
        d.tables.table_lines
      ),
    ));
  }

  if d.columns.is_multi_column {
    out.push(Finding::warning(
      p.multi_column,
      "Multi-column layout detected - ATS may read columns out of order",
    ));
  }

  match d.length.verdict {
    LengthVerdict::TooShort => out.push(Finding::warning(
      p.too_short,
      format!(
        "Resume is too short ({} words) - aim for {}-{} words",
        d.length.word_count, t.optimal_min_words, t.optimal_max_words
      ),
    )),
    LengthVerdict::TooLong => out.push(Finding::warning(
      p.too_long,
      format!(
        "Resume is too long ({} words, {} pages) - aim for {}-{} words on {}-{} pages",
        d.length.word_count,
        d.length.page_count,
        t.optimal_min_words,
        t.optimal_max_words,
        t.optimal_min_pages,
        t.optimal_max_pages
      ),
    )),
    LengthVerdict::Optimal => {}
  }

  match d.contact.placement {
    ContactPlacement::Missing => out.push(Finding::critical(
      p.contact_missing,
      "No contact information found - add your email and phone number at the top",
    )),
    ContactPlacement::Misplaced => out.push(Finding::warning(
      p.contact_misplaced,
      "Contact information is not at the top of the resume - ATS expects it in the first lines",
    )),
    ContactPlacement::HeaderFooter => out.push(Finding::warning(
      p.contact_header_footer,
      "Contact information may be in a header or footer - some ATS skip those regions",
    )),
    ContactPlacement::Top => {}
  }

  if d.dates.has_placeholders {
    out.push(Finding::critical(
      p.date_placeholders,
      format!(
        "Placeholder dates found ({}) - replace them with real dates",
        d.dates.placeholders.join(", ")
      ),
    ));
  }
  if !d.dates.has_valid_dates {
    out.push(Finding::critical(
      p.no_valid_dates,
      "No valid employment dates found - include start and end dates for each role",
    ));
  }

  if d.experience.is_experienced && d.length.verdict == LengthVerdict::TooShort {
    out.push(Finding::warning(
      p.experienced_short,
      format!(
        "Resume is short for about {} years of experience - expand on your achievements",
        d.experience.years
      ),
    ));
  }

  if !d.name.has_name {
    out.push(Finding::critical(
      p.no_name,
      "No name detected at the top of the resume",
    ));
  }

  if !d.summary.has_summary {
    out.push(Finding::warning(
      p.no_summary,
      "No professional summary found - add a short summary of 2-3 sentences",
    ));
  }

  let bullet_penalty = bullet_penalty(d, config);
  if bullet_penalty > 0 {
    out.push(Finding::warning(
      bullet_penalty,
      format!(
        "Only {} bullet points found ({} under experience) - aim for {}+ with {}+ under experience",
        d.bullets.total,
        d.bullets.by_section.experience,
        t.bullets_optimal_total,
        t.bullets_optimal_experience
      ),
    ));
  }

  if !d.metrics.is_optimal {
    let message = if d.metrics.count == 0 {
      "No quantifiable achievements found - add numbers, percentages, or dollar amounts".to_string()
    } else {
      format!(
        "Only {} quantifiable achievement(s) found - aim for at least {}",
        d.metrics.count, t.metrics_optimal
      )
    };
    out.push(Finding::warning(p.few_metrics, message));
  }

  out
}

/// Total-count tier plus an experience-section top-up.
fn bullet_penalty(d: &SignalDetails, config: &Config) -> i32 {
  let p = &config.penalties;
  let t = &config.detection;
  let base = match d.bullets.shortfall {
    BulletShortfall::Severe => p.bullets_very_few,
    BulletShortfall::Moderate => p.bullets_few,
    BulletShortfall::Mild => p.bullets_some,
    BulletShortfall::None => 0,
  };
  let experience = d.bullets.by_section.experience;
  let extra = if experience < t.bullets_optimal_experience / 2 {
    p.experience_bullets_very_few
  } else if experience < t.bullets_optimal_experience {
    p.experience_bullets_few
  } else {
    0
  };
  base.saturating_add(extra)
}
