//! Section-aware bullet-point census.
//!
//! Counting runs as an ordered pipeline of strategies. Each strategy proposes
//! claims over the whole document and is gated on the running totals, so the
//! looser heuristics only fire when the strict ones found too little. Claims
//! are folded into a single state that tracks per-section counts and which
//! lines are already spoken for.

use serde::Serialize;
use std::collections::BTreeSet;

use super::char_len;
use super::sections::{classify_header, section_map, Section};
use crate::config::DetectionThresholds;

/// Glyphs recognized as bullets. U+F0B7 and U+F0A7 are the Symbol/Wingdings
/// private-use bullets that PDF extraction emits for Word lists.
pub const BULLET_GLYPHS: &[char] = &[
  '•', '●', '○', '◦', '▪', '■', '□', '➢', '➤', '►', '▶', '✓', '✔', '♦', '◆', '·', '‣', '⁃', '-',
  '*', '–', '—', '\u{f0b7}', '\u{f0a7}',
];

/// Verbs that open an achievement line even without a glyph.
pub const ACTION_VERBS: &[&str] = &[
  "accelerated", "achieved", "administered", "analyzed", "architected", "automated", "boosted",
  "built", "collaborated", "conducted", "consolidated", "contributed", "coordinated", "created",
  "cultivated", "cut", "decreased", "defined", "delivered", "deployed", "designed", "developed",
  "directed", "drove", "engineered", "enhanced", "established", "expanded", "facilitated",
  "generated", "grew", "headed", "identified", "implemented", "improved", "increased",
  "initiated", "integrated", "introduced", "launched", "led", "maintained", "managed",
  "mentored", "migrated", "modernized", "monitored", "negotiated", "optimized", "orchestrated",
  "organized", "oversaw", "owned", "partnered", "pioneered", "planned", "prepared", "presented",
  "produced", "programmed", "redesigned", "reduced", "refactored", "researched", "resolved",
  "revamped", "saved", "scaled", "secured", "shipped", "simplified", "spearheaded",
  "standardized", "streamlined", "supervised", "supported", "tested", "trained", "transformed",
  "troubleshot", "upgraded", "wrote",
];

const JOB_TITLE_NOUNS: &str = r"engineer|developer|manager|analyst|designer|consultant|intern|director|specialist|coordinator|architect|administrator|scientist|associate|assistant|officer|lead";
const TITLE_MAX_WORDS: usize = 6;
/// Lowercase words allowed inside an otherwise title-cased role line.
const TITLE_CONNECTORS: &[&str] = &["of", "and", "at", "for", "the", "in", "to", "with"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionCounts {
  pub experience: usize,
  pub projects: usize,
  pub other: usize,
}

impl SectionCounts {
  pub fn total(&self) -> usize {
    self.experience + self.projects + self.other
  }

  fn add(&mut self, section: Section) {
    match section {
      Section::Experience => self.experience += 1,
      Section::Projects => self.projects += 1,
      Section::Other => self.other += 1,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletStrategy {
  /// A glyph alone on its line, content on one of the next lines.
  OrphanGlyph,
  /// Glyph at the start of a line with content inline.
  InlineGlyph,
  /// Glyph anywhere in the first few characters, or a numbered item.
  LoosePrefix,
  /// Experience lines opening with an action verb.
  ImplicitActionVerb,
}

/// How far the census falls short of the optimal total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletShortfall {
  None,
  Mild,
  Moderate,
  Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletSignal {
  pub total: usize,
  pub by_section: SectionCounts,
  pub experience_section_found: bool,
  /// Strategies that contributed at least one bullet, in pipeline order.
  pub strategies: Vec<BulletStrategy>,
  pub shortfall: BulletShortfall,
  pub is_optimal: bool,
  pub message: String,
}

/// Lines plus their owning sections, shared by every strategy.
pub struct LineView<'a> {
  lines: Vec<&'a str>,
  sections: Vec<Section>,
}

impl<'a> LineView<'a> {
  pub fn new(text: &'a str) -> Self {
    let lines: Vec<&str> = text.lines().collect();
    let sections = section_map(&lines);
    Self { lines, sections }
  }

  fn has_experience_section(&self) -> bool {
    self
      .lines
      .iter()
      .any(|l| classify_header(l) == Some(Section::Experience))
  }
}

/// A proposed bullet: the content line plus any glyph-only line it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
  pub line: usize,
  pub consumed: Option<usize>,
}

#[derive(Debug, Default)]
struct CensusState {
  counts: SectionCounts,
  processed: BTreeSet<usize>,
  contributed: Vec<BulletStrategy>,
}

impl CensusState {
  /// Fold one strategy's claims into the state; already-processed lines are skipped.
  fn absorb(mut self, strategy: BulletStrategy, claims: Vec<Claim>, view: &LineView<'_>) -> Self {
    let before = self.counts.total();
    for claim in claims {
      if self.processed.contains(&claim.line) {
        continue;
      }
      self.processed.insert(claim.line);
      if let Some(glyph_line) = claim.consumed {
        self.processed.insert(glyph_line);
      }
      self.counts.add(view.sections[claim.line]);
    }
    if self.counts.total() > before {
      self.contributed.push(strategy);
    }
    self
  }
}

const PIPELINE: [BulletStrategy; 4] = [
  BulletStrategy::OrphanGlyph,
  BulletStrategy::InlineGlyph,
  BulletStrategy::LoosePrefix,
  BulletStrategy::ImplicitActionVerb,
];

impl BulletStrategy {
  fn should_run(self, counts: &SectionCounts, experience_found: bool, t: &DetectionThresholds) -> bool {
    match self {
      Self::OrphanGlyph | Self::InlineGlyph => true,
      Self::LoosePrefix => counts.total() < t.bullet_fallback_below,
      Self::ImplicitActionVerb => {
        experience_found && counts.experience < t.implicit_experience_below
      }
    }
  }

  pub fn find(self, view: &LineView<'_>, t: &DetectionThresholds) -> Vec<Claim> {
    match self {
      Self::OrphanGlyph => find_orphan_glyphs(view, t),
      Self::InlineGlyph => find_inline_glyphs(view, t),
      Self::LoosePrefix => find_loose_prefixes(view, t),
      Self::ImplicitActionVerb => find_action_verb_lines(view, t),
    }
  }
}

fn is_glyph_only(line: &str) -> bool {
  let trimmed = line.trim();
  !trimmed.is_empty() && char_len(trimmed) <= 2 && trimmed.chars().all(|c| BULLET_GLYPHS.contains(&c))
}

fn find_orphan_glyphs(view: &LineView<'_>, t: &DetectionThresholds) -> Vec<Claim> {
  let mut claims = Vec::new();
  for (i, line) in view.lines.iter().enumerate() {
    if !is_glyph_only(line) {
      continue;
    }
    let window = (i + 1)..=(i + t.bullet_lookahead_lines).min(view.lines.len().saturating_sub(1));
    for j in window {
      let candidate = view.lines[j];
      if is_glyph_only(candidate) {
        break;
      }
      if char_len(candidate.trim()) >= t.bullet_min_content_chars {
        claims.push(Claim {
          line: j,
          consumed: Some(i),
        });
        break;
      }
    }
  }
  claims
}

/// Content after a leading glyph, if the line starts with one.
fn after_leading_glyph(line: &str) -> Option<&str> {
  let trimmed = line.trim_start();
  let first = trimmed.chars().next()?;
  if !BULLET_GLYPHS.contains(&first) {
    return None;
  }
  let rest = &trimmed[first.len_utf8()..];
  // ASCII markers need a following space so "-5%" or "*Note" are not bullets.
  if matches!(first, '-' | '*') && !rest.starts_with(char::is_whitespace) {
    return None;
  }
  Some(rest.trim())
}

fn find_inline_glyphs(view: &LineView<'_>, t: &DetectionThresholds) -> Vec<Claim> {
  view
    .lines
    .iter()
    .enumerate()
    .filter_map(|(i, line)| {
      let content = after_leading_glyph(line)?;
      (char_len(content) >= t.bullet_min_content_chars).then_some(Claim {
        line: i,
        consumed: None,
      })
    })
    .collect()
}

fn find_loose_prefixes(view: &LineView<'_>, t: &DetectionThresholds) -> Vec<Claim> {
  let numbered = regex!(r"^\s*\d{1,2}[.)-]\s+\S");
  view
    .lines
    .iter()
    .enumerate()
    .filter(|(_, line)| {
      if char_len(line.trim()) < t.bullet_min_content_chars || is_glyph_only(line) {
        return false;
      }
      let glyph_near_start = line
        .chars()
        .take(t.bullet_loose_prefix_chars)
        .any(|c| BULLET_GLYPHS.contains(&c));
      glyph_near_start || numbered.is_match(line)
    })
    .map(|(i, _)| Claim {
      line: i,
      consumed: None,
    })
    .collect()
}

fn first_word_lower(line: &str) -> String {
  line
    .split_whitespace()
    .next()
    .unwrap_or("")
    .trim_matches(|c: char| !c.is_alphabetic())
    .to_lowercase()
}

fn is_date_line(line: &str) -> bool {
  let range = regex!(
    r"(?i)\b(?:19|20)\d{2}\s*(?:-|–|—|to)\s*(?:(?:19|20)\d{2}|present|current|now)\b"
  );
  let leading_month = regex!(
    r"(?i)^\s*(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(?:19|20)\d{2}\b"
  );
  range.is_match(line) || leading_month.is_match(line)
}

fn is_title_word(word: &str) -> bool {
  match word.chars().find(|c| c.is_alphabetic()) {
    Some(c) if c.is_lowercase() => {
      let bare = word.trim_matches(|c: char| !c.is_alphabetic());
      TITLE_CONNECTORS.contains(&bare)
    }
    _ => true,
  }
}

/// Short title-cased line naming a role, e.g. "Managed Services Engineer".
/// Achievement lines such as "Built dashboards for analysts" are not titles.
fn is_job_title_line(line: &str) -> bool {
  let title = regex!(&format!(r"(?i)\b(?:{})s?\b", JOB_TITLE_NOUNS));
  let words: Vec<&str> = line.split_whitespace().collect();
  words.len() <= TITLE_MAX_WORDS
    && title.is_match(line)
    && words.iter().all(|w| is_title_word(w))
}

fn find_action_verb_lines(view: &LineView<'_>, t: &DetectionThresholds) -> Vec<Claim> {
  view
    .lines
    .iter()
    .enumerate()
    .filter(|(i, line)| {
      if view.sections[*i] != Section::Experience || classify_header(line).is_some() {
        return false;
      }
      let len = char_len(line.trim());
      if len < t.implicit_min_chars || len > t.implicit_max_chars {
        return false;
      }
      ACTION_VERBS.contains(&first_word_lower(line).as_str())
        && !is_date_line(line)
        && !is_job_title_line(line)
    })
    .map(|(i, _)| Claim {
      line: i,
      consumed: None,
    })
    .collect()
}

fn shortfall(total: usize, t: &DetectionThresholds) -> BulletShortfall {
  if total < t.bullets_very_few_below {
    BulletShortfall::Severe
  } else if total < t.bullets_few_below {
    BulletShortfall::Moderate
  } else if total < t.bullets_optimal_total {
    BulletShortfall::Mild
  } else {
    BulletShortfall::None
  }
}

pub fn detect(text: &str, t: &DetectionThresholds) -> BulletSignal {
  let view = LineView::new(text);
  let experience_section_found = view.has_experience_section();

  let state = PIPELINE
    .iter()
    .fold(CensusState::default(), |state, &strategy| {
      if !strategy.should_run(&state.counts, experience_section_found, t) {
        return state;
      }
      let claims = strategy.find(&view, t);
      state.absorb(strategy, claims, &view)
    });

  let counts = state.counts;
  let total = counts.total();
  let is_optimal =
    total >= t.bullets_optimal_total && counts.experience >= t.bullets_optimal_experience;

  let message = format!(
    "{} bullet points ({} experience, {} projects, {} other)",
    total, counts.experience, counts.projects, counts.other
  );

  BulletSignal {
    total,
    by_section: counts,
    experience_section_found,
    strategies: state.contributed,
    shortfall: shortfall(total, t),
    is_optimal,
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
  fn orphan_glyph_claims_following_content() {
    let view = LineView::new("•\n\nBuilt a billing service in Rust\n•\nShort\nMigrated CI to GitHub Actions");
    let claims = BulletStrategy::OrphanGlyph.find(&view, &t());
    assert_eq!(
      claims,
      vec![
        Claim { line: 2, consumed: Some(0) },
        Claim { line: 5, consumed: Some(3) },
      ]
    );
  }

  #[test]
  fn pdf_private_use_glyph_counts() {
    let sig = detect("Experience\n\u{f0b7} Reduced p99 latency by 40 percent", &t());
    assert_eq!(sig.total, 1);
    assert_eq!(sig.by_section.experience, 1);
  }

  #[test]
  fn inline_requires_enough_content() {
    let view = LineView::new("• Rust\n• Designed the ingestion pipeline\n-5% churn quarter over quarter");
    let claims = BulletStrategy::InlineGlyph.find(&view, &t());
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].line, 1);
  }

  #[test]
  fn loose_fallback_only_when_few_bullets() {
    let mut text = String::from("Experience\n");
    for i in 1..=3 {
      text.push_str(&format!("{}. Delivered project number {}\n", i, i));
    }
    let sig = detect(&text, &t());
    assert_eq!(sig.total, 3);
    assert!(sig.strategies.contains(&BulletStrategy::LoosePrefix));

    let mut many = String::from("Experience\n");
    for i in 0..6 {
      many.push_str(&format!("• Delivered project number {}\n", i));
    }
    many.push_str("1. Numbered line that would count loosely\n");
    let sig = detect(&many, &t());
    assert_eq!(sig.total, 6);
    assert!(!sig.strategies.contains(&BulletStrategy::LoosePrefix));
  }

  #[test]
  fn implicit_action_verbs_in_experience_only() {
    let text = "\
Summary
Led nothing here because this is the summary section text
Experience
Lead Engineer at Acme
Jan 2019 - Present
Led the migration of 40 services to Kubernetes clusters
Reduced infrastructure spend by a third through rightsizing
Built an internal deployment dashboard used company wide
Projects
Built a toy compiler for a subset of Scheme";
    let sig = detect(text, &t());
    assert_eq!(sig.by_section.experience, 3);
    assert_eq!(sig.total, 3);
    assert_eq!(sig.strategies, vec![BulletStrategy::ImplicitActionVerb]);
  }

  #[test]
  fn action_verbs_outside_experience_are_ignored() {
    let text = "\
Projects
Built a toy compiler for a subset of Scheme
Designed a static site generator for the blog
Wrote a rate limiter library for web services";
    let sig = detect(text, &t());
    assert!(!sig.experience_section_found);
    assert_eq!(sig.total, 0);
    assert!(sig.strategies.is_empty());

    let headerless = "Built a toy compiler for a subset of Scheme\nWrote a rate limiter library for web services";
    let sig = detect(headerless, &t());
    assert_eq!(sig.total, 0);
    assert!(!sig.strategies.contains(&BulletStrategy::ImplicitActionVerb));
  }

  #[test]
  fn implicit_pass_skipped_once_experience_has_enough_glyphs() {
    let glyphs = "\
Experience
\u{2022} Cut card authorization latency across three regions
\u{2022} Saved money by consolidating two logging vendors
\u{2022} Designed an idempotent retry layer for settlements
\u{2022} Moved nightly reconciliation onto a streaming pipeline
\u{2022} Wrote the on-call handbook used by every backend team
";
    let verbs = "\
Led the migration of 40 services to Kubernetes clusters
Reduced infrastructure spend by a third through rightsizing";

    let sig = detect(&format!("{}{}", glyphs, verbs), &t());
    assert_eq!(sig.by_section.experience, 5);
    assert_eq!(sig.total, 5);
    assert_eq!(sig.strategies, vec![BulletStrategy::InlineGlyph]);

    // One glyph bullet fewer and the implicit pass tops the count up.
    let four: String = glyphs.lines().take(5).map(|l| format!("{}\n", l)).collect();
    let sig = detect(&format!("{}{}", four, verbs), &t());
    assert_eq!(sig.by_section.experience, 6);
    assert!(sig.strategies.contains(&BulletStrategy::ImplicitActionVerb));
  }

  #[test]
  fn achievement_naming_a_role_is_not_a_title() {
    assert!(is_job_title_line("Managed Services Engineer"));
    assert!(is_job_title_line("Director of Engineering, Acme"));
    assert!(!is_job_title_line("Built dashboards for finance analysts"));
    assert!(!is_job_title_line("Mentored two junior developers"));

    let text = "\
Experience
Managed Services Engineer
Built dashboards for finance analysts
Mentored two junior developers";
    let sig = detect(text, &t());
    assert_eq!(sig.by_section.experience, 2);
    assert_eq!(sig.strategies, vec![BulletStrategy::ImplicitActionVerb]);
  }

  #[test]
  fn optimal_needs_experience_bullets() {
    let mut text = String::from("Projects\n");
    for i in 0..12 {
      text.push_str(&format!("• Implemented feature number {}\n", i));
    }
    let sig = detect(&text, &t());
    assert_eq!(sig.total, 12);
    assert_eq!(sig.shortfall, BulletShortfall::None);
    assert!(!sig.is_optimal);
  }

  #[test]
  fn shortfall_tiers() {
    assert_eq!(shortfall(4, &t()), BulletShortfall::Severe);
    assert_eq!(shortfall(7, &t()), BulletShortfall::Moderate);
    assert_eq!(shortfall(11, &t()), BulletShortfall::Mild);
    assert_eq!(shortfall(12, &t()), BulletShortfall::None);
  }
}
