//! Section headers and per-line section ownership.

use serde::Serialize;

/// Section that owns a line, for bullet accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
  Experience,
  Projects,
  Other,
}

/// Words that start common resume section headers.
pub const HEADER_WORDS: &[&str] = &[
  "resume",
  "curriculum",
  "vitae",
  "cv",
  "summary",
  "objective",
  "profile",
  "about",
  "experience",
  "employment",
  "work",
  "career",
  "professional",
  "education",
  "skills",
  "technical",
  "projects",
  "certifications",
  "certificates",
  "awards",
  "honors",
  "publications",
  "languages",
  "interests",
  "volunteer",
  "references",
  "contact",
  "achievements",
  "accomplishments",
  "qualifications",
  "training",
  "activities",
];

const MAX_HEADER_CHARS: usize = 40;

/// Classify a line as a section header, if it is one.
pub fn classify_header(line: &str) -> Option<Section> {
  let trimmed = line.trim().trim_end_matches(':').trim();
  if trimmed.is_empty() || trimmed.chars().count() > MAX_HEADER_CHARS {
    return None;
  }
  let lower = trimmed.to_lowercase();

  let experience = regex!(
    r"^(?:(?:work|professional|relevant|industry)\s+)?(?:experience|employment(?:\s+history)?|work\s+history|career\s+history)$"
  );
  if experience.is_match(&lower) {
    return Some(Section::Experience);
  }

  let projects = regex!(r"^(?:(?:personal|key|selected|academic|side|notable)\s+)?projects?$");
  if projects.is_match(&lower) {
    return Some(Section::Projects);
  }

  let other = regex!(
    r"^(?:(?:professional|career|executive|technical|core|key)\s+)?(?:summary|objective|profile|education|skills|competencies|certifications?|awards|honors|publications|languages|interests|volunteer(?:ing)?(?:\s+experience)?|references|contact(?:\s+information)?|achievements|accomplishments|qualifications|training|activities|about\s+me)$"
  );
  if other.is_match(&lower) {
    return Some(Section::Other);
  }
  None
}

/// Owning section for every line: the nearest preceding header, folded
/// across the document. Header lines belong to the section they open.
pub fn section_map(lines: &[&str]) -> Vec<Section> {
  lines
    .iter()
    .scan(Section::Other, |current, line| {
      if let Some(section) = classify_header(line) {
        *current = section;
      }
      Some(*current)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn headers_classified() {
    assert_eq!(classify_header("PROFESSIONAL EXPERIENCE"), Some(Section::Experience));
    assert_eq!(classify_header("Work History:"), Some(Section::Experience));
    assert_eq!(classify_header("Selected Projects"), Some(Section::Projects));
    assert_eq!(classify_header("Education"), Some(Section::Other));
    assert_eq!(classify_header("Volunteer Experience"), Some(Section::Other));
    assert_eq!(classify_header("Led a team of five engineers"), None);
  }

  #[test]
  fn section_map_follows_nearest_header() {
    let lines = ["Jane Doe", "Experience", "• a", "Projects", "• b", "Skills", "Rust"];
    let map = section_map(&lines);
    assert_eq!(
      map,
      vec![
        Section::Other,
        Section::Experience,
        Section::Experience,
        Section::Projects,
        Section::Projects,
        Section::Other,
        Section::Other,
      ]
    );
  }
}
