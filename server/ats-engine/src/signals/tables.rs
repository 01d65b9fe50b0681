//! Tabular-layout detection from whitespace-aligned columns.

use serde::Serialize;

use crate::config::DetectionThresholds;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSignal {
  pub has_tables: bool,
  pub table_lines: usize,
  pub message: String,
}

/// A line is table-like when tabs or 3+ space runs split it into enough cells.
fn is_table_line(line: &str, t: &DetectionThresholds) -> bool {
  let separator = regex!(r"\t+| {3,}");
  let separators = separator.find_iter(line).count();
  if separators < t.table_min_separators {
    return false;
  }
  let cells = separator
    .split(line)
    .filter(|cell| !cell.trim().is_empty())
    .count();
  cells >= t.table_min_cells
}

pub fn detect(text: &str, t: &DetectionThresholds) -> TableSignal {
  let table_lines = text.lines().filter(|line| is_table_line(line, t)).count();
  let has_tables = table_lines >= t.table_min_lines;
  let message = if has_tables {
    format!("{} table-like lines found", table_lines)
  } else {
    "No tables detected".to_string()
  };
  TableSignal {
    has_tables,
    table_lines,
    message,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whitespace_grid_is_a_table() {
    let text = "Skill   Level   Years   Notes\nRust   Expert   5   daily\nGo\tAdvanced\t3\tweekly\nPlain sentence here.";
    let sig = detect(text, &DetectionThresholds::default());
    assert!(sig.has_tables);
    assert_eq!(sig.table_lines, 3);
  }

  #[test]
  fn two_aligned_lines_are_not_enough() {
    let text = "A   B   C   D\nE   F   G   H\nordinary prose line";
    let sig = detect(text, &DetectionThresholds::default());
    assert!(!sig.has_tables);
  }

  #[test]
  fn trailing_padding_does_not_make_cells() {
    // Three separators but only two real cells.
    assert!(!is_table_line("   Name   Value   ", &DetectionThresholds::default()));
  }
}
