//! Text-extractability: does the PDF look like a scanned image?

use serde::Serialize;

use super::char_len;
use crate::config::DetectionThresholds;
use crate::types::Document;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractabilitySignal {
  pub is_scanned: bool,
  /// False when the page count could not be determined.
  pub verified: bool,
  pub page_count: Option<u32>,
  pub text_length: usize,
  pub message: String,
}

pub fn detect(doc: &Document<'_>, page_count: Option<u32>, t: &DetectionThresholds) -> ExtractabilitySignal {
  let text_length = char_len(doc.text.trim());

  if !doc.is_pdf() {
    return ExtractabilitySignal {
      is_scanned: false,
      verified: true,
      page_count,
      text_length,
      message: "Text-based document".to_string(),
    };
  }

  let pages = match page_count {
    Some(p) => p,
    None => {
      return ExtractabilitySignal {
        is_scanned: false,
        verified: false,
        page_count: None,
        text_length,
        message: "Could not verify page count; assuming text-based PDF".to_string(),
      };
    }
  };

  let is_scanned = (pages > 1 && text_length < t.scanned_multi_page_min_chars)
    || text_length < t.scanned_min_chars;

  let message = if is_scanned {
    format!(
      "Only {} characters extracted from {} page(s); document appears to be a scanned image",
      text_length, pages
    )
  } else {
    format!("{} characters extracted from {} page(s)", text_length, pages)
  };

  ExtractabilitySignal {
    is_scanned,
    verified: true,
    page_count: Some(pages),
    text_length,
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
  fn multi_page_pdf_with_little_text_is_scanned() {
    let doc = Document::new("Page 1 of 2 ...", "application/pdf");
    let sig = detect(&doc, Some(2), &t());
    assert!(sig.is_scanned);
    assert!(sig.message.contains("scanned image"));
  }

  #[test]
  fn single_page_pdf_needs_fewer_than_twenty_chars() {
    let text = "x".repeat(30);
    let doc = Document::new(&text, "application/pdf");
    assert!(!detect(&doc, Some(1), &t()).is_scanned);
    let doc = Document::new("short", "application/pdf");
    assert!(detect(&doc, Some(1), &t()).is_scanned);
  }

  #[test]
  fn unknown_page_count_assumes_text() {
    let doc = Document::new("tiny", "application/pdf");
    let sig = detect(&doc, None, &t());
    assert!(!sig.is_scanned);
    assert!(!sig.verified);
  }

  #[test]
  fn non_pdf_never_scanned() {
    let doc = Document::new("tiny", "application/vnd.openxmlformats-officedocument.wordprocessingml.document");
    assert!(!detect(&doc, Some(3), &t()).is_scanned);
  }
}
