//! Contact information and where it sits in the document.
//!
//! The acceptable window is the union of the first N characters and the
//! first M lines, because header/footer text may be extracted out of order.

use serde::Serialize;

use super::prefix_chars;
use crate::config::DetectionThresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPlacement {
  /// Within the first characters of the document.
  Top,
  /// Only within the first lines; likely a header or footer region.
  HeaderFooter,
  /// Present, but outside the acceptable window.
  Misplaced,
  Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSignal {
  pub has_email: bool,
  pub has_phone: bool,
  pub in_first_chars: bool,
  pub in_first_lines: bool,
  pub exists_anywhere: bool,
  pub placement: ContactPlacement,
  pub message: String,
}

fn has_email(s: &str) -> bool {
  regex!(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").is_match(s)
}

fn has_phone(s: &str) -> bool {
  let nanp = regex!(r"(?:\+?1[-.\s]?)?\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b");
  let international = regex!(r"\+\d{1,3}[\s.-]?\(?\d{1,4}\)?(?:[\s.-]?\d{2,4}){2,4}\b");
  nanp.is_match(s) || international.is_match(s)
}

fn has_contact(s: &str) -> (bool, bool) {
  (has_email(s), has_phone(s))
}

fn first_lines(text: &str, n: usize) -> String {
  text.lines().take(n).collect::<Vec<_>>().join("\n")
}

pub fn detect(text: &str, t: &DetectionThresholds) -> ContactSignal {
  let head = prefix_chars(text, t.contact_window_chars);
  let lines = first_lines(text, t.contact_window_lines);

  let (head_email, head_phone) = has_contact(head);
  let (line_email, line_phone) = has_contact(&lines);
  let (any_email, any_phone) = has_contact(text);

  let in_first_chars = head_email || head_phone;
  let in_first_lines = line_email || line_phone;
  let exists_anywhere = any_email || any_phone;

  let placement = if in_first_chars {
    ContactPlacement::Top
  } else if in_first_lines {
    ContactPlacement::HeaderFooter
  } else if exists_anywhere {
    ContactPlacement::Misplaced
  } else {
    ContactPlacement::Missing
  };

  let message = match placement {
    ContactPlacement::Top => match (any_email, any_phone) {
      (true, true) => "Email and phone found at the top".to_string(),
      (true, false) => "Email found at the top; no phone number".to_string(),
      _ => "Phone found at the top; no email address".to_string(),
    },
    ContactPlacement::HeaderFooter => {
      "Contact details found only in the first lines; may sit in a header or footer".to_string()
    }
    ContactPlacement::Misplaced => "Contact details found outside the top of the document".to_string(),
    ContactPlacement::Missing => "No email address or phone number found".to_string(),
  };

  ContactSignal {
    has_email: any_email,
    has_phone: any_phone,
    in_first_chars,
    in_first_lines,
    exists_anywhere,
    placement,
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
  fn contact_at_top() {
    let sig = detect("Jane Doe\njane.doe@example.com | (555) 123-4567\nSeattle, WA", &t());
    assert!(sig.has_email && sig.has_phone);
    assert_eq!(sig.placement, ContactPlacement::Top);
  }

  #[test]
  fn international_phone_recognized() {
    assert!(has_phone("+44 20 7946 0958"));
    assert!(has_phone("+49 (30) 1234 5678"));
    assert!(!has_phone("Graduated 2019"));
  }

  #[test]
  fn first_lines_beyond_char_window_is_header_footer() {
    // Long first lines push the email past 300 chars but keep it in line 3.
    let filler = "Distributed systems engineer focused on reliability ".repeat(3);
    let text = format!("{}\n{}\nContact: jane@example.com\nrest", filler, filler);
    let sig = detect(&text, &t());
    assert_eq!(sig.placement, ContactPlacement::HeaderFooter);
  }

  #[test]
  fn contact_far_down_is_misplaced() {
    let mut text = String::from("Jane Doe\n");
    for _ in 0..30 {
      text.push_str("Built data pipelines and maintained production services.\n");
    }
    text.push_str("jane@example.com\n");
    let sig = detect(&text, &t());
    assert_eq!(sig.placement, ContactPlacement::Misplaced);
  }

  #[test]
  fn no_contact_is_missing() {
    let sig = detect("Jane Doe\nSoftware Engineer", &t());
    assert_eq!(sig.placement, ContactPlacement::Missing);
    assert!(!sig.exists_anywhere);
  }
}
