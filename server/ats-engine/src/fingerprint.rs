//! Stable document identifier used in logs and service responses.

/// Hex characters kept from the blake3 digest.
pub const ID_LEN: usize = 16;

/// First 16 hex chars of the blake3 hash of the trimmed text.
///
/// Logs carry this instead of any resume text.
pub fn document_id(text: &str) -> String {
  let hash = blake3::hash(text.trim().as_bytes());
  let hex = hash.to_hex();
  hex[..ID_LEN].to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stable_and_whitespace_insensitive() {
    let a = document_id("Jane Doe\njane@example.com");
    let b = document_id("  Jane Doe\njane@example.com\n\n");
    assert_eq!(a, b);
    assert_eq!(a.len(), ID_LEN);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn different_text_different_id() {
    assert_ne!(document_id("Jane Doe"), document_id("John Doe"));
  }
}
