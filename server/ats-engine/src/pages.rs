//! Page-count capability injected into the detectors that need it.

use regex::bytes::Regex;
use std::fs::File;
use std::io::Read;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::PageCountError;
use crate::types::Document;

/// Source of page counts. `Ok(None)` means "not applicable" (e.g. not a PDF).
pub trait PageCounter {
  fn page_count(&self, doc: &Document<'_>) -> Result<Option<u32>, PageCountError>;
}

/// Page count already reported by the extraction collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownPages(pub Option<u32>);

impl PageCounter for KnownPages {
  fn page_count(&self, _doc: &Document<'_>) -> Result<Option<u32>, PageCountError> {
    Ok(self.0)
  }
}

/// Largest stored PDF the counter will read.
pub const MAX_PDF_BYTES: u64 = 20 * 1024 * 1024;

/// Re-opens the stored PDF and counts its page objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageCounter;

fn page_object_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  // `/Type /Page` but not `/Type /Pages` (the page-tree root).
  RE.get_or_init(|| Regex::new(r"/Type\s*/Page\b").expect("static regex"))
}

impl PageCounter for PdfPageCounter {
  fn page_count(&self, doc: &Document<'_>) -> Result<Option<u32>, PageCountError> {
    let path = match doc.file_path {
      Some(p) if doc.is_pdf() => p,
      _ => return Ok(None),
    };
    let unreadable = |source: std::io::Error| PageCountError::Unreadable {
      path: path.to_string(),
      source,
    };
    // Devices and FIFOs may block or never reach EOF.
    let meta = std::fs::metadata(path).map_err(unreadable)?;
    if !meta.is_file() {
      return Err(PageCountError::NotAFile {
        path: path.to_string(),
      });
    }
    if meta.len() > MAX_PDF_BYTES {
      return Err(PageCountError::TooLarge {
        path: path.to_string(),
        size: meta.len(),
        limit: MAX_PDF_BYTES,
      });
    }
    let mut bytes = Vec::with_capacity(meta.len() as usize);
    File::open(path)
      .and_then(|f| f.take(MAX_PDF_BYTES).read_to_end(&mut bytes))
      .map_err(unreadable)?;
    let pages = page_object_re().find_iter(&bytes).count() as u32;
    if pages == 0 {
      return Err(PageCountError::NoPages {
        path: path.to_string(),
      });
    }
    Ok(Some(pages))
  }
}

/// Resolve a page count, swallowing lookup failures.
pub fn resolve(doc: &Document<'_>, counter: &dyn PageCounter) -> Option<u32> {
  match counter.page_count(doc) {
    Ok(pages) => pages,
    Err(e) => {
      debug!(error = %e, "page count unavailable");
      None
    }
  }
}
