// PDF text extraction for uploaded articles.
//
// Only PDFs with an embedded text layer are supported; scanned pages come
// back empty. Extraction failures are input errors for the caller to show,
// not inference rejections.

use anyhow::{anyhow, bail, Result};
use tracing::debug;

/// Extract the text of every page, concatenated.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        bail!("PDF upload is empty");
    }
    if !bytes.starts_with(b"%PDF") {
        bail!("file is not a PDF");
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow!("Failed to read PDF: {e}"))?;
    debug!(bytes = bytes.len(), chars = text.len(), "Extracted PDF text");

    if text.trim().is_empty() {
        bail!("PDF contains no extractable text (scanned documents are not supported)");
    }
    Ok(text)
}
