use lopdf::Document;
use sm_core::{Error, Result};

/// Decodes a PDF and returns the text of every page, in page order.
///
/// Pages without extractable text yield an empty string.
pub fn extract_pdf_pages(bytes: &[u8]) -> Result<Vec<String>> {
    let document =
        Document::load_mem(bytes).map_err(|e| Error::Pdf(format!("failed to decode PDF: {}", e)))?;

    document
        .get_pages()
        .keys()
        .map(|&page| {
            document.extract_text(&[page]).map_err(|e| {
                Error::Pdf(format!("failed to extract text from page {}: {}", page, e))
            })
        })
        .collect()
}
