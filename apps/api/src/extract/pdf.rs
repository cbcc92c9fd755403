use lopdf::Document;
use tracing::debug;

use super::ExtractError;

/// Extracts text one page at a time so a single oversized or broken page
/// cannot blow up a whole-document pass. Text items of a page are joined with
/// spaces; pages are separated by a blank line.
pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ExtractError::Failed(format!("invalid PDF: {e}")))?;

    let pages = doc.get_pages();
    debug!(page_count = pages.len(), "Extracting text from PDF");

    let mut rendered = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        let raw = doc
            .extract_text(&[*page_number])
            .map_err(|e| ExtractError::Failed(format!("page {page_number}: {e}")))?;
        rendered.push(join_items(&raw));
    }

    Ok(rendered.join("\n\n"))
}

fn join_items(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
