use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the decompressed document part. Upload limits only bound
/// the compressed container.
const MAX_DOCUMENT_XML_BYTES: u64 = 16 * 1024 * 1024;

/// Raw text of the document body. Formatting is dropped, and text inside
/// embedded objects (text boxes, drawings) is skipped. Paragraphs end with a
/// blank line.
pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    extract_bounded(bytes, MAX_DOCUMENT_XML_BYTES)
}

fn extract_bounded(bytes: &[u8], limit: u64) -> Result<String, ExtractError> {
    let too_large = || ExtractError::Failed(format!("{DOCUMENT_PART} exceeds {limit} bytes"));

    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Failed(format!("invalid DOCX container: {e}")))?;
    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Failed(format!("missing {DOCUMENT_PART}: {e}")))?;

    // Declared sizes are untrusted; the read is capped too.
    if part.size() > limit {
        return Err(too_large());
    }
    let mut xml = String::new();
    part.take(limit + 1)
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Failed(format!("unreadable {DOCUMENT_PART}: {e}")))?;
    if xml.len() as u64 > limit {
        return Err(too_large());
    }

    body_text(&xml)
}

fn body_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_body = false;
    let mut in_text = false;
    // Nesting depth inside w:txbxContent / w:object / w:drawing.
    let mut embedded = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractError::Failed(format!("malformed document XML: {e}")))?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:body" => in_body = true,
                b"w:t" => in_text = true,
                b"w:txbxContent" | b"w:object" | b"w:drawing" | b"w:pict" => embedded += 1,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:body" => in_body = false,
                b"w:t" => in_text = false,
                b"w:txbxContent" | b"w:object" | b"w:drawing" | b"w:pict" => {
                    embedded = embedded.saturating_sub(1)
                }
                b"w:p" if in_body && embedded == 0 => out.push_str("\n\n"),
                _ => {}
            },
            Event::Empty(e) if in_body && embedded == 0 => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                b"w:p" => out.push_str("\n\n"),
                _ => {}
            },
            Event::Text(t) if in_body && in_text && embedded == 0 => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Failed(format!("bad text run: {e}")))?;
                out.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let xml = wrap("<w:p><w:r><w:t>Jane</w:t></w:r></w:p><w:p><w:r><w:t>Doe</w:t></w:r></w:p>");
        assert_eq!(body_text(&xml).unwrap(), "Jane\n\nDoe");
    }

    #[test]
    fn test_runs_within_paragraph_are_concatenated() {
        let xml = wrap(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Senior</w:t></w:r><w:r><w:t xml:space="preserve"> Engineer</w:t></w:r></w:p>"#,
        );
        assert_eq!(body_text(&xml).unwrap(), "Senior Engineer");
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let xml = wrap("<w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>2021</w:t><w:br/><w:t>Lead</w:t></w:r></w:p>");
        assert_eq!(body_text(&xml).unwrap(), "R&D\t2021\nLead");
    }

    #[test]
    fn test_text_boxes_are_skipped() {
        let xml = wrap(
            "<w:p><w:r><w:t>Visible</w:t></w:r><w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Hidden</w:t></w:r></w:p></w:txbxContent></w:pict></w:r></w:p>",
        );
        let text = body_text(&xml).unwrap();
        assert!(text.contains("Visible"));
        assert!(!text.contains("Hidden"));
    }

    #[test]
    fn test_oversized_document_part_is_rejected() {
        let filler = "x".repeat(64 * 1024);
        let docx = crate::test_support::minimal_docx(&[filler.as_str()]);
        assert!(docx.len() < 16 * 1024, "fixture should compress well");

        let err = extract_bounded(&docx, 32 * 1024).unwrap_err();
        assert!(matches!(err, ExtractError::Failed(msg) if msg.contains("exceeds")));

        let text = extract_bounded(&docx, 1024 * 1024).unwrap();
        assert_eq!(text.len(), filler.len());
    }

    #[test]
    fn test_non_zip_input_fails() {
        assert!(matches!(extract(b"PK?? nope"), Err(ExtractError::Failed(_))));
    }
}
