//! Best-effort text extraction from uploaded documents.

use std::fmt::Display;
use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Main body part of a WordprocessingML package.
const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Extracts plain text from `bytes` based on the upload's content type.
///
/// - `*pdf*` → pdf-extract
/// - `*wordprocessingml*` / `*docx*` → paragraph text of `word/document.xml`
/// - `application/msword` (legacy binary .doc) → not supported, the upload is rejected
/// - anything else → lossy UTF-8
pub fn extract_text(bytes: &[u8], content_type: &str) -> Result<String, ExtractionError> {
    let content_type = content_type.to_ascii_lowercase();

    if content_type.contains("pdf") {
        return pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Pdf(e.to_string()));
    }

    if content_type.contains("wordprocessingml") || content_type.contains("docx") {
        return extract_docx(bytes);
    }

    if content_type.contains("msword") {
        return Err(ExtractionError::UnsupportedFormat(content_type));
    }

    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// One line per `<w:p>` paragraph; `<w:tab/>` and `<w:br/>` become `\t` and `\n`.
fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(docx_error)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(docx_error)?
        .read_to_string(&mut xml)
        .map_err(docx_error)?;
    paragraphs_from_document_xml(&xml)
}

fn paragraphs_from_document_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event().map_err(docx_error)? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape().map_err(docx_error)?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn docx_error(e: impl Display) -> ExtractionError {
    ExtractionError::Docx(e.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    pub(crate) const DOCX_CONTENT_TYPE: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    /// Minimal package holding only the body part, one `<w:p>` per paragraph.
    pub(crate) fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}<w:sectPr/></w:body></w:document>"
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCX_BODY_PART, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn plain_text_passes_through() {
        let text = extract_text(b"Python developer, 5 years", "text/plain").unwrap();
        assert_eq!(text, "Python developer, 5 years");
    }

    #[test]
    fn unknown_content_type_is_treated_as_text() {
        let text = extract_text(b"resume body", "application/octet-stream").unwrap();
        assert_eq!(text, "resume body");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let text = extract_text(&[b'o', b'k', 0xff, b'!'], "text/plain").unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.ends_with('!'));
    }

    #[test]
    fn docx_paragraphs_are_extracted_one_per_line() {
        let bytes = docx_bytes(&["Senior Python engineer", "5+ years of SQL &amp; AWS"]);
        let text = extract_text(&bytes, DOCX_CONTENT_TYPE).unwrap();
        assert_eq!(text, "Senior Python engineer\n5+ years of SQL & AWS\n");
    }

    #[test]
    fn runs_tabs_and_breaks_inside_a_paragraph() {
        let xml = "<w:document><w:body><w:p>\
                   <w:r><w:t>Python</w:t></w:r><w:r><w:tab/><w:t xml:space=\"preserve\"> SQL</w:t></w:r>\
                   <w:r><w:br/><w:t>AWS</w:t></w:r>\
                   <w:pPr><w:rStyle w:val=\"ignored\"/></w:pPr>\
                   </w:p></w:body></w:document>";
        assert_eq!(paragraphs_from_document_xml(xml).unwrap(), "Python\t SQL\nAWS\n");
    }

    #[test]
    fn docx_without_body_part_is_an_error() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_text(&bytes, DOCX_CONTENT_TYPE).unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }

    #[test]
    fn truncated_docx_is_an_error() {
        let err = extract_text(b"PK\x03\x04", DOCX_CONTENT_TYPE).unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }

    #[test]
    fn legacy_word_documents_are_unsupported() {
        let err = extract_text(b"\xd0\xcf\x11\xe0", "application/msword").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
    }

    #[test]
    fn garbage_pdf_is_an_error() {
        let err = extract_text(b"definitely not a pdf", "application/pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }
}
