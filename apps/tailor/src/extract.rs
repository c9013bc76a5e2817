//! Document Text Extractor.
//!
//! PDFs go through `pdf-extract` on the blocking pool; plain text uploads are
//! decoded as UTF-8. Every failure, including a panic inside the PDF library,
//! surfaces as `DocumentUnreadable` straight away.

use std::path::Path;

use tracing::{debug, warn};

use crate::errors::TailorError;
use crate::models::submission::UploadedDocument;

const PDF_MIME: &str = "application/pdf";
const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];
const ENCRYPT_KEY: &[u8] = b"/Encrypt";
const STARTXREF: &[u8] = b"startxref";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

/// Decides how to read the upload from its magic bytes, then its extension.
pub fn detect_kind(document: &UploadedDocument) -> Result<DocumentKind, TailorError> {
    if document.data.is_empty() {
        return Err(TailorError::DocumentUnreadable(
            "the uploaded document is empty".to_string(),
        ));
    }

    if let Some(kind) = infer::get(&document.data) {
        return if kind.mime_type() == PDF_MIME {
            Ok(DocumentKind::Pdf)
        } else {
            Err(TailorError::DocumentUnreadable(format!(
                "unsupported document type '{}'; upload a PDF or plain text file",
                kind.mime_type()
            )))
        };
    }

    let extension = Path::new(&document.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("pdf") => Ok(DocumentKind::Pdf),
        Some(ext) if TEXT_EXTENSIONS.contains(&ext) => Ok(DocumentKind::PlainText),
        None => Ok(DocumentKind::PlainText),
        Some(ext) => Err(TailorError::DocumentUnreadable(format!(
            "unsupported file extension '.{ext}'; upload a PDF or plain text file"
        ))),
    }
}

/// Extracts cleaned plain text from an uploaded document.
pub async fn extract_text(document: &UploadedDocument) -> Result<String, TailorError> {
    let kind = detect_kind(document)?;
    debug!(
        "Extracting {:?} from '{}' ({} bytes)",
        kind,
        document.file_name,
        document.data.len()
    );

    let raw = match kind {
        DocumentKind::Pdf => extract_pdf(document).await?,
        DocumentKind::PlainText => String::from_utf8(document.data.to_vec()).map_err(|_| {
            TailorError::DocumentUnreadable("the file is not valid UTF-8 text".to_string())
        })?,
    };

    let text = clean_text(&raw);
    if text.is_empty() {
        return Err(TailorError::DocumentUnreadable(
            "no text could be extracted; the document might be image-based or corrupted"
                .to_string(),
        ));
    }

    Ok(text)
}

async fn extract_pdf(document: &UploadedDocument) -> Result<String, TailorError> {
    if is_encrypted_pdf(&document.data) {
        return Err(TailorError::DocumentUnreadable(
            "the PDF is encrypted; please upload an unencrypted copy".to_string(),
        ));
    }

    let data = document.data.clone();
    let joined = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

    match joined {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("PDF extraction failed for '{}': {e}", document.file_name);
            Err(TailorError::DocumentUnreadable(format!(
                "the PDF could not be parsed ({e})"
            )))
        }
        Err(e) => {
            // pdf-extract panics on some malformed inputs.
            warn!("PDF extraction aborted for '{}': {e}", document.file_name);
            Err(TailorError::DocumentUnreadable(
                "the PDF appears to be corrupted".to_string(),
            ))
        }
    }
}

/// Checks the trailer dictionary for an `/Encrypt` entry. Page content is
/// never searched, so a resume that mentions the word is still read.
fn is_encrypted_pdf(data: &[u8]) -> bool {
    let dictionary = match trailer_dictionary(data) {
        Some(dictionary) => dictionary,
        // No usable startxref; fall back to the last `trailer` keyword.
        None => match rfind(data, b"trailer") {
            Some(start) => &data[start..],
            None => return false,
        },
    };
    find(dictionary, ENCRYPT_KEY).is_some()
}

/// Follows `startxref` to the last cross-reference section and returns its
/// trailer: the `trailer` dictionary of a classic table, or the dictionary of
/// a cross-reference stream.
fn trailer_dictionary(data: &[u8]) -> Option<&[u8]> {
    let keyword = rfind(data, STARTXREF)?;
    let digits: String = data[keyword + STARTXREF.len()..]
        .iter()
        .map(|&b| b as char)
        .skip_while(char::is_ascii_whitespace)
        .take_while(char::is_ascii_digit)
        .collect();
    let offset: usize = digits.parse().ok()?;
    let section = data.get(offset..keyword)?;

    if section.starts_with(b"xref") {
        let start = find(section, b"trailer")?;
        Some(&section[start..])
    } else {
        let end = find(section, b"stream").unwrap_or(section.len());
        Some(&section[..end])
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

/// Trims every line and drops blank ones.
pub fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
