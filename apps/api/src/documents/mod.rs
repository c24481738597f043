// Document Reader: uploaded bytes + declared MIME type -> plain text.
// Parsing runs on the blocking pool; every failure becomes UnreadableDocument.

pub mod docx;
pub mod pdf;

use std::path::Path;

use bytes::Bytes;
use tracing::error;

use crate::errors::AppError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PLAIN_MIME: &str = "text/plain";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Plain,
}

impl DocumentKind {
    /// Resolves the kind from the declared content type. A missing or generic
    /// (`application/octet-stream`) type falls back to the file extension.
    pub fn detect(declared: Option<&str>, filename: &str) -> Option<Self> {
        let essence = declared
            .map(|mime| mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
            .filter(|mime| !mime.is_empty() && mime != "application/octet-stream");

        match essence.as_deref() {
            Some(PDF_MIME) => Some(DocumentKind::Pdf),
            Some(DOCX_MIME) => Some(DocumentKind::Docx),
            Some(PLAIN_MIME) => Some(DocumentKind::Plain),
            Some(_) => None,
            None => Self::from_extension(filename),
        }
    }

    fn from_extension(filename: &str) -> Option<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())?;
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Plain),
            _ => None,
        }
    }
}

/// A file as received from the upload surface. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, content_type: Option<&str>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }
}

/// Extracts plain text from an uploaded document.
///
/// Empty output counts as a failure. Errors are logged here and returned as
/// `UnreadableDocument`; nothing escapes as a panic.
pub async fn read_document(document: &UploadedDocument) -> Result<String, AppError> {
    let kind = DocumentKind::detect(document.content_type.as_deref(), &document.filename)
        .ok_or_else(|| {
            let msg = format!(
                "{}: unsupported file type {:?}",
                document.filename, document.content_type
            );
            error!("Error reading resume: {msg}");
            AppError::UnreadableDocument(msg)
        })?;

    let bytes = document.bytes.clone();
    let extracted = tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(&bytes),
        DocumentKind::Docx => docx::extract_docx_text(&bytes),
        DocumentKind::Plain => Ok(String::from_utf8(bytes.to_vec())?),
    })
    .await;

    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            let msg = format!("{}: {err}", document.filename);
            error!("Error reading resume: {msg}");
            return Err(AppError::UnreadableDocument(msg));
        }
        Err(join_err) => {
            let msg = format!("{}: extractor aborted: {join_err}", document.filename);
            error!("Error reading resume: {msg}");
            return Err(AppError::UnreadableDocument(msg));
        }
    };

    if text.trim().is_empty() {
        let msg = format!("{}: empty or unreadable resume text", document.filename);
        error!("Error reading resume: {msg}");
        return Err(AppError::UnreadableDocument(msg));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::docx::DocxBuilder;

    #[test]
    fn test_detect_from_declared_type() {
        assert_eq!(
            DocumentKind::detect(Some("application/pdf"), "x.bin"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect(Some(DOCX_MIME), "x"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::detect(Some("text/plain; charset=utf-8"), "x"),
            Some(DocumentKind::Plain)
        );
        assert_eq!(DocumentKind::detect(Some("image/png"), "cv.pdf"), None);
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        assert_eq!(
            DocumentKind::detect(Some("application/octet-stream"), "CV.PDF"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect(None, "resume.docx"),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::detect(None, "resume.odt"), None);
    }

    #[tokio::test]
    async fn test_read_plain_text() {
        let doc = UploadedDocument::new(
            "cv.txt",
            Some(PLAIN_MIME),
            Bytes::from_static(b"Jane Doe\nRust"),
        );
        assert_eq!(read_document(&doc).await.unwrap(), "Jane Doe\nRust");
    }

    #[tokio::test]
    async fn test_read_pdf() {
        let pdf = pdf::fixtures::single_page_pdf(&["Jane Doe, jane@x.com, Python, Java"]);
        let doc = UploadedDocument::new("cv.pdf", Some(PDF_MIME), Bytes::from(pdf));
        let text = read_document(&doc).await.unwrap();
        assert!(text.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn test_read_docx() {
        let mut builder = DocxBuilder::new();
        builder.paragraph("Jane Doe");
        builder.paragraph("Python, Java");
        let doc = UploadedDocument::new(
            "cv.docx",
            Some(DOCX_MIME),
            Bytes::from(builder.finish().unwrap()),
        );
        assert_eq!(read_document(&doc).await.unwrap(), "Jane Doe\nPython, Java");
    }

    #[tokio::test]
    async fn test_unsupported_type_is_failure_signal() {
        let doc = UploadedDocument::new("cv.png", Some("image/png"), Bytes::from_static(b"\x89PNG"));
        let err = read_document(&doc).await.unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_failure_signal() {
        let doc = UploadedDocument::new("cv.pdf", Some(PDF_MIME), Bytes::from_static(b"%PDF-garbage"));
        let err = read_document(&doc).await.unwrap_err();
        assert!(matches!(err, AppError::UnreadableDocument(_)));
    }

    #[tokio::test]
    async fn test_blank_text_is_failure_signal() {
        let doc = UploadedDocument::new("cv.txt", Some(PLAIN_MIME), Bytes::from_static(b"  \n "));
        assert!(read_document(&doc).await.is_err());
    }
}
