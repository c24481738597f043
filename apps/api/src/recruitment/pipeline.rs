//! Upload pipeline: read → extract → build, one file at a time.
//!
//! A failing file is reported in the summary and the rest of the upload
//! continues. Valid records come back tagged with their source filename.

use axum::extract::Multipart;
use serde::Serialize;
use tracing::{info, warn};

use crate::documents::{read_document, UploadedDocument};
use crate::errors::AppError;
use crate::extraction::driver::extract_record;
use crate::llm_client::CompletionOracle;
use crate::models::resume::ParsedResume;

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub filename: String,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct UploadReport {
    pub parsed: Vec<ParsedResume>,
    pub errors: Vec<FileFailure>,
}

/// Reads every file part of a multipart body. Parts without a filename are
/// form fields and are skipped.
pub async fn collect_documents(mut multipart: Multipart) -> Result<Vec<UploadedDocument>, AppError> {
    let mut documents = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read {filename}: {e}")))?;
        documents.push(UploadedDocument::new(filename, content_type.as_deref(), bytes));
    }

    if documents.is_empty() {
        return Err(AppError::Validation("No files were uploaded".to_string()));
    }
    Ok(documents)
}

pub async fn process_document(
    oracle: &dyn CompletionOracle,
    document: &UploadedDocument,
) -> Result<ParsedResume, AppError> {
    let text = read_document(document).await?;
    let record = extract_record(oracle, &text).await?;
    Ok(ParsedResume::new(document.filename.clone(), record))
}

/// Processes uploads sequentially, logging progress after each file.
pub async fn process_uploads(
    oracle: &dyn CompletionOracle,
    documents: &[UploadedDocument],
) -> UploadReport {
    let total = documents.len();
    let mut report = UploadReport::default();

    for (index, document) in documents.iter().enumerate() {
        match process_document(oracle, document).await {
            Ok(parsed) => {
                info!("Parsed {} as '{}'", document.filename, parsed.record.name);
                report.parsed.push(parsed);
            }
            Err(e) => {
                warn!("Skipping {}: {e}", document.filename);
                report.errors.push(FileFailure {
                    filename: document.filename.clone(),
                    code: e.code(),
                    message: e.user_message(),
                });
            }
        }
        info!("Processed {} of {total} files", index + 1);
    }

    report
}
