//! Tabular Exporter: one flat row per record, serialized as CSV.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::resume::{ParsedResume, ResumeRecord};

pub const CSV_FILE_NAME: &str = "Consolidated_Resumes.csv";
pub const CSV_MEDIA_TYPE: &str = "text/csv";

pub const COLUMNS: [&str; 9] = [
    "Name",
    "Email",
    "Phone",
    "Linkedin",
    "Summary",
    "Skills",
    "Certifications",
    "Experience",
    "Education",
];

/// Field order must match `COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Linkedin")]
    pub linkedin: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "Certifications")]
    pub certifications: String,
    #[serde(rename = "Experience")]
    pub experience: String,
    #[serde(rename = "Education")]
    pub education: String,
}

impl From<&ResumeRecord> for TableRow {
    fn from(record: &ResumeRecord) -> Self {
        TableRow {
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            linkedin: record.linkedin.clone(),
            summary: record.summary.clone(),
            skills: record.skills.join(", "),
            certifications: record.certifications.join(", "),
            experience: record
                .experience
                .iter()
                .map(|exp| exp.headline())
                .collect::<Vec<_>>()
                .join("; "),
            education: record
                .education
                .iter()
                .map(|edu| edu.headline())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

pub fn build_table(items: &[ParsedResume]) -> Vec<TableRow> {
    items.iter().map(|item| TableRow::from(&item.record)).collect()
}

/// UTF-8 CSV with a header row, even when there are no records.
pub fn to_csv(rows: &[TableRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(COLUMNS)
        .map_err(|e| AppError::Internal(e.into()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Internal(e.into()))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("csv flush failed: {}", e.error())))
}
