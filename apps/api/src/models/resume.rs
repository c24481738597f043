use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured resume assembled from an oracle reply.
///
/// Field names serialize with the keys the extraction prompt asks for, so a
/// record round-trips through the same JSON shape the oracle produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    #[serde(rename = "Linkedin", default)]
    pub linkedin: String,
    #[serde(rename = "Summary", default)]
    pub summary: String,
    #[serde(rename = "Skills", default)]
    pub skills: Vec<String>,
    #[serde(rename = "Certifications", default)]
    pub certifications: Vec<String>,
    #[serde(rename = "Experience", default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(rename = "Education", default)]
    pub education: Vec<EducationEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Company", default)]
    pub company: String,
    #[serde(rename = "Duration", default)]
    pub duration: String,
    #[serde(rename = "Responsibilities", default)]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(rename = "Degree", default)]
    pub degree: String,
    #[serde(rename = "Institution", default)]
    pub institution: String,
    #[serde(rename = "Duration", default)]
    pub duration: String,
}

/// A record tagged with the upload it came from. Held in session state.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedResume {
    pub id: Uuid,
    pub filename: String,
    pub record: ResumeRecord,
}

impl ParsedResume {
    pub fn new(filename: impl Into<String>, record: ResumeRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            record,
        }
    }
}

impl ResumeRecord {
    /// Contact details in display order, skipping blanks.
    pub fn contact_line(&self) -> Vec<&str> {
        [&self.email, &self.phone, &self.linkedin]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl ExperienceEntry {
    /// `Title at Company (Duration)`.
    pub fn headline(&self) -> String {
        format!("{} at {} ({})", self.title, self.company, self.duration)
    }
}

impl EducationEntry {
    /// `Degree from Institution (Duration)`.
    pub fn headline(&self) -> String {
        format!("{} from {} ({})", self.degree, self.institution, self.duration)
    }
}
