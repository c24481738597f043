// Layout Renderer: a closed set of three document layouts sharing one signature,
// (record, output_dir) -> path of the written .docx.

pub mod docx;
pub mod layouts;
pub mod package;

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;

pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutChoice {
    Kallisti,
    Phaedon,
    Erasmos,
}

#[derive(Debug, Serialize)]
pub struct LayoutInfo {
    pub id: LayoutChoice,
    pub label: &'static str,
    pub description: &'static str,
}

impl LayoutChoice {
    pub const ALL: [LayoutChoice; 3] = [
        LayoutChoice::Kallisti,
        LayoutChoice::Phaedon,
        LayoutChoice::Erasmos,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutChoice::Kallisti => "Kallisti",
            LayoutChoice::Phaedon => "Phaedon",
            LayoutChoice::Erasmos => "Erasmos",
        }
    }

    pub fn info(self) -> LayoutInfo {
        let (label, description) = match self {
            LayoutChoice::Kallisti => (
                "Kallisti (Layout 1)",
                "Classic single column with a centered header",
            ),
            LayoutChoice::Phaedon => (
                "Phaedon (Layout 2)",
                "Two columns with a shaded contact and skills sidebar",
            ),
            LayoutChoice::Erasmos => (
                "Erasmos (Layout 3)",
                "Compact layout that leads with core skills",
            ),
        };
        LayoutInfo {
            id: self,
            label,
            description,
        }
    }

    fn build(self, record: &ResumeRecord) -> anyhow::Result<Vec<u8>> {
        match self {
            LayoutChoice::Kallisti => layouts::kallisti(record),
            LayoutChoice::Phaedon => layouts::phaedon(record),
            LayoutChoice::Erasmos => layouts::erasmos(record),
        }
    }

    /// Writes exactly one `.docx` into `output_dir` and returns its path.
    /// Blocking; call from `spawn_blocking` in async contexts.
    pub fn render(self, record: &ResumeRecord, output_dir: &Path) -> Result<PathBuf, AppError> {
        let write = || -> anyhow::Result<PathBuf> {
            let bytes = self.build(record)?;
            std::fs::create_dir_all(output_dir)?;
            let stem = format!("{}_{}", file_stem(&record.name, "Resume"), self.name());
            Ok(write_unique(output_dir, &stem, "docx", &bytes)?)
        };

        match write() {
            Ok(path) => {
                debug!("Rendered {} with layout {}", record.name, self.name());
                Ok(path)
            }
            Err(e) => {
                error!("Failed to generate resume for {}: {e:?}", record.name);
                Err(AppError::RenderFailure(format!(
                    "{} layout failed for {}: {e}",
                    self.name(),
                    record.name
                )))
            }
        }
    }
}

/// Reduces free text to a safe file stem: alphanumerics, `-` and `_`, with
/// whitespace runs collapsed to `_`.
pub fn file_stem(text: &str, fallback: &str) -> String {
    let stem = text
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if stem.is_empty() {
        fallback.to_string()
    } else {
        stem
    }
}

/// Claims the first free name among `dir/stem.ext`, `dir/stem_2.ext`,
/// `dir/stem_3.ext`… by creating it, and returns it open for writing.
/// Concurrent callers never get the same path.
pub fn create_unique(dir: &Path, stem: &str, extension: &str) -> io::Result<(PathBuf, File)> {
    let mut attempt = 1u32;
    loop {
        let path = if attempt == 1 {
            dir.join(format!("{stem}.{extension}"))
        } else {
            dir.join(format!("{stem}_{attempt}.{extension}"))
        };
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Writes `bytes` to a name claimed with `create_unique`. A short write
/// removes the file again.
pub fn write_unique(dir: &Path, stem: &str, extension: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let (path, mut file) = create_unique(dir, stem, extension)?;
    if let Err(e) = file.write_all(bytes) {
        let _ = std::fs::remove_file(&path);
        return Err(e);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::docx::extract_docx_text;
    use crate::models::resume::{EducationEntry, ExperienceEntry};

    fn sample_record() -> ResumeRecord {
        ResumeRecord {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: "+1 555 0100".to_string(),
            linkedin: "linkedin.com/in/janedoe".to_string(),
            summary: "Backend engineer, 8 years.".to_string(),
            skills: vec!["Python".to_string(), "Java".to_string()],
            certifications: vec!["AWS SA".to_string()],
            experience: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                duration: "2019 - 2024".to_string(),
                responsibilities: vec!["Built APIs".to_string()],
            }],
            education: vec![EducationEntry {
                degree: "BSc CS".to_string(),
                institution: "MIT".to_string(),
                duration: "2015".to_string(),
            }],
        }
    }

    #[test]
    fn test_every_layout_writes_readable_docx() {
        let dir = tempfile::tempdir().unwrap();
        let record = sample_record();

        for layout in LayoutChoice::ALL {
            let path = layout.render(&record, dir.path()).unwrap();
            assert_eq!(path.extension().unwrap(), "docx");
            assert!(path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(&format!("Jane_Doe_{}", layout.name())));

            let text = extract_docx_text(&std::fs::read(&path).unwrap()).unwrap();
            assert!(text.to_lowercase().contains("jane doe"), "{layout:?}: {text}");
            assert!(text.contains("Built APIs"), "{layout:?}");
            assert!(text.contains("Python"), "{layout:?}");
        }
    }

    #[test]
    fn test_minimal_record_renders() {
        let dir = tempfile::tempdir().unwrap();
        let record = ResumeRecord {
            name: "Solo".to_string(),
            ..Default::default()
        };
        for layout in LayoutChoice::ALL {
            assert!(layout.render(&record, dir.path()).is_ok());
        }
    }

    #[test]
    fn test_collisions_get_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let record = sample_record();
        let first = LayoutChoice::Kallisti.render(&record, dir.path()).unwrap();
        let second = LayoutChoice::Kallisti.render(&record, dir.path()).unwrap();
        assert_ne!(first, second);
        assert!(second.ends_with("Jane_Doe_Kallisti_2.docx"));
    }

    #[test]
    fn test_concurrent_claims_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..16)
                .map(|i| {
                    let dir = dir.path();
                    scope.spawn(move || {
                        write_unique(dir, "resumes_kallisti", "zip", format!("{i}").as_bytes())
                            .unwrap()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        let mut distinct = paths.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 16);

        // Every worker's bytes survived under its own name.
        let mut contents: Vec<String> = paths
            .iter()
            .map(|p| std::fs::read_to_string(p).unwrap())
            .collect();
        contents.sort_by_key(|c| c.parse::<u32>().unwrap());
        assert_eq!(contents, (0..16).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_create_unique_skips_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.zip"), b"keep").unwrap();
        std::fs::write(dir.path().join("a_2.zip"), b"keep").unwrap();

        let (path, _file) = create_unique(dir.path(), "a", "zip").unwrap();
        assert_eq!(path, dir.path().join("a_3.zip"));
        assert_eq!(std::fs::read(dir.path().join("a.zip")).unwrap(), b"keep");
    }

    #[test]
    fn test_unwritable_directory_is_render_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();
        let err = LayoutChoice::Erasmos
            .render(&sample_record(), &blocker)
            .unwrap_err();
        assert!(matches!(err, AppError::RenderFailure(_)));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Jane  Doe", "Resume"), "Jane_Doe");
        assert_eq!(file_stem("O'Brien / Ops", "Resume"), "OBrien_Ops");
        assert_eq!(file_stem("  ", "Resume"), "Resume");
    }

    #[test]
    fn test_layout_serde_names() {
        let layout: LayoutChoice = serde_json::from_str(r#""phaedon""#).unwrap();
        assert_eq!(layout, LayoutChoice::Phaedon);
        assert_eq!(LayoutChoice::Erasmos.info().label, "Erasmos (Layout 3)");
    }
}
