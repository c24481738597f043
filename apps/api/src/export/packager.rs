//! Batch Packager: renders a batch of records with one layout and bundles the
//! outputs into a single ZIP.
//!
//! Every item gets its own outcome. A failed render is recorded and the rest
//! of the batch continues; the bundle is produced if at least one item rendered.
//! The working directory is a fresh `TempDir`, removed on every exit path.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tempfile::TempDir;
use tracing::{error, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::AppError;
use crate::models::resume::{ParsedResume, ResumeRecord};
use crate::render::{create_unique, LayoutChoice};

pub const ZIP_MEDIA_TYPE: &str = "application/zip";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemStatus {
    Rendered { file_name: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItemOutcome {
    pub filename: String,
    pub name: String,
    #[serde(flatten)]
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchBundle {
    #[serde(skip)]
    pub path: PathBuf,
    pub file_name: String,
    pub items: Vec<BatchItemOutcome>,
}

impl BatchBundle {
    pub fn rendered_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.status, ItemStatus::Rendered { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.items.len() - self.rendered_count()
    }
}

/// Renders `items` with `layout` and zips the results into `output_dir`.
/// Blocking; call from `spawn_blocking` in async contexts.
pub fn package_batch(
    items: &[ParsedResume],
    layout: LayoutChoice,
    output_dir: &Path,
) -> Result<BatchBundle, AppError> {
    let stem = format!(
        "resumes_{}_{}",
        layout.name().to_lowercase(),
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    package_with(items, output_dir, &stem, |record, dir| {
        layout.render(record, dir)
    })
}

/// Packaging with an arbitrary renderer.
pub fn package_with<F>(
    items: &[ParsedResume],
    output_dir: &Path,
    bundle_stem: &str,
    render: F,
) -> Result<BatchBundle, AppError>
where
    F: Fn(&ResumeRecord, &Path) -> Result<PathBuf, AppError>,
{
    std::fs::create_dir_all(output_dir).map_err(|e| packaging_error("create output dir", e))?;

    let work_dir = tempfile::Builder::new()
        .prefix("temp_resumes_")
        .tempdir_in(output_dir)
        .map_err(|e| packaging_error("create working dir", e))?;

    let mut outcomes = Vec::with_capacity(items.len());
    for item in items {
        let status = match render(&item.record, work_dir.path()) {
            Ok(path) => ItemStatus::Rendered {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            },
            Err(e) => {
                warn!("Batch item {} failed to render: {e}", item.filename);
                ItemStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        outcomes.push(BatchItemOutcome {
            filename: item.filename.clone(),
            name: item.record.name.clone(),
            status,
        });
    }

    let rendered = outcomes
        .iter()
        .filter(|o| matches!(o.status, ItemStatus::Rendered { .. }))
        .count();
    if rendered == 0 {
        // work_dir is dropped (and removed) on return.
        return Err(AppError::RenderFailure(format!(
            "none of the {} resumes could be rendered",
            items.len()
        )));
    }

    let bundle_path = write_bundle(work_dir, output_dir, bundle_stem, zip_directory)?;

    let file_name = bundle_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!(
        "Packaged {rendered}/{} resumes into {file_name}",
        items.len()
    );

    Ok(BatchBundle {
        path: bundle_path,
        file_name,
        items: outcomes,
    })
}

/// Zips the working dir into a freshly claimed `<stem>.zip`. The working dir
/// goes away on every path; on failure the partial bundle goes too.
fn write_bundle<Z>(
    work_dir: TempDir,
    output_dir: &Path,
    stem: &str,
    zip: Z,
) -> Result<PathBuf, AppError>
where
    Z: FnOnce(&Path, File) -> anyhow::Result<()>,
{
    let (bundle_path, file) =
        create_unique(output_dir, stem, "zip").map_err(|e| packaging_error("create zip", e))?;

    if let Err(e) = zip(work_dir.path(), file) {
        let _ = std::fs::remove_file(&bundle_path);
        return Err(packaging_error("write zip", e));
    }

    if let Err(e) = work_dir.close() {
        error!("Failed to remove batch working dir: {e}");
    }
    Ok(bundle_path)
}

/// Adds every regular file in `dir` to the ZIP written to `dest`, by file name.
fn zip_directory(dir: &Path, dest: File) -> anyhow::Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let mut zip = ZipWriter::new(dest);
    for path in entries {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)?;
        let mut source = File::open(&path)?;
        io::copy(&mut source, &mut zip)?;
    }
    zip.finish()?.flush()?;
    Ok(())
}

fn packaging_error(step: &str, e: impl std::fmt::Display) -> AppError {
    error!("Error generating or zipping resumes ({step}): {e}");
    AppError::RenderFailure(format!("packaging failed at {step}: {e}"))
}
