use std::path::{Path, PathBuf};

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use crate::documents::read_document;
use crate::errors::AppError;
use crate::recruitment::pipeline::collect_documents;
use crate::render::{file_stem, write_unique};
use crate::sales::pptx::{build_presentation, PPTX_MEDIA_TYPE};
use crate::sales::slide::{request_slide, SlideContent};
use crate::session::controller::Page;
use crate::session::extract::SignedIn;
use crate::session::{Download, DownloadHandle};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SlideResponse {
    pub download: DownloadHandle,
    pub content: SlideContent,
}

/// Writes `<Name>_Profile.pptx` into `output_dir`. Blocking.
pub fn write_slide(content: &SlideContent, output_dir: &Path) -> Result<PathBuf, AppError> {
    let write = || -> anyhow::Result<PathBuf> {
        let bytes = build_presentation(content)?;
        std::fs::create_dir_all(output_dir)?;
        let stem = format!("{}_Profile", file_stem(&content.name, "Candidate"));
        Ok(write_unique(output_dir, &stem, "pptx", &bytes)?)
    };
    write().map_err(|e| {
        error!("Error generating slide for {}: {e:?}", content.name);
        AppError::RenderFailure(format!("slide for {} failed: {e}", content.name))
    })
}

/// POST /api/v1/sales/slide
pub async fn handle_generate_slide(
    State(state): State<AppState>,
    signed_in: SignedIn,
    multipart: Multipart,
) -> Result<Json<SlideResponse>, AppError> {
    signed_in.enter(Page::SalesAgent).await?;

    let mut documents = collect_documents(multipart).await?;
    if documents.len() != 1 {
        return Err(AppError::Validation(
            "Upload exactly one profile to generate a slide".to_string(),
        ));
    }
    let document = documents.remove(0);

    let text = read_document(&document).await?;
    let content = request_slide(state.oracle.as_ref(), &text).await?;

    let output_dir = state.config.output_dir.clone();
    let for_render = content.clone();
    let path = tokio::task::spawn_blocking(move || write_slide(&for_render, &output_dir))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!("Generated slide {file_name} from {}", document.filename);

    let download = signed_in.handle.lock().await.register_download(Download {
        path,
        file_name,
        media_type: PPTX_MEDIA_TYPE,
    });
    Ok(Json(SlideResponse { download, content }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_file_named_after_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let content = SlideContent {
            name: "Jane Doe".to_string(),
            ..Default::default()
        };

        let first = write_slide(&content, dir.path()).unwrap();
        let second = write_slide(&content, dir.path()).unwrap();

        assert_eq!(first.file_name().unwrap(), "Jane_Doe_Profile.pptx");
        assert_eq!(second.file_name().unwrap(), "Jane_Doe_Profile_2.pptx");
    }
}
