use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::packager::{package_batch, BatchBundle, ZIP_MEDIA_TYPE};
use crate::models::resume::ParsedResume;
use crate::recruitment::pipeline::{collect_documents, process_uploads, UploadReport};
use crate::render::{LayoutChoice, LayoutInfo, DOCX_MEDIA_TYPE};
use crate::session::controller::Page;
use crate::session::extract::SignedIn;
use crate::session::{Download, DownloadHandle};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RenderRequest {
    pub resume_id: Uuid,
    pub layout: LayoutChoice,
}

#[derive(Deserialize)]
pub struct BundleRequest {
    pub layout: LayoutChoice,
}

#[derive(Serialize)]
pub struct BundleResponse {
    pub download: DownloadHandle,
    pub rendered: usize,
    pub failed: usize,
    #[serde(flatten)]
    pub bundle: BatchBundle,
}

/// GET /api/v1/layouts
pub async fn handle_list_layouts() -> Json<Vec<LayoutInfo>> {
    Json(LayoutChoice::ALL.into_iter().map(LayoutChoice::info).collect())
}

/// Shared by the recruitment and CV-to-CSV upload endpoints: parse every
/// file, append the valid records to the session, report the rest.
pub async fn upload_into_session(
    state: &AppState,
    signed_in: &SignedIn,
    page: Page,
    multipart: Multipart,
) -> Result<UploadReport, AppError> {
    signed_in.enter(page).await?;
    let documents = collect_documents(multipart).await?;
    info!(
        "User '{}' uploaded {} file(s)",
        signed_in.user.username,
        documents.len()
    );

    // The session lock is not held while the oracle is working.
    let report = process_uploads(state.oracle.as_ref(), &documents).await;

    signed_in
        .handle
        .lock()
        .await
        .resumes
        .extend(report.parsed.iter().cloned());
    Ok(report)
}

/// POST /api/v1/recruitment/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    signed_in: SignedIn,
    multipart: Multipart,
) -> Result<Json<UploadReport>, AppError> {
    let report = upload_into_session(&state, &signed_in, Page::RecruitmentAgent, multipart).await?;
    Ok(Json(report))
}

/// GET /api/v1/recruitment/resumes
pub async fn handle_list_resumes(signed_in: SignedIn) -> Json<Vec<ParsedResume>> {
    Json(signed_in.handle.lock().await.resumes.clone())
}

/// POST /api/v1/recruitment/render
pub async fn handle_render(
    State(state): State<AppState>,
    signed_in: SignedIn,
    Json(req): Json<RenderRequest>,
) -> Result<Json<DownloadHandle>, AppError> {
    signed_in.enter(Page::RecruitmentAgent).await?;
    let record = signed_in
        .handle
        .lock()
        .await
        .find_resume(req.resume_id)
        .map(|parsed| parsed.record.clone())
        .ok_or_else(|| AppError::NotFound(format!("Resume {} not found", req.resume_id)))?;

    let output_dir = state.config.output_dir.clone();
    let layout = req.layout;
    let path = tokio::task::spawn_blocking(move || layout.render(&record, &output_dir))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let handle = signed_in.handle.lock().await.register_download(Download {
        path,
        file_name,
        media_type: DOCX_MEDIA_TYPE,
    });
    Ok(Json(handle))
}

/// POST /api/v1/recruitment/bundle
pub async fn handle_bundle(
    State(state): State<AppState>,
    signed_in: SignedIn,
    Json(req): Json<BundleRequest>,
) -> Result<Json<BundleResponse>, AppError> {
    signed_in.enter(Page::RecruitmentAgent).await?;
    let items = signed_in.handle.lock().await.resumes.clone();
    if items.is_empty() {
        return Err(AppError::Validation(
            "Upload at least one resume before downloading a bundle".to_string(),
        ));
    }

    let output_dir = state.config.output_dir.clone();
    let layout = req.layout;
    let bundle = tokio::task::spawn_blocking(move || package_batch(&items, layout, &output_dir))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let download = signed_in.handle.lock().await.register_download(Download {
        path: bundle.path.clone(),
        file_name: bundle.file_name.clone(),
        media_type: ZIP_MEDIA_TYPE,
    });
    Ok(Json(BundleResponse {
        download,
        rendered: bundle.rendered_count(),
        failed: bundle.failed_count(),
        bundle,
    }))
}
