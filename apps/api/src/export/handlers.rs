use axum::{
    extract::{Multipart, State},
    response::Response,
    Json,
};

use crate::errors::AppError;
use crate::export::table::{build_table, to_csv, TableRow, CSV_FILE_NAME, CSV_MEDIA_TYPE};
use crate::recruitment::handlers::upload_into_session;
use crate::recruitment::pipeline::UploadReport;
use crate::session::controller::Page;
use crate::session::extract::SignedIn;
use crate::session::handlers::attachment;
use crate::state::AppState;

/// POST /api/v1/csv/upload
pub async fn handle_csv_upload(
    State(state): State<AppState>,
    signed_in: SignedIn,
    multipart: Multipart,
) -> Result<Json<UploadReport>, AppError> {
    let report = upload_into_session(&state, &signed_in, Page::CvToCsv, multipart).await?;
    Ok(Json(report))
}

/// GET /api/v1/csv/table
pub async fn handle_csv_table(signed_in: SignedIn) -> Result<Json<Vec<TableRow>>, AppError> {
    signed_in.enter(Page::CvToCsv).await?;
    let state = signed_in.handle.lock().await;
    Ok(Json(build_table(&state.resumes)))
}

/// GET /api/v1/csv/export
pub async fn handle_csv_export(signed_in: SignedIn) -> Result<Response, AppError> {
    signed_in.enter(Page::CvToCsv).await?;
    let rows = build_table(&signed_in.handle.lock().await.resumes);
    let bytes = to_csv(&rows)?;
    tracing::info!(
        "Exported {} row(s) for '{}'",
        rows.len(),
        signed_in.user.username
    );
    attachment(CSV_FILE_NAME, CSV_MEDIA_TYPE, bytes)
}
