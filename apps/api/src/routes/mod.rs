pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::export::handlers as csv_export;
use crate::recruitment::handlers as recruitment;
use crate::sales::handlers as sales;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session and page controller
        .route("/api/v1/auth/login", post(session::handle_login))
        .route("/api/v1/auth/logout", post(session::handle_logout))
        .route("/api/v1/session", get(session::handle_get_session))
        .route("/api/v1/navigate", post(session::handle_navigate))
        .route("/api/v1/downloads/:id", get(session::handle_download))
        // Recruitment agent
        .route("/api/v1/layouts", get(recruitment::handle_list_layouts))
        .route("/api/v1/recruitment/upload", post(recruitment::handle_upload))
        .route(
            "/api/v1/recruitment/resumes",
            get(recruitment::handle_list_resumes),
        )
        .route("/api/v1/recruitment/render", post(recruitment::handle_render))
        .route("/api/v1/recruitment/bundle", post(recruitment::handle_bundle))
        // CV to CSV
        .route("/api/v1/csv/upload", post(csv_export::handle_csv_upload))
        .route("/api/v1/csv/table", get(csv_export::handle_csv_table))
        .route("/api/v1/csv/export", get(csv_export::handle_csv_export))
        // Sales agent
        .route("/api/v1/sales/slide", post(sales::handle_generate_slide))
        // Build your resume (WIP)
        .route("/api/v1/build-resume", get(session::handle_build_resume))
        // Admin
        .route("/api/v1/admin/users", post(admin::handle_add_user))
        .route(
            "/api/v1/admin/tokens",
            get(admin::handle_list_tokens).post(admin::handle_add_token),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
