pub mod health;
pub mod tailor;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Room for the text fields that travel with the upload.
const FORM_FIELDS_ALLOWANCE: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_FIELDS_ALLOWANCE;

    Router::new()
        .route("/", get(tailor::handle_form))
        .route("/tailor", post(tailor::handle_tailor))
        .route("/download", post(tailor::handle_download))
        .route("/health", get(health::health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
