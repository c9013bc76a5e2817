use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::render;

/// Every way a submission can fail.
/// Each variant maps to a user-facing message and an HTTP status; none of them is fatal.
#[derive(Debug, Error)]
pub enum TailorError {
    #[error("Document unreadable: {0}")]
    DocumentUnreadable(String),

    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl TailorError {
    /// Stable machine-readable code, also used as a CSS hook on the error banner.
    pub fn code(&self) -> &'static str {
        match self {
            TailorError::DocumentUnreadable(_) => "DOCUMENT_UNREADABLE",
            TailorError::MissingInput(_) => "MISSING_INPUT",
            TailorError::InvalidFormat(_) => "INVALID_FORMAT",
            TailorError::Authentication(_) => "AUTHENTICATION_ERROR",
            TailorError::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            TailorError::Network(_) => "NETWORK_ERROR",
            TailorError::Upstream(_) => "UPSTREAM_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            TailorError::DocumentUnreadable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            TailorError::MissingInput(_) | TailorError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            TailorError::Authentication(_) => StatusCode::SERVICE_UNAVAILABLE,
            TailorError::QuotaExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
            TailorError::Network(_) => StatusCode::GATEWAY_TIMEOUT,
            TailorError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The sentence shown to the user in place of the generated output.
    pub fn user_message(&self) -> String {
        match self {
            TailorError::DocumentUnreadable(detail) => {
                format!("Could not read document: {detail}")
            }
            TailorError::MissingInput(field) => format!("Please provide the {field}."),
            TailorError::InvalidFormat(detail) => format!("Invalid output format: {detail}"),
            TailorError::Authentication(_) => "The text-generation API credential is missing or \
                was rejected. Set XAI_API_KEY in the server environment and restart."
                .to_string(),
            TailorError::QuotaExceeded(_) => "The text-generation service quota has been \
                exceeded. Wait a moment or check your plan, then try again."
                .to_string(),
            TailorError::Network(detail) => {
                format!("Could not reach the text-generation service: {detail}")
            }
            TailorError::Upstream(detail) => {
                format!("The text-generation service returned an unusable response: {detail}")
            }
        }
    }

    /// Input failures are the user's to fix; the rest are worth an operator's attention.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            TailorError::Authentication(_)
                | TailorError::QuotaExceeded(_)
                | TailorError::Network(_)
                | TailorError::Upstream(_)
        )
    }
}

impl From<LlmError> for TailorError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => TailorError::Authentication(err.to_string()),
            LlmError::Rejected { .. } => TailorError::Authentication(err.to_string()),
            LlmError::Quota { .. } => TailorError::QuotaExceeded(err.to_string()),
            LlmError::Transport(_) => TailorError::Network(err.to_string()),
            LlmError::Api { .. } | LlmError::Decode(_) | LlmError::EmptyContent => {
                TailorError::Upstream(err.to_string())
            }
        }
    }
}

impl IntoResponse for TailorError {
    fn into_response(self) -> Response {
        if self.is_upstream() {
            tracing::error!("{self}");
        }
        (self.status(), Html(render::error_page(&self))).into_response()
    }
}
