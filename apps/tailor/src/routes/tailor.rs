//! Axum route handlers for the tailoring form.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::TailorError;
use crate::models::submission::{SessionInput, UploadedDocument};
use crate::pipeline::run_submission;
use crate::render::{form_page, FormValues, Notice};
use crate::state::AppState;

const PACKAGE_RULE_WIDTH: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub kind: String,
    pub resume: Option<String>,
    pub cover_letter: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_form() -> Html<String> {
    Html(form_page(&FormValues::default(), None))
}

/// POST /tailor
///
/// Runs the whole pipeline for one multipart submission and answers with the
/// form page, showing either the generated documents or the failure.
pub async fn handle_tailor(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut input = SessionInput::default();
    let received = read_submission(multipart, &mut input).await;
    let values = FormValues {
        job_description: input.job_description.clone(),
        notes: input.notes.clone(),
        format: input.format.clone(),
        template: input.template.clone(),
    };
    if let Err(error) = received {
        let html = form_page(&values, Some(Notice::Error(&error)));
        return (error.status(), Html(html)).into_response();
    }

    info!(
        "Submission: file='{}' ({} bytes), format='{}'",
        input.document.file_name,
        input.document.data.len(),
        input.format
    );

    match run_submission(state.generator.as_ref(), &input).await {
        Ok(completed) => {
            info!("Displaying {} output", completed.format);
            let html = form_page(&values, Some(Notice::Output(&completed)));
            (StatusCode::OK, Html(html)).into_response()
        }
        Err(failure) => {
            let html = form_page(&values, Some(Notice::Error(&failure.error)));
            (failure.error.status(), Html(html)).into_response()
        }
    }
}

/// POST /download
///
/// Echoes generated text back as a `.txt` attachment. Nothing is stored
/// server-side, so the page posts the text it is showing.
pub async fn handle_download(Form(request): Form<DownloadRequest>) -> Result<Response, TailorError> {
    let (file_name, body) = match request.kind.as_str() {
        "resume" => ("rewritten_resume.txt", require(request.resume, "resume")?),
        "cover_letter" => (
            "cover_letter.txt",
            require(request.cover_letter, "cover letter")?,
        ),
        "both" => (
            "application_package.txt",
            application_package(
                &require(request.resume, "resume")?,
                &require(request.cover_letter, "cover letter")?,
            ),
        ),
        other => {
            return Err(TailorError::InvalidFormat(format!(
                "'{other}' is not a downloadable document"
            )))
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Reads the multipart form into `input`, field by field. Fields read before a
/// failure stay filled so the form can be shown again with them.
async fn read_submission(
    mut multipart: Multipart,
    input: &mut SessionInput,
) -> Result<(), TailorError> {
    while let Some(field) = multipart.next_field().await.map_err(receive_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "document" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(receive_error)?;
                input.document = UploadedDocument { file_name, data };
            }
            "job_description" | "notes" | "format" | "template" => {
                let text = field.text().await.map_err(receive_error)?;
                match name.as_str() {
                    "job_description" => input.job_description = text,
                    "notes" => input.notes = text,
                    "format" => input.format = text,
                    _ => input.template = text,
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Broken or oversized multipart bodies leave nothing to read the document from.
fn receive_error(e: MultipartError) -> TailorError {
    TailorError::DocumentUnreadable(format!("the upload could not be received ({e})"))
}

fn require(text: Option<String>, field: &'static str) -> Result<String, TailorError> {
    text.filter(|t| !t.trim().is_empty())
        .ok_or(TailorError::MissingInput(field))
}

/// Resume and cover letter in one plain-text file.
pub fn application_package(resume: &str, cover_letter: &str) -> String {
    let rule = "=".repeat(PACKAGE_RULE_WIDTH);
    format!("RESUME\n{rule}\n\n{resume}\n\n\nCOVER LETTER\n{rule}\n\n{cover_letter}")
}
