//! Axum route handlers for the Applications API.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::pipeline::{run_application, ApplicationOutcome};
use crate::posting::request::ApplicationMessage;
use crate::posting::ApplicationRequest;
use crate::state::AppState;

/// POST /api/v1/applications
///
/// Runs the full pipeline for the posting URL in `message`. Any other text in
/// the message is passed on as the candidate's notes.
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(body): Json<ApplicationMessage>,
) -> Result<Json<ApplicationOutcome>, AppError> {
    let request = ApplicationRequest::from_message(&body.message)?;
    info!("Application requested for {}", request.posting_url);

    let outcome = run_application(&state, request).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/artifacts/:file_name
///
/// Serves a generated `.pdf` or `.tex` from the output directory.
pub async fn handle_get_artifact(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    if file_name.is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
    {
        return Err(AppError::Validation(format!(
            "Invalid artifact name: {file_name}"
        )));
    }

    let content_type = match file_name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("pdf") => "application/pdf",
        Some("tex") => "application/x-tex",
        _ => return Err(AppError::NotFound(format!("Artifact {file_name} not found"))),
    };

    let path = state.compiler.output_dir().join(&file_name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("Artifact {file_name} not found")));
        }
        Err(e) => {
            return Err(AppError::Internal(
                anyhow::Error::new(e).context(format!("Failed to read {}", path.display())),
            ))
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
