//! Export download handlers

use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use bookcraft_core::{ExportArtifact, ExportError, ExportFormat};
use uuid::Uuid;

/// Header carrying the authenticated user
pub const OWNER_HEADER: &str = "x-user-id";

type HandlerResult = Result<Response, (StatusCode, String)>;

/// Download the project as a single HTML page
pub async fn export_html(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> HandlerResult {
    export(state, &id, &headers, ExportFormat::Html).await
}

/// Download the project as PDF
pub async fn export_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> HandlerResult {
    export(state, &id, &headers, ExportFormat::Pdf).await
}

/// Download the project as DOCX
pub async fn export_docx(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> HandlerResult {
    export(state, &id, &headers, ExportFormat::Docx).await
}

async fn export(state: AppState, id: &str, headers: &HeaderMap, format: ExportFormat) -> HandlerResult {
    let owner = owner_from(headers)?;
    let id = Uuid::parse_str(id)
        .map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid project id: {}", id)))?;

    let artifact = match format {
        ExportFormat::Html => state.exports.export_html(id, &owner).await,
        ExportFormat::Pdf => state.exports.export_pdf(id, &owner).await,
        ExportFormat::Docx => state.exports.export_docx(id, &owner).await,
    }
    .map_err(|e| {
        let status = status_for(&e);
        if status.is_server_error() {
            tracing::error!(project = %id, ?format, "Export failed: {}", e);
        }
        (status, e.to_string())
    })?;

    attachment(artifact)
}

fn owner_from(headers: &HeaderMap) -> Result<String, (StatusCode, String)> {
    headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Missing user".to_string()))
}

/// HTTP status for an export failure
pub fn status_for(err: &ExportError) -> StatusCode {
    match err {
        ExportError::NotFound(_) => StatusCode::NOT_FOUND,
        ExportError::Render(_) | ExportError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn attachment(artifact: ExportArtifact) -> HandlerResult {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        )
        .body(Body::from(artifact.bytes))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookcraft_core::RenderError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ExportError::NotFound("p".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ExportError::Render(RenderError::EncodingFailed("zip".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_owner_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(owner_from(&headers).unwrap_err().0, StatusCode::UNAUTHORIZED);
        headers.insert(OWNER_HEADER, "  ".parse().unwrap());
        assert!(owner_from(&headers).is_err());
        headers.insert(OWNER_HEADER, "alice".parse().unwrap());
        assert_eq!(owner_from(&headers).unwrap(), "alice");
    }
}
