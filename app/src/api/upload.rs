//! POST /api/upload - Store an event image with the configured provider.

use crate::auth::middleware::SessionUser;
use crate::media::UploadError;
use crate::metrics;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use eventbook_web::{AppError, JsonBody};
use serde::{Deserialize, Serialize};

/// Upload request sent by the admin UI.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Image as a data URI (`data:image/png;base64,...`) or remote URL
    pub file: Option<String>,
    /// Original file name, for logging only
    pub filename: Option<String>,
}

/// Response after a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Success message
    pub message: String,
    /// HTTPS URL to store as the event's `imageUrl`
    pub url: String,
    /// Provider-side identifier
    pub public_id: String,
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NotConfigured => Self::unavailable(err.to_string()),
            UploadError::InvalidFile => Self::bad_request(err.to_string()),
            UploadError::RequestFailed(_) | UploadError::Rejected { .. } => {
                Self::bad_gateway("Error uploading file").with_source(err)
            }
        }
    }
}

/// Upload an image.
///
/// # Errors
///
/// - 400 if no file is provided or it is not a data URI / URL
/// - 401 without a valid session
/// - 502 if the provider fails
/// - 503 if uploads are not configured
pub async fn upload_image(
    State(state): State<AppState>,
    session: SessionUser,
    JsonBody(request): JsonBody<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let file = request
        .file
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("No file provided"))?;

    let result = state.uploader.upload(file, state.clock.now()).await;
    metrics::record_upload(result.is_ok());

    let image = result.inspect_err(|e| {
        tracing::warn!(
            user_id = %session.user_id,
            filename = request.filename.as_deref().unwrap_or_default(),
            error = %e,
            "Image upload failed"
        );
    })?;

    tracing::info!(
        user_id = %session.user_id,
        public_id = %image.public_id,
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        message: "Upload successful".to_string(),
        url: image.url,
        public_id: image.public_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn upload_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(UploadError::NotConfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(UploadError::InvalidFile).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(UploadError::Rejected {
                status: 401,
                message: "Invalid Signature".to_string()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
