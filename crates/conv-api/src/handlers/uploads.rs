//! Image upload handler

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use conv_service::{UploadResponse, UploadService};

use crate::extractors::AuthUser;
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Multipart field carrying the image
const FILE_FIELD: &str = "file";

/// Store the `file` part of a multipart body
///
/// POST /uploads/{kind}
pub async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(kind): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Created<Json<UploadResponse>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_body(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        let service = UploadService::new(state.service_context());
        let response = service
            .upload(auth.user_id, &kind, &content_type, &bytes)
            .await?;
        return Ok(Created(Json(response)));
    }

    Err(ApiError::invalid_body("Missing 'file' field"))
}
