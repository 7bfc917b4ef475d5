use axum::body::Body;
use axum::extract::Path;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Extension;

use super::ApiError;
use crate::file::models::FileId;
use crate::file::models::StoredFile;
use crate::file::ports::FileServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Serve a file to its owner.
pub async fn get_file(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(file_id): Path<String>,
) -> Result<Response, ApiError> {
    let file_id = parse_file_id(&file_id)?;

    let file = state
        .file_service
        .get_owned_file(&file_id, &user.account_id)
        .await?;

    Ok(file_response(file))
}

/// Serve a file to anyone. Only routed when public files are enabled.
pub async fn get_public_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Response, ApiError> {
    let file_id = parse_file_id(&file_id)?;

    let file = state.file_service.get_public_file(&file_id).await?;

    Ok(file_response(file))
}

fn parse_file_id(raw: &str) -> Result<FileId, ApiError> {
    raw.parse::<i64>()
        .map(FileId)
        .map_err(|_| ApiError::BadRequest("Invalid file ID".to_string()))
}

fn file_response(file: StoredFile) -> Response {
    let mut headers = HeaderMap::new();

    let content_type = HeaderValue::from_str(&file.metadata.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);

    // Stored names are sanitized, so they are always valid header text.
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("inline; filename=\"{}\"", file.metadata.filename))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }

    (headers, Body::from(file.contents)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_id() {
        assert_eq!(parse_file_id("42"), Ok(FileId(42)));
        assert_eq!(
            parse_file_id("abc"),
            Err(ApiError::BadRequest("Invalid file ID".to_string()))
        );
        assert!(parse_file_id("").is_err());
    }
}
