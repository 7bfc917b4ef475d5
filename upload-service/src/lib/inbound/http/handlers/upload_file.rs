use std::net::SocketAddr;

use axum::extract::multipart::MultipartError;
use axum::extract::ConnectInfo;
use axum::extract::Multipart;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::file::models::FileMetadata;
use crate::file::models::UploadFileCommand;
use crate::file::ports::FileServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "data";

/// Accept one image upload for the authenticated account.
///
/// Fields other than `data` (such as a `token` used for authentication)
/// are ignored.
pub async fn upload_file(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<ApiSuccess<UploadResponseData>, ApiError> {
    let max_size = state.max_upload_bytes;
    let multipart_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!("File size exceeds {} bytes limit", max_size))
        } else {
            ApiError::BadRequest("Failed to parse multipart form".to_string())
        }
    };

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        upload = Some((filename, content_type, data.to_vec()));
        break;
    }

    let (filename, content_type, data) = upload.ok_or_else(|| {
        ApiError::BadRequest("No file provided or invalid file field name".to_string())
    })?;

    let command = UploadFileCommand {
        owner: user.account_id,
        filename,
        content_type,
        data,
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        remote_addr: client_address(&headers, connect_info.map(|ConnectInfo(addr)| addr)),
    };

    let metadata = state.file_service.upload(command).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        UploadResponseData {
            message: "File uploaded successfully".to_string(),
            file_id: metadata.id.as_i64(),
            metadata: FileMetadataData::from(&metadata),
        },
    ))
}

/// Best-effort client address: first `X-Forwarded-For` entry, then
/// `X-Real-IP`, then the socket peer.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(forwarded) = header_value("x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            return first.trim().to_string();
        }
    }

    if let Some(real_ip) = header_value("x-real-ip") {
        return real_ip.to_string();
    }

    peer.map(|addr| addr.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResponseData {
    pub message: String,
    pub file_id: i64,
    pub metadata: FileMetadataData,
}

/// Public view of file metadata. The server-side path is not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadataData {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub content_type: String,
    pub size: i64,
    pub user_agent: String,
    pub remote_addr: String,
    pub created_at: DateTime<Utc>,
}

impl From<&FileMetadata> for FileMetadataData {
    fn from(metadata: &FileMetadata) -> Self {
        Self {
            id: metadata.id.as_i64(),
            user_id: metadata.owner.as_i64(),
            filename: metadata.filename.clone(),
            content_type: metadata.content_type.clone(),
            size: metadata.size,
            user_agent: metadata.user_agent.clone(),
            remote_addr: metadata.remote_addr.clone(),
            created_at: metadata.created_at,
        }
    }
}
