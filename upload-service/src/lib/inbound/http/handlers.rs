use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::file::errors::FileError;

pub mod get_file;
pub mod index;
pub mod login;
pub mod register;
pub mod revoke;
pub mod upload_file;

/// Successful JSON response with an explicit status code
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Error response rendered as `{"error": message}`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidUsername(_) => {
                ApiError::BadRequest("Username and password are required".to_string())
            }
            AccountError::InvalidPassword(e) => ApiError::BadRequest(e.to_string()),
            AccountError::DuplicateUsername(_) => {
                ApiError::Conflict("Username already exists".to_string())
            }
            AccountError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AccountError::NotFound(_) | AccountError::NotFoundByUsername(_) => {
                ApiError::NotFound(err.to_string())
            }
            AccountError::Password(_) | AccountError::DatabaseError(_) => {
                tracing::error!("Account operation failed: {}", err);
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<auth::AuthenticationError> for ApiError {
    fn from(err: auth::AuthenticationError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<auth::TokenError> for ApiError {
    fn from(err: auth::TokenError) -> Self {
        tracing::error!("Token generation failed: {}", err);
        ApiError::InternalServerError("Failed to generate token".to_string())
    }
}

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound(_) => ApiError::NotFound("File not found".to_string()),
            FileError::AccessDenied(_) => ApiError::Forbidden("Access denied".to_string()),
            FileError::MissingOnDisk(_) => {
                ApiError::NotFound("File not found on disk".to_string())
            }
            FileError::UnsupportedContentType(_) => ApiError::BadRequest(
                "File must be an image (JPEG, PNG, GIF, WebP, BMP, TIFF, SVG)".to_string(),
            ),
            FileError::TooLarge { max, .. } => {
                ApiError::PayloadTooLarge(format!("File size exceeds {} bytes limit", max))
            }
            FileError::DatabaseError(_) | FileError::Io(_) => {
                tracing::error!("File operation failed: {}", err);
                ApiError::InternalServerError("Failed to save file".to_string())
            }
        }
    }
}

/// Username and password as posted to register and login.
///
/// Missing fields deserialize as empty strings so both cases get the same
/// "required" message.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsRequest {
    fn require_fields(&self) -> Result<(), ApiError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ApiError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountData {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.as_i64(),
            username: account.username.as_str().to_string(),
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub token: String,
    pub user: AccountData,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponseData {
    pub message: String,
}
