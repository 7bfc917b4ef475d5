use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use super::CredentialsRequest;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::BadRequest("Invalid JSON payload".to_string()))?;
    body.require_fields()?;

    let account = state
        .account_service
        .login(&body.username, &body.password)
        .await
        .map_err(|e| {
            tracing::warn!(username = %body.username, "Login failed: {}", e);
            ApiError::from(e)
        })?;

    let token = state
        .authenticator
        .issue_token(account.id.as_i64(), account.username.as_str())?;

    tracing::info!(account_id = %account.id, "Login successful");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthResponseData {
            token,
            user: AccountData::from(&account),
            message: "Login successful".to_string(),
        },
    ))
}
