use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use super::CredentialsRequest;
use crate::account::errors::AccountError;
use crate::account::models::CreateAccountCommand;
use crate::account::models::Username;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::BadRequest("Invalid JSON payload".to_string()))?;
    body.require_fields()?;

    let username = Username::new(body.username).map_err(AccountError::from)?;
    let command = CreateAccountCommand::new(username, body.password);

    let account = state.account_service.create_account(command).await?;
    let token = state
        .authenticator
        .issue_token(account.id.as_i64(), account.username.as_str())?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        AuthResponseData {
            token,
            user: AccountData::from(&account),
            message: "User registered successfully".to_string(),
        },
    ))
}
