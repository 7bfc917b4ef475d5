use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use super::MessageResponseData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Revoke the token that authenticated this request.
pub async fn revoke(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<MessageResponseData> {
    state.authenticator.revoke(&user.token);

    tracing::info!(account_id = %user.account_id, "Token revoked");

    ApiSuccess::new(
        StatusCode::OK,
        MessageResponseData {
            message: "Token revoked successfully".to_string(),
        },
    )
}
