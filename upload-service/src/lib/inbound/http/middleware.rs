use std::fmt;

use axum::body::Body;
use axum::body::Bytes;
use axum::extract::FromRequest;
use axum::extract::Multipart;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::Extensions;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Form;
use serde::Deserialize;

use super::handlers::ApiError;
use crate::account::models::AccountId;
use crate::inbound::http::router::AppState;
use crate::inbound::http::router::MULTIPART_OVERHEAD_BYTES;

/// Extension type to store the authenticated account in request extensions
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub account_id: AccountId,
    pub username: String,
    /// The token that authenticated this request, needed for revocation
    pub token: String,
}

impl fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("account_id", &self.account_id)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenField {
    #[serde(default)]
    token: Option<String>,
}

/// Middleware that runs the authentication gate and adds the account to
/// request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let body_limit = usize::try_from(state.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let (mut req, token) = extract_token(req, body_limit).await?;

    let identity = state
        .authenticator
        .authenticate(token.as_deref())
        .map_err(|e| {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                "Authentication rejected: {}",
                e
            );
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        account_id: AccountId(identity.user_id),
        username: identity.username,
        token: token.unwrap_or_default(),
    });

    Ok(next.run(req).await)
}

/// Find the session token for a request.
///
/// Looks at the `Authorization: Bearer` header, then a `token` query
/// parameter, then a `token` field in a urlencoded or multipart body. When
/// the body has to be inspected it is buffered and put back, so handlers
/// still see the full request.
pub async fn extract_token(
    req: Request,
    body_limit: usize,
) -> Result<(Request, Option<String>), Response> {
    if let Some(token) = bearer_token(&req) {
        return Ok((req, Some(token)));
    }

    if let Some(token) = query_token(&req) {
        return Ok((req, Some(token)));
    }

    let content_type = match req.headers().get(header::CONTENT_TYPE) {
        Some(value) if is_form_content_type(value) => value.clone(),
        _ => return Ok((req, None)),
    };

    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, body_limit).await.map_err(|_| {
        ApiError::PayloadTooLarge("Request body too large".to_string()).into_response()
    })?;

    let token = body_token(&content_type, &parts.extensions, bytes.clone()).await;

    Ok((Request::from_parts(parts, Body::from(bytes)), token))
}

fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn query_token(req: &Request) -> Option<String> {
    Query::<TokenField>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(field)| field.token)
        .filter(|token| !token.is_empty())
}

fn is_form_content_type(value: &HeaderValue) -> bool {
    value
        .to_str()
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value.starts_with("application/x-www-form-urlencoded")
                || value.starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}

async fn body_token(
    content_type: &HeaderValue,
    extensions: &Extensions,
    bytes: Bytes,
) -> Option<String> {
    // Extensions carry the route's body limit for the extractors below.
    let mut probe = Request::builder()
        .method("POST")
        .header(header::CONTENT_TYPE, content_type.clone())
        .body(Body::from(bytes))
        .ok()?;
    *probe.extensions_mut() = extensions.clone();

    let is_multipart = content_type
        .to_str()
        .map(|value| value.to_ascii_lowercase().starts_with("multipart/"))
        .unwrap_or(false);

    let token = if is_multipart {
        multipart_token(probe).await
    } else {
        Form::<TokenField>::from_request(probe, &())
            .await
            .ok()
            .and_then(|Form(field)| field.token)
    };

    token.filter(|token| !token.is_empty())
}

async fn multipart_token(probe: Request) -> Option<String> {
    let mut multipart = Multipart::from_request(probe, &()).await.ok()?;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("token") {
            return field.text().await.ok().map(|token| token.trim().to_string());
        }
    }

    None
}
