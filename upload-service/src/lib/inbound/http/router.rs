use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_file::get_file;
use super::handlers::get_file::get_public_file;
use super::handlers::index::index;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::revoke::revoke;
use super::handlers::upload_file::upload_file;
use super::middleware::authenticate as auth_middleware;
use crate::domain::account::service::AccountService;
use crate::domain::file::service::FileService;
use crate::outbound::repositories::SqliteAccountRepository;
use crate::outbound::repositories::SqliteFileRepository;
use crate::outbound::storage::LocalFileStorage;

/// Extra room for multipart framing on top of the file size limit
pub(crate) const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService<SqliteAccountRepository>>,
    pub file_service: Arc<FileService<SqliteFileRepository, LocalFileStorage>>,
    pub authenticator: Arc<Authenticator>,
    pub max_upload_bytes: u64,
}

/// Options that change which routes are mounted and how large bodies may be.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    pub max_upload_bytes: u64,
    pub public_files: bool,
}

pub fn create_router(
    account_service: Arc<AccountService<SqliteAccountRepository>>,
    file_service: Arc<FileService<SqliteFileRepository, LocalFileStorage>>,
    authenticator: Arc<Authenticator>,
    options: RouterOptions,
) -> Router {
    let state = AppState {
        account_service,
        file_service,
        authenticator,
        max_upload_bytes: options.max_upload_bytes,
    };

    let upload_body_limit = usize::try_from(options.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let mut public_routes = Router::new()
        .route("/", get(index))
        .route("/api/v1/register", post(register))
        .route("/api/v1/login", post(login));

    if options.public_files {
        public_routes = public_routes.route("/public/files/:file_id", get(get_public_file));
    }

    let protected_routes = Router::new()
        .route("/api/v1/revoke", post(revoke))
        .route("/api/v1/upload", post(upload_file))
        .route("/files/:file_id", get(get_file))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        // Outside the gate so the limit also applies while it looks for a
        // token in the body.
        .layer(DefaultBodyLimit::max(upload_body_limit));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
