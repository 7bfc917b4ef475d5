use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use upload_service::account::models::PasswordPolicy;
use upload_service::config::Config;
use upload_service::domain::account::service::AccountService;
use upload_service::domain::file::models::UploadPolicy;
use upload_service::domain::file::service::FileService;
use upload_service::inbound::http::router::create_router;
use upload_service::inbound::http::router::RouterOptions;
use upload_service::outbound::database;
use upload_service::outbound::repositories::SqliteAccountRepository;
use upload_service::outbound::repositories::SqliteFileRepository;
use upload_service::outbound::storage::LocalFileStorage;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upload_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "upload-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        database_path = %config.database.path,
        http_port = config.server.http_port,
        upload_dir = %config.uploads.dir,
        max_upload_bytes = config.uploads.max_size_bytes,
        session_hours = config.jwt.expiration_hours,
        public_files = config.server.public_files,
        "Configuration loaded"
    );

    if config.jwt.uses_development_secret() {
        tracing::warn!(
            "No jwt.secret configured, using the built-in development secret. \
             Set UPLOADER_JWT__SECRET before exposing this service."
        );
    }

    if config.database.path != ":memory:" {
        if let Some(parent) = Path::new(&config.database.path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
    }
    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    let pool = database::connect(&config.database).await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "sqlite",
        "Database connection pool created"
    );

    database::migrate(&pool).await?;
    tracing::info!(database = "sqlite", "Database migrations completed");

    let password_hasher = PasswordHasher::with_cost(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;

    let account_service = Arc::new(AccountService::new(
        Arc::new(SqliteAccountRepository::new(pool.clone())),
        password_hasher,
        PasswordPolicy::new(config.password.min_length),
    ));

    let file_service = Arc::new(FileService::new(
        Arc::new(SqliteFileRepository::new(pool)),
        Arc::new(LocalFileStorage::new(&config.uploads.dir)),
        UploadPolicy::new(config.uploads.max_size_bytes),
    ));

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.signing_secret(),
        config.jwt.session_lifetime(),
    ));

    let application = create_router(
        account_service,
        file_service,
        authenticator,
        RouterOptions {
            max_upload_bytes: config.uploads.max_size_bytes,
            public_files: config.server.public_files,
        },
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(
        listener,
        application.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
