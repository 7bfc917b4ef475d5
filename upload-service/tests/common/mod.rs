#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use chrono::Duration;
use sqlx::SqlitePool;
use upload_service::account::models::PasswordPolicy;
use upload_service::config::DatabaseConfig;
use upload_service::domain::account::service::AccountService;
use upload_service::domain::file::models::UploadPolicy;
use upload_service::domain::file::service::FileService;
use upload_service::inbound::http::router::create_router;
use upload_service::inbound::http::router::RouterOptions;
use upload_service::outbound::database;
use upload_service::outbound::repositories::SqliteAccountRepository;
use upload_service::outbound::repositories::SqliteFileRepository;
use upload_service::outbound::storage::LocalFileStorage;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_MAX_UPLOAD_BYTES: u64 = 64 * 1024;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: TestDb,
    pub upload_dir: PathBuf,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

/// Test database helper backed by a throwaway sqlite file
pub struct TestDb {
    pub pool: SqlitePool,
    pub path: PathBuf,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(RouterOptions {
            max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
            public_files: false,
        })
        .await
    }

    pub async fn spawn_with(options: RouterOptions) -> Self {
        let db = TestDb::new().await;

        let upload_dir =
            std::env::temp_dir().join(format!("upload-service-files-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&upload_dir).expect("Failed to create upload directory");

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap hashing parameters keep the suite fast
        let password_hasher =
            PasswordHasher::with_cost(1024, 1, 1).expect("Failed to build password hasher");

        let account_service = Arc::new(AccountService::new(
            Arc::new(SqliteAccountRepository::new(db.pool.clone())),
            password_hasher,
            PasswordPolicy::default(),
        ));

        let file_service = Arc::new(FileService::new(
            Arc::new(SqliteFileRepository::new(db.pool.clone())),
            Arc::new(LocalFileStorage::new(&upload_dir)),
            UploadPolicy::new(options.max_upload_bytes),
        ));

        let authenticator = Arc::new(Authenticator::new(TEST_SECRET, Duration::hours(24)));

        let router = create_router(
            account_service,
            file_service,
            Arc::clone(&authenticator),
            options,
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Server error");
        });

        Self {
            address,
            port,
            db,
            upload_dir,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register an account and return its session token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/v1/register")
            .json(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Missing token in response")
            .to_string()
    }

    /// Multipart form with one image part named `data`
    pub fn image_form(filename: &str, content_type: &str, bytes: Vec<u8>) -> reqwest::multipart::Form {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .expect("Invalid mime type");

        reqwest::multipart::Form::new().part("data", part)
    }

    /// Upload a small PNG for `token` and return the new file id
    pub async fn upload_png(&self, token: &str) -> i64 {
        let response = self
            .post_authenticated("/api/v1/upload", token)
            .multipart(Self::image_form("cat.png", "image/png", PNG_BYTES.to_vec()))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["file_id"].as_i64().expect("Missing file_id in response")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

impl TestDb {
    /// Create a new migrated sqlite database with a unique file name
    pub async fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "upload-service-test-{}.db",
            uuid::Uuid::new_v4()
        ));

        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            max_connections: 5,
        };

        let pool = database::connect(&config)
            .await
            .expect("Failed to connect to test database");

        database::migrate(&pool)
            .await
            .expect("Failed to run migrations");

        Self { pool, path }
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Smallest valid PNG: 1x1 transparent pixel
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];
