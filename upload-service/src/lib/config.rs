use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Serve `GET /public/files/:id` without authentication
    pub public_files: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`
    pub path: String,
    pub max_connections: u32,
}

#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Option<String>,
    /// Session lifetime. Also bounds how long revocations are remembered.
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub dir: String,
    pub max_size_bytes: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl JwtConfig {
    /// Used when no secret is configured. Anyone can forge tokens with it.
    pub const DEVELOPMENT_SECRET: &'static str = "insecure-development-secret-change-me";

    /// One hundred years.
    pub const MAX_EXPIRATION_HOURS: i64 = 100 * 365 * 24;

    pub fn uses_development_secret(&self) -> bool {
        self.secret.as_deref().map_or(true, str::is_empty)
    }

    pub fn signing_secret(&self) -> &[u8] {
        match self.secret.as_deref() {
            Some(secret) if !secret.is_empty() => secret.as_bytes(),
            _ => Self::DEVELOPMENT_SECRET.as_bytes(),
        }
    }

    pub fn session_lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(self.expiration_hours)
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (UPLOADER_JWT__SECRET, UPLOADER_SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 8080)?
            .set_default("server.public_files", false)?
            .set_default("database.path", "./app.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_hours", 24)?
            .set_default("uploads.dir", "/tmp")?
            .set_default("uploads.max_size_bytes", 8 * 1024 * 1024)?
            .set_default("password.min_length", 6)?
            .set_default("password.memory_kib", argon2_defaults::MEMORY_KIB)?
            .set_default("password.iterations", argon2_defaults::ITERATIONS)?
            .set_default("password.parallelism", argon2_defaults::PARALLELISM)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: UPLOADER_JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::with_prefix("UPLOADER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }
        if self.jwt.expiration_hours > JwtConfig::MAX_EXPIRATION_HOURS {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be at most {}",
                JwtConfig::MAX_EXPIRATION_HOURS
            )));
        }
        if self.password.min_length == 0 {
            return Err(ConfigError::Message(
                "password.min_length must be at least 1".to_string(),
            ));
        }
        if self.uploads.max_size_bytes == 0 {
            return Err(ConfigError::Message(
                "uploads.max_size_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Argon2id cost recommended by the argon2 crate.
mod argon2_defaults {
    pub const MEMORY_KIB: u32 = 19 * 1024;
    pub const ITERATIONS: u32 = 2;
    pub const PARALLELISM: u32 = 1;
}
