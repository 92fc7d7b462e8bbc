//! Configuration module
//!
//! Configuration is read once at process start from the environment (and an
//! optional `.env` file) and treated as immutable afterwards. It is passed
//! explicitly into the services that need it.

use std::env;
use std::path::{Path, PathBuf};

/// Default destination directory, relative to the working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "./upload";
/// Default hard upload limit: 500 MiB.
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 500 * 1024 * 1024;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub host: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
}

/// Upload storage configuration
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub upload_dir: PathBuf,
    pub max_file_size_bytes: u64,
    /// Remove leftover staging files from the upload directory on startup.
    pub sweep_stale_uploads: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub uploads: UploadSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let max_file_size_bytes = match lookup("MAX_FILE_SIZE_BYTES") {
            Some(limit) => limit
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be a valid number"))?,
            None => DEFAULT_MAX_FILE_SIZE_BYTES,
        };

        let http_concurrency_limit = lookup("HTTP_CONCURRENCY_LIMIT")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(HTTP_CONCURRENCY_LIMIT)
            .max(1);

        let sweep_stale_uploads = lookup("SWEEP_STALE_UPLOADS")
            .map(|s| parse_bool(&s))
            .unwrap_or(true);

        let config = Config {
            base: BaseConfig {
                host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                server_port,
                cors_origins,
                environment,
                http_concurrency_limit,
            },
            uploads: UploadSettings {
                upload_dir: PathBuf::from(
                    lookup("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
                ),
                max_file_size_bytes,
                sweep_stale_uploads,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.uploads.upload_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR must not be empty"));
        }

        if self.uploads.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_BYTES must be greater than zero"
            ));
        }

        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn host(&self) -> &str {
        &self.base.host
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn upload_dir(&self) -> &Path {
        &self.uploads.upload_dir
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.uploads.max_file_size_bytes
    }

    pub fn sweep_stale_uploads(&self) -> bool {
        self.uploads.sweep_stale_uploads
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
