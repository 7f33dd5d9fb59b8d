//! Configuration module
//!
//! Configuration is read once at startup from the environment (with `.env`
//! support) and handed to the HTTP layer as an explicit value.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const MAX_FILE_SIZE_MB: usize = 10;
const NAME_BYTES: usize = 3;
const NAME_ATTEMPTS: u32 = 3;
const MIN_NAME_BYTES: usize = 3;
const MAX_NAME_BYTES: usize = 16;

/// Room for multipart boundaries and part headers on top of the file itself
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Parse an optional numeric variable. Unset or blank yields `default`; anything
/// unparsable is an error.
fn parse_var<T: FromStr>(
    key: &str,
    value: Option<String>,
    default: T,
) -> Result<T, anyhow::Error> {
    match value.filter(|s| !s.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub upload_dir: PathBuf,
    pub max_file_size_bytes: usize,
    /// Random bytes per stored name; each byte renders as two hex characters.
    pub name_bytes: usize,
    /// Fresh names tried when an exclusive create finds the name taken.
    pub name_attempts: u32,
    pub public_base_url: Option<String>,
    pub trust_proxy: bool,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (environment, test maps).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = parse_var("PORT", lookup("PORT"), DEFAULT_PORT)?;

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = parse_var(
            "MAX_FILE_SIZE_MB",
            lookup("MAX_FILE_SIZE_MB"),
            MAX_FILE_SIZE_MB,
        )?;
        let max_file_size_bytes = max_file_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?;

        let config = Config {
            server_port,
            upload_dir: lookup("UPLOAD_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_file_size_bytes,
            name_bytes: parse_var("UPLOAD_NAME_BYTES", lookup("UPLOAD_NAME_BYTES"), NAME_BYTES)?,
            name_attempts: parse_var(
                "UPLOAD_NAME_ATTEMPTS",
                lookup("UPLOAD_NAME_ATTEMPTS"),
                NAME_ATTEMPTS,
            )?,
            public_base_url: lookup("PUBLIC_BASE_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            trust_proxy: lookup("TRUST_PROXY")
                .map(|s| s.trim().to_lowercase())
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
            cors_origins,
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    /// Default configuration storing files under `upload_dir`.
    pub fn for_upload_dir(upload_dir: impl AsRef<Path>) -> Self {
        Config {
            server_port: DEFAULT_PORT,
            upload_dir: upload_dir.as_ref().to_path_buf(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            name_bytes: NAME_BYTES,
            name_attempts: NAME_ATTEMPTS,
            public_base_url: None,
            trust_proxy: false,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        self.body_limit_bytes()?;

        if !(MIN_NAME_BYTES..=MAX_NAME_BYTES).contains(&self.name_bytes) {
            return Err(anyhow::anyhow!(
                "UPLOAD_NAME_BYTES must be between {} and {}",
                MIN_NAME_BYTES,
                MAX_NAME_BYTES
            ));
        }

        if self.name_attempts == 0 {
            return Err(anyhow::anyhow!("UPLOAD_NAME_ATTEMPTS must be at least 1"));
        }

        if let Some(base) = &self.public_base_url {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(anyhow::anyhow!(
                    "PUBLIC_BASE_URL must start with http:// or https://"
                ));
            }
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    /// Request body limit for uploads: the file size plus multipart framing.
    pub fn body_limit_bytes(&self) -> Result<usize, anyhow::Error> {
        self.max_file_size_bytes
            .checked_add(MULTIPART_OVERHEAD_BYTES)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))
    }

    pub fn name_bytes(&self) -> usize {
        self.name_bytes
    }

    pub fn name_attempts(&self) -> u32 {
        self.name_attempts
    }

    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }

    pub fn trust_proxy(&self) -> bool {
        self.trust_proxy
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }
}
