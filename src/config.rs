// src/config.rs

//! Runtime configuration from environment variables.
//!
//! `main` loads a `.env` file first (via `dotenv`), so every key below can
//! live there too.

use std::env;
use std::path::PathBuf;

const DEFAULT_MEDIA_ROOT: &str = "./videos";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_STATIC_DIR: &str = "./static";
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:4200";
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 << 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of bytes, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub media_root: PathBuf,
    pub bind_address: String,
    pub static_dir: PathBuf,
    pub credentials: Credentials,
    pub cors_allowed_origin: String,
    pub max_upload_bytes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or blank keys fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES").filter(|v| !v.trim().is_empty()) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "MAX_UPLOAD_BYTES",
                    value,
                })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Config {
            media_root: PathBuf::from(get("MEDIA_ROOT", DEFAULT_MEDIA_ROOT)),
            bind_address: get("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            static_dir: PathBuf::from(get("STATIC_DIR", DEFAULT_STATIC_DIR)),
            credentials: Credentials {
                username: get("AUTH_USERNAME", DEFAULT_USERNAME),
                password: get("AUTH_PASSWORD", DEFAULT_PASSWORD),
            },
            cors_allowed_origin: get("CORS_ALLOWED_ORIGIN", DEFAULT_CORS_ORIGIN),
            max_upload_bytes,
        })
    }
}
