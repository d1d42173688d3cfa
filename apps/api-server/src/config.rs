//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use folio_infra::DatabaseConfig;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where uploaded images are written and how they are addressed.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    /// Route prefix the directory is served under, e.g. `/images`.
    pub public_path: String,
    /// Optional scheme and host prefixed to image URLs.
    pub public_base_url: String,
}

impl UploadConfig {
    /// Prefix for image URLs handed back to clients.
    pub fn base_url(&self) -> String {
        format!(
            "{}{}",
            self.public_base_url.trim_end_matches('/'),
            self.public_path
        )
    }
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// `*` (or nothing usable) means any origin; otherwise a comma-separated list.
    fn parse(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return Self::Any;
        };
        let origins: Vec<String> = raw
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            Self::Any
        } else {
            Self::List(origins)
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub auto_migrate: bool,
    pub uploads: UploadConfig,
    pub cors_origins: CorsOrigins,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = Self::database(&get)?.map(|url| {
            let mut db = DatabaseConfig::new(url);
            if let Some(max) = get("DB_MAX_CONNECTIONS").and_then(|s| s.parse().ok()) {
                db.max_connections = max;
            }
            if let Some(min) = get("DB_MIN_CONNECTIONS").and_then(|s| s.parse().ok()) {
                db.min_connections = min;
            }
            db
        });

        let public_path = get("IMAGES_PUBLIC_PATH").unwrap_or_else(|| "/images".to_string());
        let public_path = format!("/{}", public_path.trim_matches('/'));

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: match get("PORT") {
                Some(port) => parse_port("PORT", port)?,
                None => 8080,
            },
            database,
            auto_migrate: get("DB_AUTO_MIGRATE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            uploads: UploadConfig {
                dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string())),
                public_path,
                public_base_url: get("PUBLIC_BASE_URL").unwrap_or_default(),
            },
            cors_origins: CorsOrigins::parse(get("CORS_ALLOWED_ORIGINS")),
        })
    }

    /// Database URL: `DATABASE_URL` wins, else assembled from `DB_*` parts.
    /// `None` when neither is present.
    fn database<G>(get: &G) -> Result<Option<String>, ConfigError>
    where
        G: Fn(&str) -> Option<String>,
    {
        if let Some(url) = get("DATABASE_URL") {
            return Ok(Some(url));
        }
        let Some(host) = get("DB_HOST") else {
            return Ok(None);
        };

        let port = match get("DB_PORT") {
            Some(port) => parse_port("DB_PORT", port)?,
            None => 5432,
        };
        let user = get("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
        let password = get("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?;
        let name = get("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
        let ssl_mode = get("DB_SSL_MODE").unwrap_or_else(|| "disable".to_string());

        Ok(Some(DatabaseConfig::postgres_url(
            &host, port, &user, &password, &name, &ssl_mode,
        )))
    }
}

fn parse_port(name: &'static str, value: String) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        expected: "a port number",
        value,
    })
}
