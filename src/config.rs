//! Application configuration module
//!
//! Builds a single [`Settings`] value from environment variables at startup.
//! Every adapter receives the section it needs by reference; nothing else in
//! the crate reads the process environment.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// Bounds applied to the relational connection pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Maximum number of physical connections
    pub max_size: usize,
    /// Requests allowed to wait for a connection once all are checked out
    pub queue_limit: usize,
    /// How long a waiting request may block before giving up
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_size: 10,
            queue_limit: 50,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// Relational (PostgreSQL) configuration
#[derive(Debug, Clone, Validate)]
pub struct RelationalConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database the pool connects to
    pub database: String,
    /// Namespace holding the product table, created by `POST /init-db`
    #[validate(length(min = 1, max = 63, message = "DB_NAME must be between 1 and 63 characters"))]
    #[validate(custom(function = "validate_identifier"))]
    pub schema: String,
    pub ssl: bool,
    pub pool: PoolSettings,
}

impl Default for RelationalConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            schema: "loja".to_string(),
            ssl: false,
            pool: PoolSettings::default(),
        }
    }
}

/// Document store (MongoDB) configuration
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    pub uri: String,
    /// Falls back to the URI's default database, then `test`
    pub database: Option<String>,
    pub collection: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: None,
            collection: "usuarios".to_string(),
        }
    }
}

/// Object storage (S3) configuration
#[derive(Clone)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
    /// Custom endpoint for S3-compatible services; enables path-style addressing
    pub endpoint: Option<String>,
    pub max_upload_bytes: usize,
}

impl StorageConfig {
    pub fn has_credentials(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: None,
            region: "us-east-1".to_string(),
            endpoint: None,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

// Keeps secrets out of startup logs.
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"****")
            .field("session_token", &self.session_token.as_ref().map(|_| "****"))
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

/// CORS configuration; no origins means any origin
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub relational: RelationalConfig,
    pub document: DocumentConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
}

impl Settings {
    /// Load settings from the process environment (and `.env` if present)
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: env.parsed("HOST")?.unwrap_or(server_defaults.host),
            port: env.parsed("PORT")?.unwrap_or(server_defaults.port),
        };

        let relational = Self::relational(&env)?;
        relational.validate()?;

        let document_defaults = DocumentConfig::default();
        let document = DocumentConfig {
            uri: env.string("MONGODB_URI").unwrap_or(document_defaults.uri),
            database: env.string("MONGODB_DATABASE"),
            collection: env
                .string("MONGODB_COLLECTION")
                .unwrap_or(document_defaults.collection),
        };

        let storage_defaults = StorageConfig::default();
        let storage = StorageConfig {
            access_key_id: env.string("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: env.string("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            session_token: env.string("AWS_SESSION_TOKEN"),
            region: env.string("AWS_REGION").unwrap_or(storage_defaults.region),
            endpoint: env.string("S3_ENDPOINT"),
            max_upload_bytes: env
                .parsed("UPLOAD_MAX_BYTES")?
                .unwrap_or(storage_defaults.max_upload_bytes),
        };

        let cors = CorsConfig {
            allowed_origins: env
                .string("ALLOWED_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
        };

        Ok(Self {
            server,
            relational,
            document,
            storage,
            cors,
        })
    }

    /// `DATABASE_URL` wins over the individual `DB_*` variables for the
    /// connection itself; schema and pool bounds always come from `DB_*`.
    fn relational<F>(env: &Env<F>) -> Result<RelationalConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RelationalConfig::default();
        let mut config = match env.string("DATABASE_URL") {
            Some(url) => Self::parse_database_url(&url)?,
            None => RelationalConfig {
                host: env.string("DB_HOST").unwrap_or(defaults.host),
                port: env.parsed("DB_PORT")?.unwrap_or(defaults.port),
                user: env.string("DB_USER").unwrap_or(defaults.user),
                password: env.string("DB_PASSWORD").unwrap_or_default(),
                database: env.string("DB_DATABASE").unwrap_or(defaults.database),
                ..RelationalConfig::default()
            },
        };

        config.schema = env.string("DB_NAME").unwrap_or(defaults.schema);
        config.ssl = config.ssl
            || env
                .string("DB_SSL")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "require"))
                .unwrap_or(false);

        let pool_defaults = PoolSettings::default();
        config.pool = PoolSettings {
            max_size: env.parsed("DB_MAX_CONNECTIONS")?.unwrap_or(pool_defaults.max_size),
            queue_limit: env.parsed("DB_QUEUE_LIMIT")?.unwrap_or(pool_defaults.queue_limit),
            acquire_timeout: env
                .parsed::<u64>("DB_ACQUIRE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(pool_defaults.acquire_timeout),
        };

        if config.pool.max_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(config)
    }

    /// Parse a DATABASE_URL connection string (postgresql://...)
    fn parse_database_url(url: &str) -> Result<RelationalConfig, ConfigError> {
        let parsed = url::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
            key: "DATABASE_URL",
            reason: format!("expected postgresql://... ({})", e),
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "DATABASE_URL",
                reason: "missing host".to_string(),
            })?
            .to_string();

        let database = match parsed.path().trim_start_matches('/') {
            "" => RelationalConfig::default().database,
            db => db.to_string(),
        };

        let ssl = parsed
            .query_pairs()
            .any(|(k, v)| k == "sslmode" && v == "require");

        Ok(RelationalConfig {
            host,
            port: parsed.port().unwrap_or(5432),
            user: parsed.username().to_string(),
            password: parsed.password().map(|p| p.to_string()).unwrap_or_default(),
            database,
            ssl,
            ..RelationalConfig::default()
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parsed<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.string(key)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
                    key,
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("identifier pattern is valid"));

/// The schema name is interpolated into SQL, so only plain identifiers pass.
fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    if !IDENTIFIER.is_match(name) {
        let mut err = ValidationError::new("invalid_identifier");
        err.message = Some(
            "DB_NAME must start with a letter or underscore and contain only letters, digits, underscores."
                .into(),
        );
        return Err(err);
    }
    Ok(())
}
