//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `API_URL` - Base URL of the school REST backend (e.g., `https://api.alamo.edu.ve`)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL for the admin panel (default: <http://localhost:3001>)
//! - `ADMIN_MAX_UPLOAD_BYTES` - Largest accepted editor form, image included (default: 5 MiB)
//! - `ADMIN_MAX_SESSIONS` - Sessions kept in memory before the oldest are evicted (default: 1000)
//! - `PUBLIC_SITE_URL` - School website linked from the login page (default: <http://localhost:3000/>)
//! - `API_TIMEOUT_SECS` - Timeout for backend requests (default: 15)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)
//!
//! ## Optional (TLS)
//! - `ADMIN_TLS_CERT` - PEM-encoded certificate chain
//! - `ADMIN_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_API_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_SESSIONS: u64 = 1000;
const DEFAULT_PUBLIC_SITE_URL: &str = "http://localhost:3000/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin panel
    pub base_url: String,
    /// School REST backend
    pub backend: BackendConfig,
    /// Request body limit for the editor form
    pub max_upload_bytes: usize,
    /// Upper bound on sessions held in memory
    pub max_sessions: u64,
    /// School website, linked from the login page
    pub public_site_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Where the school REST backend lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL every endpoint is resolved against
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl BackendConfig {
    /// Build a backend configuration from a base URL with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is not http(s).
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        })
    }

    /// Load the backend configuration from `API_URL` and `API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `API_URL` is missing or either variable is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = parse_api_url(&get_required_env("API_URL")?)?;
        let timeout_secs = get_env_or_default("API_TIMEOUT_SECS", &DEFAULT_API_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("API_TIMEOUT_SECS".to_string(), e.to_string()))?;

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env("ADMIN_TLS_CERT");
        let key_pem = get_optional_env("ADMIN_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "ADMIN_TLS_*".to_string(),
                "Both ADMIN_TLS_CERT and ADMIN_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("ADMIN_BASE_URL", "http://localhost:3001");
        let backend = BackendConfig::from_env()?;
        let max_upload_bytes = get_env_or_default(
            "ADMIN_MAX_UPLOAD_BYTES",
            &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
        )
        .parse::<usize>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ADMIN_MAX_UPLOAD_BYTES".to_string(), e.to_string())
        })?;
        let max_sessions = get_env_or_default("ADMIN_MAX_SESSIONS", &DEFAULT_MAX_SESSIONS.to_string())
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_MAX_SESSIONS".to_string(), e.to_string()))?;
        let public_site_url = get_env_or_default("PUBLIC_SITE_URL", DEFAULT_PUBLIC_SITE_URL);
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            max_upload_bytes,
            max_sessions,
            public_site_url,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Configuration for local runs and tests: loopback, no Sentry, no TLS.
    #[must_use]
    pub fn local(backend: BackendConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            backend,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_sessions: DEFAULT_MAX_SESSIONS,
            public_site_url: DEFAULT_PUBLIC_SITE_URL.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            tls: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies must carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and check the backend base URL.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("API_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "API_URL".to_string(),
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_accepts_http_and_https() {
        assert!(parse_api_url("http://localhost:8000").is_ok());
        assert!(parse_api_url("https://api.alamo.edu.ve/").is_ok());
    }

    #[test]
    fn test_parse_api_url_trims_whitespace() {
        let url = parse_api_url("  http://localhost:8000  ").unwrap();
        assert_eq!(url.host_str(), Some("localhost"));
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        let err = parse_api_url("ftp://files.alamo.edu.ve").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "API_URL"));
    }

    #[test]
    fn test_parse_api_url_rejects_garbage() {
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn test_backend_config_default_timeout() {
        let backend = BackendConfig::new("http://localhost:8000").unwrap();
        assert_eq!(backend.timeout, Duration::from_secs(DEFAULT_API_TIMEOUT_SECS));
    }

    #[test]
    fn test_socket_addr() {
        let config = AdminConfig::local(BackendConfig::new("http://localhost:8000").unwrap());
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_is_secure_follows_base_url() {
        let mut config = AdminConfig::local(BackendConfig::new("http://localhost:8000").unwrap());
        assert!(!config.is_secure());
        config.base_url = "https://admin.alamo.edu.ve".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_tls_config_debug_redacts_key() {
        let config = TlsConfig {
            cert_pem: "-----BEGIN CERTIFICATE-----".to_string(),
            key_pem: SecretString::from("super_secret_private_key"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_private_key"));
    }
}
