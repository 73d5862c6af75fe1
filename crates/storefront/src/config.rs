//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `SANITY_PROJECT_ID` - Sanity project the catalog lives in
//! - `ORDER_ENDPOINT_URL` - Endpoint that records submitted orders
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_USER_ID` - `userId` sent with every order (default: guest)
//! - `SANITY_DATASET` - Dataset name (default: production)
//! - `SANITY_API_VERSION` - Query API version (default: 2025-01-01)
//! - `SANITY_API_TOKEN` - Read token for private datasets (validated)
//! - `SANITY_USE_CDN` - Query the API CDN when no token is set (default: true)
//! - `SANITY_API_BASE_URL` - Override the derived query host
//! - `ORDER_API_TOKEN` - Bearer token for the order endpoint (validated)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// `userId` attached to submitted orders
    pub user_id: String,
    /// Content API configuration
    pub sanity: SanityConfig,
    /// Order endpoint configuration
    pub orders: OrderEndpointConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of requests traced
    pub sentry_traces_sample_rate: f32,
}

/// Sanity content API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    /// Without the leading `v`, e.g. `2025-01-01`
    pub api_version: String,
    pub token: Option<SecretString>,
    pub use_cdn: bool,
    /// Explicit API root; replaces the host derived from `project_id`.
    pub base_url: Option<Url>,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("use_cdn", &self.use_cdn)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SanityConfig {
    /// Load only the content API settings from environment variables.
    ///
    /// Used by tools that read content but never serve pages or place orders.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `SANITY_PROJECT_ID` is missing or a value is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_source(&|key| std::env::var(key).ok())
    }

    /// Load the content API settings from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`SanityConfig::from_env`].
    pub fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::load(&Env(env))
    }

    fn load(env: &Env<'_>) -> Result<Self, ConfigError> {
        let sanity = Self {
            project_id: env.required("SANITY_PROJECT_ID")?,
            dataset: env.or_default("SANITY_DATASET", "production"),
            api_version: env.or_default("SANITY_API_VERSION", "2025-01-01"),
            token: env.validated_secret("SANITY_API_TOKEN")?,
            use_cdn: env.parsed("SANITY_USE_CDN", "true")?,
            base_url: env
                .optional("SANITY_API_BASE_URL")
                .map(|_| env.url("SANITY_API_BASE_URL"))
                .transpose()?,
        };
        // Fail at startup on a malformed project id.
        sanity.query_url()?;
        Ok(sanity)
    }

    /// Root URL that the `/v{version}/data/query/{dataset}` path hangs off.
    ///
    /// Authenticated requests always bypass the CDN.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the project ID does not form a
    /// valid host name.
    pub fn api_root(&self) -> Result<Url, ConfigError> {
        if let Some(base) = &self.base_url {
            return Ok(base.clone());
        }
        let host = if self.use_cdn && self.token.is_none() {
            "apicdn"
        } else {
            "api"
        };
        Url::parse(&format!("https://{}.{host}.sanity.io/", self.project_id))
            .map_err(|e| ConfigError::InvalidEnvVar("SANITY_PROJECT_ID".to_string(), e.to_string()))
    }

    /// Full query endpoint for this project and dataset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be built.
    pub fn query_url(&self) -> Result<Url, ConfigError> {
        let root = self.api_root()?;
        root.join(&format!(
            "v{}/data/query/{}",
            self.api_version.trim_start_matches('v'),
            self.dataset
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("SANITY_DATASET".to_string(), e.to_string()))
    }
}

/// Order recording endpoint configuration.
#[derive(Clone)]
pub struct OrderEndpointConfig {
    pub url: Url,
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for OrderEndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEndpointConfig")
            .field("url", &self.url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_source(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_source(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(env);

        let host = env.parsed("STOREFRONT_HOST", "127.0.0.1")?;
        let port = env.parsed("STOREFRONT_PORT", "3000")?;
        let base_url = env.url("STOREFRONT_BASE_URL")?;
        let user_id = env.or_default("STOREFRONT_USER_ID", "guest");

        let sanity = SanityConfig::load(&env)?;

        let orders = OrderEndpointConfig {
            url: env.url("ORDER_ENDPOINT_URL")?,
            token: env.validated_secret("ORDER_API_TOKEN")?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            user_id,
            sanity,
            orders,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parsed("SENTRY_TRACES_SAMPLE_RATE", "0.1")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    fn url(&self, key: &str) -> Result<Url, ConfigError> {
        Url::parse(&self.required(key)?)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Load an optional secret, validating it when present.
    fn validated_secret(&self, key: &str) -> Result<Option<SecretString>, ConfigError> {
        self.optional(key)
            .map(|value| {
                validate_secret_strength(&value, key)?;
                Ok(SecretString::from(value))
            })
            .transpose()
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG_TOKEN: &str = "skQ7vT2mZp9RxL4wNc8Yb3Hd";

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = [
            ("STOREFRONT_BASE_URL", "http://localhost:3000"),
            ("SANITY_PROJECT_ID", "abc123"),
            ("ORDER_ENDPOINT_URL", "http://localhost:4000/api/orders"),
        ]
        .iter()
        .chain(vars)
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
        StorefrontConfig::from_source(&move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.user_id, "guest");
        assert_eq!(config.sanity.dataset, "production");
        assert!(config.sanity.use_cdn);
        assert!(config.orders.token.is_none());
        assert!(!config.is_https());
        assert!((config.sentry_traces_sample_rate - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_required() {
        let vars: HashMap<&str, &str> = HashMap::from([("SANITY_PROJECT_ID", "abc123")]);
        let err = StorefrontConfig::from_source(&|key| vars.get(key).map(ToString::to_string))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "STOREFRONT_BASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_query_url_uses_cdn_without_token() {
        let config = load(&[]).unwrap();
        assert_eq!(
            config.sanity.query_url().unwrap().as_str(),
            "https://abc123.apicdn.sanity.io/v2025-01-01/data/query/production"
        );
    }

    #[test]
    fn test_query_url_skips_cdn_with_token() {
        let config = load(&[("SANITY_API_TOKEN", STRONG_TOKEN)]).unwrap();
        assert_eq!(
            config.sanity.query_url().unwrap().host_str(),
            Some("abc123.api.sanity.io")
        );
    }

    #[test]
    fn test_query_url_override() {
        let config = load(&[("SANITY_API_BASE_URL", "http://127.0.0.1:9999/")]).unwrap();
        assert_eq!(
            config.sanity.query_url().unwrap().as_str(),
            "http://127.0.0.1:9999/v2025-01-01/data/query/production"
        );
    }

    #[test]
    fn test_sanity_only_needs_project_id() {
        let sanity = SanityConfig::from_source(&|key| {
            (key == "SANITY_PROJECT_ID").then(|| "abc123".to_string())
        })
        .unwrap();
        assert_eq!(sanity.api_version, "2025-01-01");
        assert!(sanity.token.is_none());
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = load(&[("ORDER_API_TOKEN", "your-token-here")]).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength(STRONG_TOKEN, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let config = load(&[
            ("SANITY_API_TOKEN", STRONG_TOKEN),
            ("ORDER_API_TOKEN", STRONG_TOKEN),
        ])
        .unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("abc123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(STRONG_TOKEN));
    }
}
