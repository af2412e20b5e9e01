use crate::authenticator::{ScopeSet, Site};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Settings for the StackExchange authenticator instance.
#[derive(Clone, Deserialize)]
pub struct AuthenticatorConfig {
    /// Client id of the StackApps registration.
    pub client_id: String,
    /// Secret used when exchanging the authorization code.
    pub client_secret: String,
    /// StackApps key sent to the API with every profile request.
    pub app_key: String,
    #[serde(default)]
    pub site: Site,
    #[serde(default)]
    pub scopes: ScopeSet,
    /// Fully qualified URI this authenticator is served under, e.g.
    /// `https://login.example.com/authn/authentication/stackexchange`.
    pub authentication_uri: String,
    #[serde(default)]
    pub http_client: HttpClientConfig,
}

impl fmt::Debug for AuthenticatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatorConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("app_key", &"<redacted>")
            .field("site", &self.site)
            .field("scopes", &self.scopes)
            .field("authentication_uri", &self.authentication_uri)
            .field("http_client", &self.http_client)
            .finish()
    }
}

/// Transport settings for calls to stackexchange.com and api.stackexchange.com.
#[derive(Clone, Debug, Deserialize)]
pub struct HttpClientConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Seconds a login attempt may stay pending before its session is pruned.
    #[serde(default = "default_session_max_age")]
    pub max_age_secs: u64,
    /// Mark the session cookie `Secure`. Only disable for plain-http local testing.
    #[serde(default = "default_true")]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_secs: default_session_max_age(),
            secure_cookie: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    pub authenticator: AuthenticatorConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_cookie_name() -> String {
    "se_authn_session".to_string()
}

fn default_session_max_age() -> u64 {
    600
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Reject configurations that would only fail once a user tries to log in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let auth = &self.authenticator;
        for (name, value) in [
            ("authenticator.client_id", &auth.client_id),
            ("authenticator.client_secret", &auth.client_secret),
            ("authenticator.app_key", &auth.app_key),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{name} must not be empty")));
            }
        }

        let uri = Url::parse(&auth.authentication_uri).map_err(|e| {
            ConfigError::Validation(format!("authenticator.authentication_uri is invalid: {e}"))
        })?;
        if !matches!(uri.scheme(), "http" | "https") || uri.cannot_be_a_base() {
            return Err(ConfigError::Validation(
                "authenticator.authentication_uri must be an absolute http(s) URL".into(),
            ));
        }

        if auth.http_client.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "authenticator.http_client.timeout_secs must be > 0".into(),
            ));
        }
        if self.session.max_age_secs == 0 {
            return Err(ConfigError::Validation(
                "session.max_age_secs must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Path of the configuration file; `STACKEXCHANGE_CONFIG` overrides the default `config.yaml`.
pub fn config_path() -> String {
    std::env::var("STACKEXCHANGE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string())
}

/// Load application configuration from the YAML file + environment overrides.
///
/// Any variable matching the key path separated by double underscores
/// (e.g. `AUTHENTICATOR__CLIENT_SECRET`) overrides the file value.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name(&config_path()))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

/// Parse and validate configuration from a YAML string, without environment overrides.
pub fn load_config_from_str(yaml: &str) -> Result<AppConfig, ConfigError> {
    use config::{Config, File, FileFormat};
    let cfg = Config::builder()
        .add_source(File::from_str(yaml, FileFormat::Yaml))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
