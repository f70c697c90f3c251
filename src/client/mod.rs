//! Lacework API client
//!
//! [`LaceworkClient`] owns the HTTP transport, the authentication state and
//! the per-client settings (account, API version, headers, callbacks). It is
//! cheap to clone; clones share the same token state.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, Url};
use tokio::sync::{Mutex, RwLock};

use crate::error::{ApiError, ConfigError, Result};

pub mod auth;
pub mod backoff;
pub mod callbacks;
pub mod crud;
pub mod endpoints;
mod http;

pub use auth::{AccessToken, DEFAULT_TOKEN_EXPIRY_TIME};
pub use backoff::{ExponentialBackoff, Sleeper, TokioSleeper};
pub use callbacks::LifecycleCallbacks;
pub use crud::{Crud, Endpoint};

use auth::AuthState;

/// Default HTTP timeout applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Domain every account lives under
const LACEWORK_DOMAIN: &str = "lacework.net";

/// Environment variable that overrides the configured log level
pub const LOG_LEVEL_ENV: &str = "LW_LOG";

/// API version used for paths without an explicit version prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    V1,
    #[default]
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v1" | "1" => Ok(ApiVersion::V1),
            "v2" | "2" => Ok(ApiVersion::V2),
            _ => Err(ConfigError::InvalidApiVersion(s.to_string())),
        }
    }
}

/// Client log level; `Debug` also logs request and response bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => f.write_str("INFO"),
            LogLevel::Debug => f.write_str("DEBUG"),
        }
    }
}

/// Lacework API client
#[derive(Clone)]
pub struct LaceworkClient {
    id: String,
    account: String,
    subaccount: Option<String>,
    org_access: bool,
    base_url: Url,
    api_version: ApiVersion,
    extra_headers: Vec<(String, String)>,
    headers: HeaderMap,
    timeout: Duration,
    log_level: LogLevel,
    http: HttpClient,
    auth_state: Arc<RwLock<AuthState>>,
    refresh_lock: Arc<Mutex<()>>,
    callbacks: LifecycleCallbacks,
}

impl fmt::Debug for LaceworkClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaceworkClient")
            .field("id", &self.id)
            .field("account", &self.account)
            .field("subaccount", &self.subaccount)
            .field("base_url", &self.base_url.as_str())
            .field("api_version", &self.api_version)
            .field("log_level", &self.log_level)
            .finish_non_exhaustive()
    }
}

impl LaceworkClient {
    /// Start building a client for the given account.
    ///
    /// The account may be a bare name (`demo`) or a full domain
    /// (`demo.lacework.net`).
    pub fn builder(account: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(account)
    }

    /// Start a builder seeded with this client's settings.
    ///
    /// Unless authentication options are set on the returned builder, the
    /// new client shares this client's token state. Otherwise it gets its own
    /// state, seeded from this client's keys and token with the new options
    /// applied on top. The copy gets its own id.
    pub fn copy_with(&self) -> ClientBuilder {
        ClientBuilder {
            account: self.account.clone(),
            subaccount: self.subaccount.clone(),
            org_access: self.org_access,
            base_url: Some(self.base_url.to_string()),
            api_version: self.api_version,
            headers: self.extra_headers.clone(),
            timeout: self.timeout,
            log_level: Some(self.log_level.to_string()),
            callbacks: self.callbacks.clone(),
            shared_auth: Some((self.auth_state.clone(), self.refresh_lock.clone())),
            ..ClientBuilder::new(self.account.clone())
        }
    }

    /// Unique id of this client, useful to correlate logs of several clients
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn subaccount(&self) -> Option<&str> {
        self.subaccount.as_deref()
    }

    /// Base URL every API path is resolved against
    pub fn url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    /// Whether the client is configured to manage organization level data sets
    pub fn org_access(&self) -> bool {
        self.org_access
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub(crate) fn debug_mode(&self) -> bool {
        self.log_level == LogLevel::Debug
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }
}

/// Builder for [`LaceworkClient`].
///
/// Options are validated in [`ClientBuilder::build`].
#[derive(Debug)]
pub struct ClientBuilder {
    account: String,
    subaccount: Option<String>,
    org_access: bool,
    base_url: Option<String>,
    api_version: ApiVersion,
    key_id: Option<String>,
    secret: Option<String>,
    token: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
    expiration: Option<u64>,
    headers: Vec<(String, String)>,
    timeout: Duration,
    log_level: Option<String>,
    callbacks: LifecycleCallbacks,
    shared_auth: Option<(Arc<RwLock<AuthState>>, Arc<Mutex<()>>)>,
}

impl ClientBuilder {
    fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            subaccount: None,
            org_access: false,
            base_url: None,
            api_version: ApiVersion::default(),
            key_id: None,
            secret: None,
            token: None,
            token_expires_at: None,
            expiration: None,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            log_level: None,
            callbacks: LifecycleCallbacks::default(),
            shared_auth: None,
        }
    }

    /// Key id and secret used to generate access tokens
    pub fn api_keys(mut self, key_id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self.secret = Some(secret.into());
        self
    }

    /// Use an existing access token; it is trusted until the server rejects it
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self.token_expires_at = None;
        self
    }

    /// Use an existing access token that expires at the given instant
    pub fn token_with_expiration(
        mut self,
        token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        self.token = Some(token.into());
        self.token_expires_at = Some(expires_at);
        self
    }

    /// Lifetime in seconds requested for newly generated tokens
    pub fn expiration_time(mut self, seconds: u64) -> Self {
        self.expiration = Some(seconds);
        self
    }

    /// Operate on a subaccount of an organization
    pub fn subaccount(mut self, subaccount: impl Into<String>) -> Self {
        let subaccount = subaccount.into();
        if !subaccount.is_empty() {
            self.subaccount = Some(subaccount);
        }
        self
    }

    /// Access organization level data sets
    pub fn org_access(mut self) -> Self {
        self.org_access = true;
        self
    }

    /// Override the base URL (meant for tests against a local server)
    pub fn url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// HTTP header sent with every request; empty names or values are ignored
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        if !name.is_empty() && !value.is_empty() {
            self.headers.push((name, value));
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Log level, `info` or `debug`
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn lifecycle_callbacks(mut self, callbacks: LifecycleCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    fn overrides_auth(&self) -> bool {
        self.key_id.is_some()
            || self.secret.is_some()
            || self.token.is_some()
            || self.expiration.is_some()
    }

    /// Validate the options and create the client
    pub fn build(self) -> Result<LaceworkClient> {
        let account = normalize_account(&self.account)?;

        let base_url = match &self.base_url {
            Some(url) => url.clone(),
            None => format!("https://{}.{}", account, LACEWORK_DOMAIN),
        };
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut log_level = match &self.log_level {
            Some(level) => level.parse::<LogLevel>()?,
            None => LogLevel::default(),
        };
        if let Ok(raw) = std::env::var(LOG_LEVEL_ENV) {
            match raw.parse::<LogLevel>() {
                Ok(env_level) if !raw.trim().is_empty() && env_level != log_level => {
                    debug!(
                        "setting up client, override log level before={} after={}",
                        log_level, env_level
                    );
                    log_level = env_level;
                }
                _ => {}
            }
        }

        let overrides_auth = self.overrides_auth();

        // Custom headers are kept apart from the managed ones so copies can rebuild them.
        let custom_headers: Vec<(String, String)> = self
            .headers
            .into_iter()
            .filter(|(name, _)| !is_managed_header(name))
            .collect();

        let mut extra_headers = Vec::new();
        if let Some(subaccount) = &self.subaccount {
            extra_headers.push(("Account-Name".to_string(), subaccount.clone()));
        }
        if self.org_access {
            extra_headers.push(("Org-Access".to_string(), "true".to_string()));
        }
        extra_headers.extend(custom_headers.iter().cloned());

        let mut headers = HeaderMap::new();
        for (name, value) in &extra_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ConfigError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(format!("Rust Client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::from)?;

        let (auth_state, refresh_lock) = match self.shared_auth {
            Some((state, lock)) if !overrides_auth => (state, lock),
            shared => {
                // Copies start from the source client's credentials.
                let mut seed = match shared {
                    Some((state, _)) => AuthState::snapshot(&state),
                    None => AuthState {
                        expiration: DEFAULT_TOKEN_EXPIRY_TIME,
                        ..AuthState::default()
                    },
                };
                if let Some(key_id) = self.key_id {
                    seed.key_id = Some(key_id);
                }
                if let Some(secret) = self.secret {
                    seed.secret = Some(secret);
                }
                if let Some(token) = self.token {
                    seed.token = Some(token);
                    seed.expires_at = self.token_expires_at;
                }
                if let Some(expiration) = self.expiration {
                    seed.expiration = expiration;
                }
                (Arc::new(RwLock::new(seed)), Arc::new(Mutex::new(())))
            }
        };

        let client = LaceworkClient {
            id: new_id(),
            account,
            subaccount: self.subaccount,
            org_access: self.org_access,
            base_url,
            api_version: self.api_version,
            extra_headers: custom_headers,
            headers,
            timeout: self.timeout,
            log_level,
            http,
            auth_state,
            refresh_lock,
            callbacks: self.callbacks,
        };

        info!(
            "api client created id={} account={} url={} version={} log_level={} timeout={:?}",
            client.id,
            client.account,
            client.base_url,
            client.api_version,
            client.log_level,
            client.timeout,
        );

        Ok(client)
    }
}

/// Headers derived from builder options rather than set verbatim
fn is_managed_header(name: &str) -> bool {
    name.eq_ignore_ascii_case("Account-Name") || name.eq_ignore_ascii_case("Org-Access")
}

/// Reduce `https://demo.lacework.net` or `demo.fra.lacework.net` to `demo`
fn normalize_account(account: &str) -> Result<String> {
    let account = account.trim();
    if account.is_empty() {
        return Err(ConfigError::EmptyAccount.into());
    }

    if !account.contains(&format!(".{}", LACEWORK_DOMAIN)) {
        return Ok(account.to_string());
    }

    let host = account
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = host.split('/').next().unwrap_or(host);
    let name = host.split('.').next().unwrap_or(host);

    if name.is_empty() {
        return Err(ConfigError::EmptyAccount.into());
    }
    Ok(name.to_string())
}

/// Generate a client id; unique within the process
fn new_id() -> String {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{:x}", nanos.wrapping_add(seq))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LaceworkClient::builder("demo").build().unwrap();
        assert_eq!(client.account(), "demo");
        assert_eq!(client.url(), "https://demo.lacework.net/");
        assert_eq!(client.api_version(), ApiVersion::V2);
        assert!(!client.org_access());
    }

    #[test]
    fn test_empty_account_is_rejected() {
        let err = LaceworkClient::builder("  ").build().unwrap_err();
        assert!(err.to_string().contains("account cannot be empty"));
    }

    #[test]
    fn test_full_domain_account() {
        assert_eq!(normalize_account("demo.lacework.net").unwrap(), "demo");
        assert_eq!(
            normalize_account("https://demo.fra.lacework.net/ui").unwrap(),
            "demo"
        );
        assert_eq!(normalize_account("demo").unwrap(), "demo");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let err = LaceworkClient::builder("demo")
            .url("not a url")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let err = LaceworkClient::builder("demo")
            .log_level("verbose")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("invalid log level 'verbose'"));
    }

    #[test]
    fn test_subaccount_and_org_access_headers() {
        let client = LaceworkClient::builder("demo")
            .subaccount("sub")
            .org_access()
            .header("X-Custom", "yes")
            .header("", "ignored")
            .build()
            .unwrap();

        assert_eq!(client.subaccount(), Some("sub"));
        assert!(client.org_access());
        assert_eq!(client.headers.get("Account-Name").unwrap(), "sub");
        assert_eq!(client.headers.get("Org-Access").unwrap(), "true");
        assert_eq!(client.headers.get("X-Custom").unwrap(), "yes");
        assert_eq!(client.headers.len(), 3);
    }

    #[test]
    fn test_copy_with_gets_new_id_and_keeps_settings() {
        let client = LaceworkClient::builder("demo")
            .api_version(ApiVersion::V1)
            .subaccount("sub")
            .header("X-Custom", "yes")
            .build()
            .unwrap();

        let copy = client.copy_with().org_access().build().unwrap();

        assert_ne!(client.id(), copy.id());
        assert_eq!(copy.account(), "demo");
        assert_eq!(copy.api_version(), ApiVersion::V1);
        assert_eq!(copy.subaccount(), Some("sub"));
        assert!(copy.org_access());
        assert!(!client.org_access());
        assert_eq!(copy.headers.get("X-Custom").unwrap(), "yes");
        assert!(Arc::ptr_eq(&client.auth_state, &copy.auth_state));
        assert!(Arc::ptr_eq(&client.refresh_lock, &copy.refresh_lock));
    }

    #[test]
    fn test_copy_with_new_keys_gets_own_auth_state() {
        let client = LaceworkClient::builder("demo").build().unwrap();
        let copy = client.copy_with().api_keys("KEY", "SECRET").build().unwrap();
        assert!(!Arc::ptr_eq(&client.auth_state, &copy.auth_state));
        assert!(!Arc::ptr_eq(&client.refresh_lock, &copy.refresh_lock));
    }

    #[tokio::test]
    async fn test_copy_with_expiration_keeps_keys() {
        let client = LaceworkClient::builder("demo")
            .api_keys("KEY", "SECRET")
            .token("TOKEN")
            .build()
            .unwrap();
        let copy = client.copy_with().expiration_time(600).build().unwrap();

        assert!(!Arc::ptr_eq(&client.auth_state, &copy.auth_state));
        let state = copy.auth_state.read().await;
        assert_eq!(state.key_id.as_deref(), Some("KEY"));
        assert_eq!(state.secret.as_deref(), Some("SECRET"));
        assert_eq!(state.token.as_deref(), Some("TOKEN"));
        assert_eq!(state.expiration, 600);
        assert_eq!(client.auth_state.read().await.expiration, DEFAULT_TOKEN_EXPIRY_TIME);
    }

    #[test]
    fn test_parse_versions_and_levels() {
        assert_eq!("v1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert_eq!("V2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert!("v3".parse::<ApiVersion>().is_err());
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("".parse::<LogLevel>().unwrap(), LogLevel::Info);
    }
}
