//! Connection configuration for the GoodData platform.
//!
//! All types implement [`serde::Deserialize`] so the CLI can load them from
//! a TOML file. Every field has a default, so an empty file is a valid
//! configuration.
//!
//! # Example
//!
//! ```
//! # use vizaudit::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.server().hostname(), "secure.gooddata.com");
//! assert_eq!(config.server().base_url(), "https://secure.gooddata.com:443/");
//! ```

use std::time::Duration;

use serde::Deserialize;

/// Hostname used when neither the command line nor a config file names one.
pub const DEFAULT_HOSTNAME: &str = "secure.gooddata.com";

/// Default timeout for a single HTTP request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server section.
    #[serde(default)]
    server: ServerConfig,

    /// HTTP client section.
    #[serde(default)]
    http: HttpConfig,
}

impl AppConfig {
    pub fn new(server: ServerConfig, http: HttpConfig) -> Self {
        Self { server, http }
    }

    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    pub fn http(&self) -> &HttpConfig {
        &self.http
    }

    /// Returns a copy with the hostname replaced.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.server.hostname = hostname.into();
        self
    }
}

/// Where the platform lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    hostname: String,
    port: u16,
    protocol: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: 443,
            protocol: "https".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a server configuration.
    ///
    /// # Arguments
    ///
    /// * `hostname` - Host name of the platform, without scheme
    /// * `port` - TCP port
    /// * `protocol` - `https` or `http`
    pub fn new(hostname: impl Into<String>, port: u16, protocol: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            protocol: protocol.into(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Returns the base URL every server-relative URI is resolved against.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}/", self.protocol, self.hostname, self.port)
    }
}

/// HTTP client tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    timeout_secs: u64,
    user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the configured user agent, or `vizaudit/<version>`.
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("vizaudit/{}", env!("CARGO_PKG_VERSION")))
    }
}
