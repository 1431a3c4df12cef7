//! STRATO customer portal

mod http;
mod package;
mod records;
pub mod scrape;
mod session;
mod totp;

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::{ProviderError, Result};

/// Production entry point of the customer portal.
pub const STRATO_API_URL: &str = "https://www.strato.de/apps/CustomerService";
/// Package id used when the domain cannot be found in the package list.
pub const FALLBACK_PACKAGE_ID: &str = "1";

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:126.0) Gecko/20100101 Firefox/126.0";

/// Client settings for [`StratoProvider`].
#[derive(Debug, Clone)]
pub struct StratoConfig {
    /// Portal entry point; all pages are addressed through it.
    pub api_url: String,
    pub user_agent: String,
    /// `None` leaves the transport default (no limit).
    pub connect_timeout: Option<Duration>,
    /// `None` leaves the transport default (no limit).
    pub timeout: Option<Duration>,
}

impl Default for StratoConfig {
    fn default() -> Self {
        Self {
            api_url: STRATO_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout: None,
            timeout: None,
        }
    }
}

/// Session-based client of the STRATO customer portal.
///
/// Owns a cookie-persistent HTTP client for the whole run. After a successful
/// [`login`](Self::login) the session id is attached to every page request.
///
/// # Construction
///
/// ```rust,no_run
/// use strato_certbot_provider::StratoProvider;
///
/// let provider = StratoProvider::builder()
///     .api_url("https://www.strato.de/apps/CustomerService")
///     .build()
///     .unwrap();
/// ```
pub struct StratoProvider {
    pub(crate) client: Client,
    pub(crate) api_url: Url,
    pub(crate) session_id: Option<String>,
}

/// Builder for [`StratoProvider`].
pub struct StratoProviderBuilder {
    config: StratoConfig,
}

impl StratoProviderBuilder {
    fn new(config: StratoConfig) -> Self {
        Self { config }
    }

    /// Override the portal endpoint (default: production).
    #[must_use]
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.config.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Limit for a whole request, redirects included (default: none).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Build the [`StratoProvider`] instance.
    pub fn build(self) -> Result<StratoProvider> {
        let api_url = Url::parse(&self.config.api_url).map_err(|e| ProviderError::InvalidConfig {
            detail: format!("api_url '{}': {e}", self.config.api_url),
        })?;

        let mut builder = Client::builder()
            .cookie_store(true)
            .user_agent(self.config.user_agent);
        if let Some(connect_timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ProviderError::InvalidConfig {
                detail: format!("HTTP client: {e}"),
            })?;

        Ok(StratoProvider {
            client,
            api_url,
            session_id: None,
        })
    }
}

impl StratoProvider {
    /// Creates a provider for the production portal.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Creates a provider from explicit settings.
    pub fn with_config(config: StratoConfig) -> Result<Self> {
        StratoProviderBuilder::new(config).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder() -> StratoProviderBuilder {
        StratoProviderBuilder::new(StratoConfig::default())
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Session id handed out by the last successful login.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub(crate) fn require_session(&self) -> Result<&str> {
        self.session_id().ok_or_else(|| ProviderError::InvalidCredentials {
            raw_message: Some("not logged in".to_string()),
        })
    }
}
