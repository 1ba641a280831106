use std::time::Duration;

use tracing::debug;

use super::{AuthenticatedTransport, Credential, IncogniaApi, IncogniaError, SecureString};

/// Base URL of the production Incognia API.
pub const DEFAULT_BASE_URL: &str = "https://api.incognia.com/api/v2";

/// Network options of an [`IncogniaApi`] client.
///
/// # Default Configuration
///
/// - **Timeout**: 10 000 ms for each call, token requests included
/// - **Max connections**: 5 idle connections kept per host
/// - **Keep alive**: 300 s before an idle connection is closed
///
/// # Example
///
/// ```rust
/// use incognia_api::ClientOptions;
///
/// let options = ClientOptions::default()
///     .with_timeout_ms(2_000)
///     .with_max_connections(20);
/// assert_eq!(options.timeout_ms(), 2_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    timeout_ms: u64,
    max_connections: usize,
    keep_alive_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_connections: 5,
            keep_alive_seconds: 300,
        }
    }
}

impl ClientOptions {
    /// Sets the timeout of each call, in milliseconds.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the maximum number of idle connections kept in the pool.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets how long an idle connection is kept, in seconds.
    #[must_use]
    pub fn with_keep_alive_seconds(mut self, keep_alive_seconds: u64) -> Self {
        self.keep_alive_seconds = keep_alive_seconds;
        self
    }

    /// Returns the call timeout, in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the maximum number of idle connections.
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Returns the keep-alive duration, in seconds.
    pub fn keep_alive_seconds(&self) -> u64 {
        self.keep_alive_seconds
    }

    fn validate(&self) -> Result<(), IncogniaError> {
        if self.timeout_ms == 0 {
            return Err(IncogniaError::configuration("'timeout' must be positive"));
        }
        if self.max_connections == 0 {
            return Err(IncogniaError::configuration(
                "'max connections' must be positive",
            ));
        }
        if self.keep_alive_seconds == 0 {
            return Err(IncogniaError::configuration("'keep alive' must be positive"));
        }
        Ok(())
    }

    fn http_client(&self) -> Result<reqwest::Client, IncogniaError> {
        reqwest::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .pool_max_idle_per_host(self.max_connections)
            .pool_idle_timeout(Duration::from_secs(self.keep_alive_seconds))
            .build()
            .map_err(|err| IncogniaError::configuration(format!("cannot create HTTP client: {err}")))
    }
}

/// Builder for [`IncogniaApi`] clients.
///
/// Nothing is validated until [`build`](Self::build): invalid values never produce a
/// partially configured client.
///
/// # Example
///
/// ```rust
/// use incognia_api::IncogniaApi;
///
/// # fn example() -> Result<(), incognia_api::IncogniaError> {
/// let api = IncogniaApi::builder("client-id", "client-secret")
///     .with_base_url("https://api.incognia.com/api/v2")
///     .with_timeout(2_000)
///     .with_max_connections(10)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct IncogniaApiBuilder {
    client_id: String,
    client_secret: SecureString,
    base_url: String,
    options: ClientOptions,
}

impl IncogniaApiBuilder {
    pub(super) fn new(client_id: impl Into<String>, client_secret: impl Into<SecureString>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            options: ClientOptions::default(),
        }
    }

    pub(crate) fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &SecureString {
        &self.client_secret
    }

    /// Sets the base URL the `token` and domain endpoints are resolved against.
    ///
    /// Defaults to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces all network options.
    #[must_use]
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the call timeout, in milliseconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.options = self.options.with_timeout_ms(timeout_ms);
        self
    }

    /// Sets the maximum number of idle connections.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.options = self.options.with_max_connections(max_connections);
        self
    }

    /// Sets the keep-alive duration of idle connections, in seconds.
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive_seconds: u64) -> Self {
        self.options = self.options.with_keep_alive_seconds(keep_alive_seconds);
        self
    }

    /// Builds the client.
    ///
    /// No network call happens here: the first token is requested by the first call.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Configuration`] if the client id, the client secret or the
    /// base URL is empty or invalid, or if an option is not positive.
    pub fn build(self) -> Result<IncogniaApi, IncogniaError> {
        let Self {
            client_id,
            client_secret,
            base_url,
            options,
        } = self;

        let credential = Credential::new(client_id, client_secret, base_url)?;
        options.validate()?;
        let http = options.http_client()?;
        debug!(?credential, ?options, "Incognia client created");

        Ok(IncogniaApi {
            transport: AuthenticatedTransport::new(http, credential),
            options,
        })
    }
}
