use std::fmt;

use base64::Engine;
use http::HeaderValue;
use url::Url;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::IncogniaError;

/// Secure wrapper for sensitive string data that automatically zeroes memory on drop.
///
/// Used for the client secret and for access tokens, so that they never show up
/// in logs or debug output.
#[derive(Clone, PartialEq, Eq, Hash, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    /// Creates a new secure string from the provided value.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner string value.
    ///
    /// # Security Note
    /// The returned reference should not be stored for extended periods
    /// to minimize exposure time of sensitive data.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn mask_sensitive(value: &str) -> String {
        let count = value.chars().count();
        if count <= 8 {
            return "***".to_string();
        }
        let head = value.chars().take(4).collect::<String>();
        let tail = value.chars().skip(count - 4).collect::<String>();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::mask_sensitive(&self.0))
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

/// The client credentials used to authenticate against the Incognia API.
///
/// A `Credential` is validated when it is created and never changes afterward:
/// the client id and secret must not be empty, and the base URL must be an
/// absolute `http` or `https` URL.
#[derive(Clone)]
pub struct Credential {
    client_id: String,
    client_secret: SecureString,
    base_url: Url,
}

impl Credential {
    /// Creates validated client credentials.
    ///
    /// The base URL is normalized to end with a `/`, so that relative endpoint paths
    /// (like `token` or `onboarding/signups`) are resolved below it.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Configuration`] if a value is empty, or if the base URL
    /// cannot be parsed or does not use the `http`/`https` scheme.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
        base_url: impl AsRef<str>,
    ) -> Result<Self, IncogniaError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        let base_url = base_url.as_ref();

        if client_id.is_empty() {
            return Err(IncogniaError::configuration("'client id' cannot be empty"));
        }
        if client_secret.is_empty() {
            return Err(IncogniaError::configuration(
                "'client secret' cannot be empty",
            ));
        }
        if base_url.is_empty() {
            return Err(IncogniaError::configuration("'api url' cannot be empty"));
        }

        let mut base_url = Url::parse(base_url).map_err(|err| {
            IncogniaError::configuration(format!("invalid api url '{base_url}': {err}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(IncogniaError::configuration(format!(
                "unsupported api url scheme '{}'",
                base_url.scheme()
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let credential = Self {
            client_id,
            client_secret,
            base_url,
        };
        // Fail now rather than on the first token request
        credential.basic_authorization()?;

        Ok(credential)
    }

    /// Returns the client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the base URL all endpoint paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path relative to the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, IncogniaError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| IncogniaError::invalid_argument(format!("invalid path '{path}': {err}")))
    }

    /// Builds the `Basic base64(client_id:client_secret)` header value for the token endpoint.
    pub(crate) fn basic_authorization(&self) -> Result<HeaderValue, IncogniaError> {
        let raw = format!("{}:{}", self.client_id, self.client_secret.as_str());
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw);

        let mut value = HeaderValue::from_str(&format!("Basic {encoded}")).map_err(|err| {
            IncogniaError::configuration(format!("invalid client credentials: {err}"))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}
