//! Access token and its cache.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::{IncogniaError, SecureString};

/// A token closer than this to its expiry is treated as already expired.
///
/// Absorbs clock skew and the latency of the request that will carry it.
/// Tokens living less than twice this duration use half their lifetime instead,
/// see [`Token::refresh_threshold`].
pub const REFRESH_THRESHOLD: Duration = Duration::from_secs(10);

/// A bearer token obtained with the client credentials grant.
///
/// A token never changes once created: refreshing produces a new value.
#[derive(Clone)]
pub struct Token {
    access_token: SecureString,
    token_type: String,
    expires_in: Duration,
    expires_at: Instant,
}

impl Token {
    /// Creates a token valid for `expires_in` from now.
    ///
    /// The expiry instant is always computed locally.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Serialization`] if the lifetime is zero or too large
    /// to be represented.
    pub fn new(
        access_token: impl Into<SecureString>,
        token_type: impl Into<String>,
        expires_in: Duration,
    ) -> Result<Self, IncogniaError> {
        if expires_in.is_zero() {
            return Err(IncogniaError::Serialization {
                message: "token 'expires_in' must be positive".to_string(),
            });
        }
        let expires_at = Instant::now()
            .checked_add(expires_in)
            .ok_or_else(|| IncogniaError::Serialization {
                message: format!("token 'expires_in' is out of range: {expires_in:?}"),
            })?;

        Ok(Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_in,
            expires_at,
        })
    }

    /// Returns the access token value.
    pub fn access_token(&self) -> &str {
        self.access_token.as_str()
    }

    /// Returns the token type, usually `Bearer`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the lifetime announced by the server.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Returns the instant the token expires.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns `true` while the token is usable, `now < expires_at - threshold`.
    pub fn is_fresh(&self, threshold: Duration) -> bool {
        Instant::now()
            .checked_add(threshold)
            .is_some_and(|limit| limit < self.expires_at)
    }

    /// Returns the threshold used by the cache: [`REFRESH_THRESHOLD`], capped to half the
    /// token lifetime.
    pub fn refresh_threshold(&self) -> Duration {
        REFRESH_THRESHOLD.min(self.expires_in / 2)
    }

    /// Returns the `Authorization` header value for domain requests.
    pub(crate) fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token.as_str())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Holds at most one token and refreshes it at most once per expiry.
///
/// Reading a still-fresh token only takes a shared read on the slot.
/// When the token is absent or about to expire, callers serialize on the refresh lock,
/// then check again: whoever comes after a successful refresh reuses its token, so
/// concurrent callers cause a single request to the token endpoint.
///
/// A failed refresh leaves the slot untouched and the error goes to the caller
/// that attempted it; the next caller tries again.
#[derive(Debug, Default)]
pub struct TokenCache {
    current: RwLock<Option<Arc<Token>>>,
    refresh_lock: Mutex<()>,
}

impl TokenCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if it is still fresh.
    pub fn fresh_token(&self) -> Option<Arc<Token>> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|token| token.is_fresh(token.refresh_threshold()))
            .cloned()
    }

    /// Returns a fresh token, calling `acquire` if none is cached.
    ///
    /// # Errors
    ///
    /// Returns the error of `acquire` unchanged.
    pub async fn get_or_refresh<F, Fut>(&self, acquire: F) -> Result<Arc<Token>, IncogniaError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Token, IncogniaError>>,
    {
        if let Some(token) = self.fresh_token() {
            return Ok(token);
        }

        let _refreshing = self.refresh_lock.lock().await;
        if let Some(token) = self.fresh_token() {
            debug!("token refreshed by a concurrent caller");
            return Ok(token);
        }

        let token = match acquire().await {
            Ok(token) => Arc::new(token),
            Err(error) => {
                warn!(%error, "token refresh failed");
                return Err(error);
            }
        };
        info!(
            token_type = token.token_type(),
            expires_in = ?token.expires_in(),
            "token refreshed"
        );

        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::clone(&token));
        Ok(token)
    }
}
