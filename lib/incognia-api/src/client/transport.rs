use std::sync::Arc;

use headers::HeaderMapExt;
use http::header::{AUTHORIZATION, USER_AGENT};
use http::HeaderValue;
use reqwest::{Body, Request};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::oauth2::{Token, TokenAcquirer, TokenCache};
use super::output::Output;
use super::{ApiCall, Credential, IncogniaError, user_agent};

/// Executes calls against domain endpoints with a valid bearer token.
///
/// The transport owns the token cache of one client: every call first obtains a
/// fresh token (refreshing it at most once for concurrent callers), then sends the
/// request through the shared connection pool. Calls are never retried.
#[derive(Debug)]
pub struct AuthenticatedTransport {
    client: reqwest::Client,
    credential: Credential,
    acquirer: TokenAcquirer,
    tokens: TokenCache,
}

impl AuthenticatedTransport {
    /// Creates a transport over an HTTP client, with an empty token cache.
    pub fn new(client: reqwest::Client, credential: Credential) -> Self {
        let acquirer = TokenAcquirer::new(client.clone(), credential.clone());
        Self {
            client,
            credential,
            acquirer,
            tokens: TokenCache::new(),
        }
    }

    /// Returns the credential used by this transport.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Returns a fresh token, requesting one if needed.
    ///
    /// # Errors
    ///
    /// Returns the token endpoint failure: [`IncogniaError::Api`] (e.g. `401`),
    /// [`IncogniaError::Transport`] or [`IncogniaError::Serialization`].
    pub async fn token(&self) -> Result<Arc<Token>, IncogniaError> {
        self.tokens
            .get_or_refresh(|| self.acquirer.acquire())
            .await
    }

    /// Sends the call and returns the body of the successful response.
    ///
    /// # Errors
    ///
    /// - the token endpoint failure, if no token could be obtained
    /// - [`IncogniaError::Api`] if the endpoint answers with a non-success status
    /// - [`IncogniaError::Transport`] on network failure or timeout
    pub async fn execute(&self, call: ApiCall) -> Result<Output, IncogniaError> {
        let token = self.token().await?;
        let request = self.build_request(call, &token)?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending...");
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                let error = IncogniaError::from(err);
                warn!(%method, %url, %error, "call failed");
                return Err(error);
            }
        };
        let status = response.status();
        debug!(%method, %url, %status, "...receiving");

        if !status.is_success() {
            // The status is the failure, a body that cannot be read is treated as empty
            let body = response.bytes().await.unwrap_or_default();
            let error = IncogniaError::from_status(status, &body);
            warn!(%method, %url, %status, "call rejected");
            return Err(error);
        }

        let body = response.bytes().await?;
        Ok(Output::from_bytes(&body))
    }

    /// Sends the call and decodes the JSON response body.
    ///
    /// Unknown fields in the response are ignored.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute), plus [`IncogniaError::Serialization`] if the body
    /// is empty or cannot be decoded into `R`.
    pub async fn execute_json<R>(&self, call: ApiCall) -> Result<R, IncogniaError>
    where
        R: DeserializeOwned,
    {
        let output = self.execute(call).await?;
        output.decode(std::any::type_name::<R>())
    }

    /// Sends the call and discards the response body, which may be empty.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn execute_empty(&self, call: ApiCall) -> Result<(), IncogniaError> {
        let output = self.execute(call).await?;
        if !output.is_empty() {
            debug!("ignoring response body");
        }
        Ok(())
    }

    fn build_request(&self, call: ApiCall, token: &Token) -> Result<Request, IncogniaError> {
        let ApiCall {
            method,
            path,
            query,
            body,
        } = call;

        let mut url = self.credential.endpoint(&path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(&query);
        }

        let mut request = Request::new(method, url);
        let headers = request.headers_mut();

        let mut authorization = HeaderValue::from_str(&token.authorization()).map_err(|err| {
            IncogniaError::Serialization {
                message: format!("invalid access token: {err}"),
            }
        })?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(USER_AGENT, user_agent::header_value());

        // No body, no content type
        if let Some(body) = body {
            headers.typed_insert(body.content_type);
            *request.body_mut() = Some(Body::from(body.data));
        }

        Ok(request)
    }
}
