//! Exchanges client credentials for an access token.

use std::time::Duration;

use headers::HeaderMapExt;
use http::Method;
use http::header::{AUTHORIZATION, USER_AGENT};
use reqwest::{Body, Request};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::token::Token;
use crate::client::output::Output;
use crate::client::{CallBody, Credential, IncogniaError, user_agent};

/// Path of the token endpoint, relative to the base URL.
pub(crate) const TOKEN_PATH: &str = "token";

#[derive(Debug, Serialize)]
struct TokenRequest {
    grant_type: &'static str,
}

impl TokenRequest {
    const CLIENT_CREDENTIALS: Self = Self {
        grant_type: "client_credentials",
    };
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    token_type: String,
}

/// Performs the client credentials grant against the token endpoint.
///
/// A single `POST {base_url}/token`, never retried: any failure is returned to the
/// caller, which is the one that needed a token.
#[derive(Debug, Clone)]
pub struct TokenAcquirer {
    client: reqwest::Client,
    credential: Credential,
}

impl TokenAcquirer {
    /// Creates an acquirer sharing the given HTTP client (and its connection pool).
    pub fn new(client: reqwest::Client, credential: Credential) -> Self {
        Self { client, credential }
    }

    /// Requests a new token.
    ///
    /// # Errors
    ///
    /// - [`IncogniaError::Api`] when the token endpoint answers with a non-success status,
    ///   `401` for invalid credentials
    /// - [`IncogniaError::Transport`] on network failure or timeout
    /// - [`IncogniaError::Serialization`] when the token response cannot be decoded
    pub async fn acquire(&self) -> Result<Token, IncogniaError> {
        let request = self.build_request()?;

        debug!(url = %request.url(), "requesting access token");
        let response = self.client.execute(request).await?;
        let status = response.status();
        debug!(%status, "...token endpoint answered");

        if !status.is_success() {
            // Keep the status even when the error body cannot be read
            let body = response.bytes().await.unwrap_or_default();
            warn!(%status, "token request rejected");
            return Err(IncogniaError::from_status(status, &body));
        }

        let body = response.bytes().await?;
        let TokenResponse {
            access_token,
            expires_in,
            token_type,
        } = Output::from_bytes(&body).decode("token response")?;

        Token::new(access_token, token_type, Duration::from_secs(expires_in))
    }

    fn build_request(&self) -> Result<Request, IncogniaError> {
        let url = self.credential.endpoint(TOKEN_PATH)?;
        let mut request = Request::new(Method::POST, url);

        let body = CallBody::form(&TokenRequest::CLIENT_CREDENTIALS)?;
        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, self.credential.basic_authorization()?);
        headers.insert(USER_AGENT, user_agent::header_value());
        headers.typed_insert(body.content_type);
        *request.body_mut() = Some(Body::from(body.data));

        Ok(request)
    }
}
