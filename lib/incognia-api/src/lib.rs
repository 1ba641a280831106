//! # Incognia API
//!
//! Async client for the [Incognia](https://www.incognia.com) risk assessment API.
//!
//! The client registers signups, logins and payments, returns their risk assessment,
//! and reports feedback events. It authenticates with the OAuth2 client credentials
//! grant: tokens are requested on demand, cached, and refreshed once shortly before
//! they expire, whatever the number of concurrent callers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use incognia_api::IncogniaApi;
//! use incognia_api::models::{Address, RegisterSignupRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), incognia_api::IncogniaError> {
//! let api = IncogniaApi::builder("client-id", "client-secret")
//!     .with_timeout(5_000)
//!     .build()?;
//!
//! let assessment = api
//!     .register_signup(&RegisterSignupRequest {
//!         installation_id: Some("installation-id".to_string()),
//!         address: Some(Address::from_line("Rua do Bom Jesus, 183, Recife")),
//!         ..RegisterSignupRequest::default()
//!     })
//!     .await?;
//!
//! println!("signup {} is {}", assessment.id, assessment.risk_assessment);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feedback
//!
//! ```rust,no_run
//! use incognia_api::IncogniaApi;
//! use incognia_api::models::{FeedbackEvent, FeedbackIdentifiers};
//!
//! # async fn example(api: &IncogniaApi) -> Result<(), incognia_api::IncogniaError> {
//! api.register_feedback(
//!     FeedbackEvent::PaymentAccepted,
//!     jiff::Timestamp::now(),
//!     &FeedbackIdentifiers {
//!         payment_id: Some("payment-id".to_string()),
//!         ..FeedbackIdentifiers::default()
//!     },
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every operation returns an [`IncogniaError`]. Nothing is retried by the client:
//!
//! ```rust,no_run
//! use incognia_api::{IncogniaApi, IncogniaError};
//! use incognia_api::models::RegisterLoginRequest;
//!
//! # async fn example(api: &IncogniaApi, request: RegisterLoginRequest) {
//! match api.register_login(&request).await {
//!     Ok(assessment) => println!("{}", assessment.risk_assessment),
//!     Err(error) if error.is_timeout() => println!("timeout, try again later"),
//!     Err(IncogniaError::Api { status_code: 401, .. }) => println!("invalid credentials"),
//!     Err(IncogniaError::Api { status_code, payload }) => println!("{status_code}: {payload:?}"),
//!     Err(error) => println!("{error}"),
//! }
//! # }
//! ```
//!
//! ## Sharing clients
//!
//! A client owns a connection pool and a token cache, so it should be created once and
//! shared, behind an [`Arc`](std::sync::Arc). A [`ClientRegistry`] keeps one client
//! per credential set.
//!
//! ## Logging
//!
//! The client emits [`tracing`] events: calls at `debug` level, token refreshes at `info`
//! level, failures at `warn` level. Secrets and tokens are never logged.

mod client;
pub mod models;
mod registry;

pub use self::client::oauth2;
pub use self::client::{
    ApiCall, ApiErrorPayload, AuthenticatedTransport, CallBody, CallQuery, ClientOptions,
    Credential, DEFAULT_BASE_URL, IncogniaApi, IncogniaApiBuilder, IncogniaError, Output,
    SecureString, TransportErrorKind, user_agent,
};
pub use self::registry::ClientRegistry;
