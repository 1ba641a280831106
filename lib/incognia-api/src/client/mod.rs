use std::sync::Arc;

use jiff::Timestamp;
use tracing::debug;
use url::Url;

mod auth;
pub use self::auth::{Credential, SecureString};

mod body;
pub use self::body::CallBody;

mod builder;
pub use self::builder::{ClientOptions, DEFAULT_BASE_URL, IncogniaApiBuilder};

mod call;
pub use self::call::{ApiCall, CallQuery};

mod error;
pub use self::error::{ApiErrorPayload, IncogniaError, TransportErrorKind};

pub mod oauth2;
use self::oauth2::Token;

mod output;
pub use self::output::Output;

mod transport;
pub use self::transport::AuthenticatedTransport;

mod user_agent;
pub use self::user_agent::user_agent;

use crate::models::{
    FeedbackEvent, FeedbackIdentifiers, RegisterLoginRequest, RegisterPaymentRequest,
    RegisterSignupRequest, RegisterWebLoginRequest, RegisterWebSignupRequest, SignupAssessment,
    TransactionAssessment,
};
use crate::models::{FeedbackBody, SignupBody, TransactionBody};

const SIGNUPS_PATH: &str = "onboarding/signups";
const TRANSACTIONS_PATH: &str = "authentication/transactions";
const FEEDBACKS_PATH: &str = "feedbacks";

const EVALUATION_PARAMETER: &str = "eval";
const DRY_RUN_PARAMETER: &str = "dry_run";

/// Client of the Incognia API.
///
/// Each client owns its connection pool and its token cache: the first call requests a
/// token, later calls reuse it until it is about to expire. Share a client between tasks
/// with an [`Arc`], or keep one per credential set in a
/// [`ClientRegistry`](crate::ClientRegistry).
///
/// # Example
///
/// ```rust,no_run
/// use incognia_api::IncogniaApi;
/// use incognia_api::models::RegisterLoginRequest;
///
/// # async fn example() -> Result<(), incognia_api::IncogniaError> {
/// let api = IncogniaApi::new("client-id", "client-secret")?;
///
/// let assessment = api
///     .register_login(&RegisterLoginRequest {
///         installation_id: Some("installation-id".to_string()),
///         account_id: "account-id".to_string(),
///         ..RegisterLoginRequest::default()
///     })
///     .await?;
/// println!("{}", assessment.risk_assessment);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IncogniaApi {
    transport: AuthenticatedTransport,
    options: ClientOptions,
}

// Create
impl IncogniaApi {
    /// Creates a builder for a client with the given credentials.
    pub fn builder(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> IncogniaApiBuilder {
        IncogniaApiBuilder::new(client_id, client_secret)
    }

    /// Creates a client for the production API with default options.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Configuration`] if the client id or secret is empty.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<SecureString>,
    ) -> Result<Self, IncogniaError> {
        Self::builder(client_id, client_secret).build()
    }
}

// Accessors
impl IncogniaApi {
    /// Returns the client id.
    pub fn client_id(&self) -> &str {
        self.transport.credential().client_id()
    }

    /// Returns the base URL endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        self.transport.credential().base_url()
    }

    /// Returns the network options.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Returns the transport, to call endpoints without a dedicated method.
    pub fn transport(&self) -> &AuthenticatedTransport {
        &self.transport
    }

    /// Returns a fresh access token, requesting one if needed.
    ///
    /// # Errors
    ///
    /// Returns the token endpoint failure, [`IncogniaError::Api`] with a `401` status for
    /// invalid credentials.
    pub async fn token(&self) -> Result<Arc<Token>, IncogniaError> {
        self.transport.token().await
    }
}

// Onboarding
impl IncogniaApi {
    /// Registers a signup made from a mobile application and returns its assessment.
    ///
    /// # Errors
    ///
    /// Returns an [`IncogniaError`] if the call fails or the response cannot be decoded.
    pub async fn register_signup(
        &self,
        request: &RegisterSignupRequest,
    ) -> Result<SignupAssessment, IncogniaError> {
        let call = ApiCall::post(SIGNUPS_PATH).json(&SignupBody::from(request))?;
        self.transport.execute_json(call).await
    }

    /// Registers a signup made from a web page and returns its assessment.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::InvalidArgument`] if neither a request token nor a session
    /// token is set, or an [`IncogniaError`] if the call fails.
    pub async fn register_web_signup(
        &self,
        request: &RegisterWebSignupRequest,
    ) -> Result<SignupAssessment, IncogniaError> {
        let token = request
            .request_token
            .as_deref()
            .or(request.session_token.as_deref());
        assert_not_empty(token, "request token")?;

        let call = ApiCall::post(SIGNUPS_PATH).json(&SignupBody::from(request))?;
        self.transport.execute_json(call).await
    }
}

// Transactions
impl IncogniaApi {
    /// Registers a login made from a mobile application and returns its assessment.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::InvalidArgument`] if the account id is empty, or an
    /// [`IncogniaError`] if the call fails.
    pub async fn register_login(
        &self,
        request: &RegisterLoginRequest,
    ) -> Result<TransactionAssessment, IncogniaError> {
        assert_not_empty(Some(request.account_id.as_str()), "account id")?;

        let call = ApiCall::post(TRANSACTIONS_PATH)
            .with_optional_query(EVALUATION_PARAMETER, request.evaluate_transaction)
            .json(&TransactionBody::from(request))?;
        self.transport.execute_json(call).await
    }

    /// Registers a login made from a web page and returns its assessment.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::InvalidArgument`] if the account id is empty or if neither a
    /// request token nor a session token is set, or an [`IncogniaError`] if the call fails.
    pub async fn register_web_login(
        &self,
        request: &RegisterWebLoginRequest,
    ) -> Result<TransactionAssessment, IncogniaError> {
        assert_not_empty(Some(request.account_id.as_str()), "account id")?;
        let token = request
            .request_token
            .as_deref()
            .or(request.session_token.as_deref());
        assert_not_empty(token, "request token")?;

        let call = ApiCall::post(TRANSACTIONS_PATH)
            .with_optional_query(EVALUATION_PARAMETER, request.evaluate_transaction)
            .json(&TransactionBody::from(request))?;
        self.transport.execute_json(call).await
    }

    /// Registers a payment and returns its assessment.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::InvalidArgument`] if the account id is empty, or an
    /// [`IncogniaError`] if the call fails.
    pub async fn register_payment(
        &self,
        request: &RegisterPaymentRequest,
    ) -> Result<TransactionAssessment, IncogniaError> {
        assert_not_empty(Some(request.account_id.as_str()), "account id")?;

        let call = ApiCall::post(TRANSACTIONS_PATH)
            .with_optional_query(EVALUATION_PARAMETER, request.evaluate_transaction)
            .json(&TransactionBody::from(request))?;
        self.transport.execute_json(call).await
    }
}

// Feedbacks
impl IncogniaApi {
    /// Reports an event about a past signup, login or payment.
    ///
    /// The response body is ignored, and may be empty.
    ///
    /// # Errors
    ///
    /// Returns an [`IncogniaError`] if the call fails.
    pub async fn register_feedback(
        &self,
        event: FeedbackEvent,
        timestamp: Timestamp,
        identifiers: &FeedbackIdentifiers,
    ) -> Result<(), IncogniaError> {
        self.send_feedback(event, timestamp, identifiers, false)
            .await
    }

    /// Validates a feedback without recording it.
    ///
    /// # Errors
    ///
    /// Returns an [`IncogniaError`] if the call fails, [`IncogniaError::Api`] with a `4xx`
    /// status if the feedback is invalid.
    pub async fn register_feedback_dry_run(
        &self,
        event: FeedbackEvent,
        timestamp: Timestamp,
        identifiers: &FeedbackIdentifiers,
    ) -> Result<(), IncogniaError> {
        self.send_feedback(event, timestamp, identifiers, true)
            .await
    }

    async fn send_feedback(
        &self,
        event: FeedbackEvent,
        timestamp: Timestamp,
        identifiers: &FeedbackIdentifiers,
        dry_run: bool,
    ) -> Result<(), IncogniaError> {
        debug!(?event, dry_run, "sending feedback");
        let call = ApiCall::post(FEEDBACKS_PATH)
            .with_query(DRY_RUN_PARAMETER, dry_run)
            .json(&FeedbackBody::new(event, timestamp, identifiers))?;
        self.transport.execute_empty(call).await
    }
}

fn assert_not_empty(value: Option<&str>, name: &str) -> Result<(), IncogniaError> {
    match value {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(IncogniaError::invalid_argument(format!(
            "'{name}' cannot be empty"
        ))),
    }
}
