use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::PersonId;

/// An event reported to Incognia about a past signup, login or payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum FeedbackEvent {
    SignupAccepted,
    SignupDeclined,
    PaymentAccepted,
    PaymentAcceptedByThirdParty,
    PaymentAcceptedByControlGroup,
    PaymentDeclined,
    PaymentDeclinedByRiskAnalysis,
    PaymentDeclinedByManualReview,
    PaymentDeclinedByBusiness,
    PaymentDeclinedByAcquirer,
    LoginAccepted,
    LoginDeclined,
    Verified,
    IdentityFraud,
    AccountTakeover,
    ChargebackNotification,
    Chargeback,
    MposFraud,
    ChallengePassed,
    ChallengeFailed,
    PasswordChangedSuccessfully,
    PasswordChangeFailed,
    PromotionAbuse,
}

/// Identifies what a feedback is about. Set at least one identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackIdentifiers {
    /// The installation id reported by the SDK.
    pub installation_id: Option<String>,
    /// The session token of the web SDK.
    pub session_token: Option<String>,
    /// The request token generated by the SDK.
    pub request_token: Option<String>,
    /// The id of a login, from [`TransactionAssessment::id`](super::TransactionAssessment::id).
    pub login_id: Option<String>,
    /// The id of a payment, from [`TransactionAssessment::id`](super::TransactionAssessment::id).
    pub payment_id: Option<String>,
    /// The id of a signup, from [`SignupAssessment::id`](super::SignupAssessment::id).
    pub signup_id: Option<String>,
    /// The account the feedback is about.
    pub account_id: Option<String>,
    /// An id of the user in the calling system.
    pub external_id: Option<String>,
    /// When the feedback stops being relevant.
    pub expires_at: Option<Timestamp>,
    /// A personal identifier of the user.
    pub person_id: Option<PersonId>,
}

/// The body of `POST feedbacks`.
#[derive(Debug, Serialize)]
pub(crate) struct FeedbackBody<'a> {
    event: FeedbackEvent,
    /// Epoch milliseconds.
    timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    installation_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    login_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signup_id: Option<&'a str>,
    /// RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    person_id: Option<&'a PersonId>,
}

impl<'a> FeedbackBody<'a> {
    pub(crate) fn new(
        event: FeedbackEvent,
        timestamp: Timestamp,
        identifiers: &'a FeedbackIdentifiers,
    ) -> Self {
        Self {
            event,
            timestamp: timestamp.as_millisecond(),
            account_id: identifiers.account_id.as_deref(),
            external_id: identifiers.external_id.as_deref(),
            installation_id: identifiers.installation_id.as_deref(),
            session_token: identifiers.session_token.as_deref(),
            request_token: identifiers.request_token.as_deref(),
            payment_id: identifiers.payment_id.as_deref(),
            login_id: identifiers.login_id.as_deref(),
            signup_id: identifiers.signup_id.as_deref(),
            expires_at: identifiers.expires_at.map(|expires_at| expires_at.to_string()),
            person_id: identifiers.person_id.as_ref(),
        }
    }
}
