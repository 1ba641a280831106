use http::StatusCode;
use serde_json::{Map, Value};

/// Payload attached to an [`IncogniaError::Api`] error.
///
/// The body of a non-success response, parsed as a JSON object.
/// It is empty when the server did not send a body.
pub type ApiErrorPayload = Map<String, Value>;

/// Sub-kind of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TransportErrorKind {
    /// The call did not complete within the configured timeout.
    #[display("network call timeout")]
    Timeout,

    /// Any other network-level failure (connection refused or reset, DNS, ...).
    #[display("network call failed")]
    Io,
}

/// Errors returned by the Incognia client.
///
/// Callers can branch on the variant: a [`TransportErrorKind::Timeout`] is usually safe to
/// retry, an [`IncogniaError::Api`] with a `401` status points to invalid credentials, and
/// other `4xx` statuses to invalid request data.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum IncogniaError {
    /// Invalid client configuration, detected when building the client.
    #[display("Invalid configuration: {reason}")]
    Configuration {
        /// Description of the invalid value.
        reason: String,
    },

    /// Invalid argument passed to an API operation, detected before any network call.
    #[display("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the invalid argument.
        reason: String,
    },

    /// The token endpoint or a domain endpoint answered with a non-success status.
    #[display("Incognia API request failed with status code {status_code}")]
    Api {
        /// The HTTP status code of the response.
        status_code: u16,
        /// The response body, parsed as a JSON object.
        payload: ApiErrorPayload,
    },

    /// Network-level failure or timeout.
    #[display("{kind}")]
    Transport {
        /// Whether the failure is a timeout or another I/O error.
        kind: TransportErrorKind,
        /// The underlying HTTP client error.
        source: reqwest::Error,
    },

    /// A request body could not be encoded, or a response body could not be decoded.
    #[display("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },
}

impl IncogniaError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the call was aborted because it exceeded the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                kind: TransportErrorKind::Timeout,
                ..
            }
        )
    }

    /// Returns the HTTP status code of an [`IncogniaError::Api`] error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Returns the response payload of an [`IncogniaError::Api`] error.
    pub fn payload(&self) -> Option<&ApiErrorPayload> {
        match self {
            Self::Api { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Builds the error for a non-success response from its raw body.
    ///
    /// An empty body, or a body that is not a JSON object, yields an empty payload:
    /// the status already tells the failure, so no secondary parse error is raised.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let payload = if body.iter().all(u8::is_ascii_whitespace) {
            ApiErrorPayload::new()
        } else {
            serde_json::from_slice::<ApiErrorPayload>(body).unwrap_or_else(|error| {
                tracing::debug!(%error, "error response body is not a JSON object");
                ApiErrorPayload::new()
            })
        };

        Self::Api {
            status_code: status.as_u16(),
            payload,
        }
    }
}

impl From<reqwest::Error> for IncogniaError {
    fn from(source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() {
            TransportErrorKind::Timeout
        } else {
            TransportErrorKind::Io
        };
        Self::Transport { kind, source }
    }
}
