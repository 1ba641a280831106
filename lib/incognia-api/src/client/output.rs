use serde::de::DeserializeOwned;
use tracing::debug;

use super::IncogniaError;

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Output {
    /// No body, or a body made of whitespace only.
    Empty,
    /// Any other body, kept as received.
    Bytes(Vec<u8>),
}

impl Output {
    pub(crate) fn from_bytes(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            Self::Empty
        } else {
            Self::Bytes(body.to_vec())
        }
    }

    /// Returns `true` if the server sent no body.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Decodes the body as JSON.
    ///
    /// `what` names the decoded value in the error message.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Serialization`] if the body is empty or cannot be decoded
    /// into `T`. The message contains the path of the offending field.
    pub fn decode<T>(&self, what: &str) -> Result<T, IncogniaError>
    where
        T: DeserializeOwned,
    {
        let Self::Bytes(bytes) = self else {
            return Err(IncogniaError::Serialization {
                message: format!("empty body, expected a {what}"),
            });
        };

        let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(deserializer).map_err(|err| {
            let path = err.path().to_string();
            debug!(%path, error = %err.inner(), "failed to decode {what}");
            IncogniaError::Serialization {
                message: format!("failed to decode {what} at '{path}': {}", err.inner()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        value: u32,
    }

    #[test]
    fn should_detect_empty_output() {
        assert!(Output::from_bytes(b"").is_empty());
        assert!(Output::from_bytes(b" \n").is_empty());
        assert!(!Output::from_bytes(b"{}").is_empty());
    }

    #[test]
    fn should_decode_json_output() {
        let output = Output::from_bytes(br#"{"name": "test", "value": 42}"#);

        let sample: Sample = output.decode("sample").expect("should decode");

        assert_eq!(
            sample,
            Sample {
                name: "test".to_string(),
                value: 42
            }
        );
    }

    #[test]
    fn should_report_field_path_on_decode_error() {
        let output = Output::from_bytes(br#"{"name": "test", "value": "not a number"}"#);

        let error = output
            .decode::<Sample>("sample")
            .expect_err("should fail to decode");

        let message = error.to_string();
        assert!(
            message.starts_with("Serialization error: failed to decode sample at 'value': invalid type"),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn should_fail_to_decode_empty_output() {
        let error = Output::Empty
            .decode::<Sample>("sample")
            .expect_err("should fail to decode");

        insta::assert_snapshot!(error.to_string(), @"Serialization error: empty body, expected a sample");
    }
}
