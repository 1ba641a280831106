use headers::ContentType;
use serde::Serialize;

use super::IncogniaError;

/// The encoded body of a request, with its content type.
#[derive(Clone, PartialEq, derive_more::Debug)]
pub struct CallBody {
    pub(crate) content_type: ContentType,
    #[debug(ignore)]
    pub(crate) data: Vec<u8>,
}

impl CallBody {
    /// Creates an `application/json` body.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Serialization`] if the value cannot be encoded.
    pub fn json<T>(t: &T) -> Result<Self, IncogniaError>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(t).map_err(|err| IncogniaError::Serialization {
            message: format!("failed to encode JSON body: {err}"),
        })?;

        Ok(Self {
            content_type: ContentType::json(),
            data,
        })
    }

    /// Creates an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Serialization`] if the value cannot be encoded as a form.
    pub fn form<T>(t: &T) -> Result<Self, IncogniaError>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_urlencoded::to_string(t)
            .map_err(|err| IncogniaError::Serialization {
                message: format!("failed to encode form body: {err}"),
            })?
            .into_bytes();

        Ok(Self {
            content_type: ContentType::form_url_encoded(),
            data,
        })
    }

    /// Returns the content type sent with this body.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Returns the encoded bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
