use http::Method;
use indexmap::IndexMap;
use serde::Serialize;

use super::{CallBody, IncogniaError};

/// Query parameters of a call, sent in insertion order.
pub type CallQuery = IndexMap<String, String>;

/// Describes one call to a domain endpoint.
///
/// The path is relative to the client base URL. An `ApiCall` only holds data:
/// it is sent with [`AuthenticatedTransport`](super::AuthenticatedTransport).
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: CallQuery,
    pub(crate) body: Option<CallBody>,
}

impl ApiCall {
    /// Creates a call without query parameters nor body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: CallQuery::new(),
            body: None,
        }
    }

    /// Creates a `POST` call.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a `GET` call.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Adds a query parameter, replacing a previous value with the same name.
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(name.into(), value.to_string());
        self
    }

    /// Adds a query parameter only if a value is present.
    pub fn with_optional_query<T>(self, name: impl Into<String>, value: Option<T>) -> Self
    where
        T: ToString,
    {
        match value {
            Some(value) => self.with_query(name, value),
            None => self,
        }
    }

    /// Sets a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`IncogniaError::Serialization`] if the body cannot be encoded.
    pub fn json<T>(mut self, body: &T) -> Result<Self, IncogniaError>
    where
        T: Serialize + ?Sized,
    {
        self.body = Some(CallBody::json(body)?);
        Ok(self)
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the path, relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters.
    pub fn query(&self) -> &CallQuery {
        &self.query
    }

    /// Returns the body, if any.
    pub fn body(&self) -> Option<&CallBody> {
        self.body.as_ref()
    }
}
