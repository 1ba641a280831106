//! Client credentials authentication.
//!
//! The Incognia API only accepts calls carrying a bearer token obtained from the
//! `token` endpoint with the client credentials grant. [`TokenAcquirer`] performs
//! that exchange and [`TokenCache`] keeps the current token, so that the endpoint is
//! called once per token lifetime whatever the number of concurrent callers.
//!
//! A token is refreshed [`REFRESH_THRESHOLD`] before it expires.

mod provider;
mod token;

pub use self::provider::TokenAcquirer;
pub use self::token::{REFRESH_THRESHOLD, Token, TokenCache};
