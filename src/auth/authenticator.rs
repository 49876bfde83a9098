//! Authenticator implementation
//!
//! Applies a request's credential to an outgoing HTTP request.

use super::types::{AuthScheme, Location};
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    scheme: AuthScheme,
}

impl Authenticator {
    /// Create a new authenticator with the given scheme
    pub fn new(scheme: AuthScheme) -> Self {
        Self { scheme }
    }

    /// Scheme this authenticator applies
    pub fn scheme(&self) -> &AuthScheme {
        &self.scheme
    }

    /// Apply authentication to a request builder
    ///
    /// An empty token leaves the request untouched.
    pub fn apply(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        if token.is_empty() {
            return req;
        }

        match &self.scheme {
            AuthScheme::None => req,

            AuthScheme::Bearer => req.bearer_auth(token),

            AuthScheme::Basic => match token.split_once(':') {
                Some((username, password)) => req.basic_auth(username, Some(password)),
                None => req.header(reqwest::header::AUTHORIZATION, format!("Basic {token}")),
            },

            AuthScheme::ApiKey {
                location,
                name,
                prefix,
            } => {
                let value = format!("{}{token}", prefix.as_deref().unwrap_or(""));
                match location {
                    Location::Header => req.header(name.as_str(), value),
                    Location::Query => req.query(&[(name.as_str(), value.as_str())]),
                }
            }
        }
    }
}
