//! Auth configuration types
//!
//! Placement of the caller's credential. The credential itself is supplied
//! per page request.

use crate::error::{Error, Result};
use crate::loader::AuthDefinition;
use serde::{Deserialize, Serialize};

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    #[default]
    Header,
    /// Place in query parameter
    Query,
}

/// How a credential is attached to each request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthScheme {
    /// No authentication
    None,

    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,

    /// HTTP Basic, token is `user:password` or already base64 encoded
    Basic,

    /// Token under a custom header or query parameter
    ApiKey {
        /// Where to place the key
        location: Location,
        /// Header or query parameter name
        name: String,
        /// Prefix to add before the token (e.g., "Token ")
        prefix: Option<String>,
    },
}

impl AuthScheme {
    /// Resolve an auth definition
    pub fn from_definition(def: &AuthDefinition) -> Result<Self> {
        Ok(match def {
            AuthDefinition::None => Self::None,
            AuthDefinition::Bearer => Self::Bearer,
            AuthDefinition::Basic => Self::Basic,
            AuthDefinition::ApiKey {
                name,
                location,
                prefix,
            } => {
                let location = match location.as_str() {
                    "header" => Location::Header,
                    "query" => Location::Query,
                    other => {
                        return Err(Error::invalid_datasource_config(format!(
                            "Unknown api_key location '{other}', expected 'header' or 'query'"
                        )))
                    }
                };
                Self::ApiKey {
                    location,
                    name: name.clone(),
                    prefix: prefix.clone(),
                }
            }
        })
    }
}
