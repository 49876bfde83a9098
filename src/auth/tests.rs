//! Tests for the auth module

use super::*;
use crate::error::ErrorCode;
use crate::loader::AuthDefinition;
use base64::Engine;

fn build(auth: &Authenticator, token: &str) -> reqwest::Request {
    let client = reqwest::Client::new();
    let req = client.get("https://example.com/api");
    auth.apply(req, token).build().unwrap()
}

#[test]
fn test_no_auth() {
    let auth = Authenticator::new(AuthScheme::None);
    let built = build(&auth, "secret");
    assert!(built.headers().get("Authorization").is_none());
}

#[test]
fn test_bearer_default() {
    let auth = Authenticator::default();
    assert_eq!(auth.scheme(), &AuthScheme::Bearer);

    let built = build(&auth, "xoxb-123");
    assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer xoxb-123");
}

#[test]
fn test_empty_token_is_not_applied() {
    let auth = Authenticator::new(AuthScheme::Bearer);
    let built = build(&auth, "");
    assert!(built.headers().get("Authorization").is_none());
}

#[test]
fn test_basic_auth_user_password() {
    let auth = Authenticator::new(AuthScheme::Basic);
    let built = build(&auth, "me@example.com:api-token");

    let expected = base64::engine::general_purpose::STANDARD.encode("me@example.com:api-token");
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        &format!("Basic {expected}")
    );
}

#[test]
fn test_basic_auth_pre_encoded() {
    let auth = Authenticator::new(AuthScheme::Basic);
    let built = build(&auth, "bWU6dG9rZW4=");
    assert_eq!(built.headers().get("Authorization").unwrap(), "Basic bWU6dG9rZW4=");
}

#[test]
fn test_api_key_header_with_prefix() {
    let auth = Authenticator::new(AuthScheme::ApiKey {
        location: Location::Header,
        name: "Authorization".to_string(),
        prefix: Some("SSWS ".to_string()),
    });

    let built = build(&auth, "my-token");
    assert_eq!(built.headers().get("Authorization").unwrap(), "SSWS my-token");
}

#[test]
fn test_api_key_query() {
    let auth = Authenticator::new(AuthScheme::ApiKey {
        location: Location::Query,
        name: "api_key".to_string(),
        prefix: None,
    });

    let built = build(&auth, "k123");
    assert_eq!(built.url().query(), Some("api_key=k123"));
}

#[test]
fn test_scheme_from_definition() {
    assert_eq!(
        AuthScheme::from_definition(&AuthDefinition::Basic).unwrap(),
        AuthScheme::Basic
    );

    let def = AuthDefinition::ApiKey {
        name: "X-Key".to_string(),
        location: "query".to_string(),
        prefix: None,
    };
    assert_eq!(
        AuthScheme::from_definition(&def).unwrap(),
        AuthScheme::ApiKey {
            location: Location::Query,
            name: "X-Key".to_string(),
            prefix: None,
        }
    );
}

#[test]
fn test_scheme_from_definition_bad_location() {
    let def = AuthDefinition::ApiKey {
        name: "X-Key".to_string(),
        location: "cookie".to_string(),
        prefix: None,
    };
    let err = AuthScheme::from_definition(&def).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDatasourceConfig);
}
