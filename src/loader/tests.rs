//! Tests for YAML loader module

use super::*;
use crate::error::ErrorCode;
use std::io::Write;

// ============================================================================
// Basic Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_definition() {
    let yaml = r#"
name: test-datasource
entities:
  - id: users
    path: /users
    unique_id: id
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(def.name, "test-datasource");
    assert_eq!(def.version, "0.1.0");
    assert_eq!(def.auth, AuthDefinition::Bearer);
    assert!(def.description.is_none());
    assert_eq!(def.entities.len(), 1);

    let users = &def.entities[0];
    assert_eq!(users.id, "users");
    assert_eq!(users.path, "/users");
    assert!(users.records_path.is_none());
    assert!(users.collection.is_none());
    assert_eq!(users.pagination, PaginationDefinition::default());
}

#[test]
fn test_load_definition_with_version_and_description() {
    let yaml = r#"
name: test
version: "1.2.0"
description: Test datasource
entities:
  - { id: users, path: /users, unique_id: id }
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(def.version, "1.2.0");
    assert_eq!(def.description.as_deref(), Some("Test datasource"));
}

// ============================================================================
// Auth Definition Tests
// ============================================================================

#[test]
fn test_load_api_key_auth() {
    let yaml = r#"
name: test
auth:
  type: api_key
  name: X-API-Key
entities:
  - { id: users, path: /users, unique_id: id }
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(
        def.auth,
        AuthDefinition::ApiKey {
            name: "X-API-Key".to_string(),
            location: "header".to_string(),
            prefix: None,
        }
    );
}

#[test]
fn test_load_basic_and_none_auth() {
    let yaml = r#"
name: test
auth: { type: basic }
entities:
  - { id: users, path: /users, unique_id: id }
"#;
    assert_eq!(load_definition_from_str(yaml).unwrap().auth, AuthDefinition::Basic);

    let yaml = r#"
name: test
auth: { type: none }
entities:
  - { id: users, path: /users, unique_id: id }
"#;
    assert_eq!(load_definition_from_str(yaml).unwrap().auth, AuthDefinition::None);
}

// ============================================================================
// HTTP Definition Tests
// ============================================================================

#[test]
fn test_load_http_definition() {
    let yaml = r#"
name: test
http:
  user_agent: directory-sync/1.0
  headers:
    Accept: application/json
entities:
  - { id: users, path: /users, unique_id: id }
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(def.http.user_agent.as_deref(), Some("directory-sync/1.0"));
    assert_eq!(
        def.http.headers.get("Accept").map(String::as_str),
        Some("application/json")
    );
}

// ============================================================================
// Pagination Definition Tests
// ============================================================================

#[test]
fn test_load_offset_pagination_defaults() {
    let yaml = r#"
name: test
entities:
  - id: users
    path: /users
    unique_id: id
    pagination:
      type: offset
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(
        def.entities[0].pagination,
        PaginationDefinition::Offset {
            offset_param: "offset".to_string(),
            limit_param: "limit".to_string(),
            stop: StopConditionDefinition::ShortPage,
        }
    );
}

#[test]
fn test_load_offset_pagination_total_count() {
    let yaml = r#"
name: test
entities:
  - id: issues
    path: /search
    unique_id: id
    pagination:
      type: offset
      offset_param: startAt
      limit_param: maxResults
      stop:
        type: total_count
        path: total
"#;

    let def = load_definition_from_str(yaml).unwrap();
    let PaginationDefinition::Offset {
        offset_param, stop, ..
    } = &def.entities[0].pagination
    else {
        panic!("Expected offset pagination");
    };
    assert_eq!(offset_param, "startAt");
    assert_eq!(
        stop,
        &StopConditionDefinition::TotalCount {
            path: "total".to_string()
        }
    );
}

#[test]
fn test_load_token_pagination() {
    let yaml = r#"
name: test
entities:
  - id: users
    path: /users.list
    unique_id: id
    pagination:
      type: token
      next_token_path: response_metadata.next_cursor
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(
        def.entities[0].pagination,
        PaginationDefinition::Token {
            token_param: "cursor".to_string(),
            limit_param: "limit".to_string(),
            next_token_path: "response_metadata.next_cursor".to_string(),
        }
    );
}

// ============================================================================
// Collection Definition Tests
// ============================================================================

#[test]
fn test_load_member_collection() {
    let yaml = r#"
name: test
entities:
  - { id: groups, path: /groups, unique_id: groupId }
  - id: members
    path: /groups/{{ collection_id }}/members
    unique_id: accountId
    collection:
      shape: member
      parent: groups
"#;

    let def = load_definition_from_str(yaml).unwrap();
    assert_eq!(
        def.entities[1].collection,
        Some(CollectionDefinition::Member {
            parent: "groups".to_string(),
            member_of_attribute: None,
            compose_id: false,
        })
    );
}

#[test]
fn test_load_batch_collection_defaults() {
    let yaml = r#"
name: test
entities:
  - { id: accounts, path: /accounts, unique_id: id }
  - id: entitlements
    path: /accounts/{{ collection_id }}/entitlements
    unique_id: id
    collection:
      shape: batch_entitlement
      parent: accounts
"#;

    let def = load_definition_from_str(yaml).unwrap();
    let collection = def.entities[1].collection.clone().unwrap();
    assert_eq!(collection.parent(), "accounts");
    assert_eq!(
        collection,
        CollectionDefinition::BatchEntitlement {
            parent: "accounts".to_string(),
            parent_batch_size: 100,
            has_children_attribute: None,
            parent_id_attribute: None,
        }
    );
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_validation_empty_name() {
    let yaml = r#"
name: ""
entities:
  - { id: users, path: /users, unique_id: id }
"#;
    let err = load_definition_from_str(yaml).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDatasourceConfig);
    assert!(err.to_string().contains("name cannot be empty"));
}

#[test]
fn test_validation_no_entities() {
    let yaml = r#"
name: test
entities: []
"#;
    let err = load_definition_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("at least one entity"));
}

#[test]
fn test_validation_vars_must_be_mapping() {
    let yaml = r#"
name: test
vars: [1, 2]
entities:
  - { id: users, path: /users, unique_id: id }
"#;
    let err = load_definition_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("vars must be a mapping"));
}

#[test]
fn test_validation_runs_entity_rules() {
    let yaml = r#"
name: test
entities:
  - { id: users, path: /users, unique_id: id }
  - { id: users, path: /people, unique_id: id }
"#;
    let err = load_definition_from_str(yaml).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDatasourceConfig);
}

#[test]
fn test_invalid_yaml() {
    let err = load_definition_from_str("name: [unclosed").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDatasourceConfig);
    assert!(err.to_string().contains("Failed to parse datasource YAML"));
}

#[test]
fn test_unknown_pagination_type() {
    let yaml = r#"
name: test
entities:
  - id: users
    path: /users
    unique_id: id
    pagination:
      type: link_header
"#;
    assert!(load_definition_from_str(yaml).is_err());
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_builtin_by_name() {
    let def = load_definition("jira").unwrap();
    assert_eq!(def.name, "jira");
    assert_eq!(def.auth, AuthDefinition::Basic);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "name: from-file\nentities:\n  - {{ id: users, path: /users, unique_id: id }}"
    )
    .unwrap();

    let def = load_definition(file.path()).unwrap();
    assert_eq!(def.name, "from-file");
}

#[test]
fn test_load_missing_file() {
    let err = load_definition("./does-not-exist.yaml").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidDatasourceConfig);
    assert!(err.to_string().contains("Built-in datasources: jira, slack"));
}
