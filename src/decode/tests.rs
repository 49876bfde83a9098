//! Tests for decoder module

use super::*;
use crate::error::ErrorCode;
use serde_json::json;

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_decoder_top_level_array() {
    let decoder = JsonDecoder::new("users");
    let body = json!([{"accountId": "a1"}, {"accountId": "a2"}]);

    let records = decoder.records(&body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["accountId"], "a1");
}

#[test]
fn test_json_decoder_with_path() {
    let decoder = JsonDecoder::new("groups").with_path("values");
    let body = json!({"isLast": true, "values": [{"groupId": "G1"}]});

    let records = decoder.records(&body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["groupId"], "G1");
}

#[test]
fn test_json_decoder_nested_path_with_prefix() {
    let decoder = JsonDecoder::new("items").with_path("$.data.items");
    let body = json!({"data": {"items": [{"id": 1}, {"id": 2}, {"id": 3}]}});

    assert_eq!(decoder.records(&body).unwrap().len(), 3);
}

#[test]
fn test_json_decoder_jsonpath_wildcard() {
    let decoder = JsonDecoder::new("items").with_path("$.data[*]");
    let body = json!({"data": [{"id": 1}, {"id": 2}]});

    assert_eq!(decoder.records(&body).unwrap().len(), 2);
}

#[test]
fn test_json_decoder_missing_path_is_empty() {
    let decoder = JsonDecoder::new("groups").with_path("values");
    let body = json!({"isLast": true});

    assert!(decoder.records(&body).unwrap().is_empty());

    let body = json!({"values": null});
    assert!(decoder.records(&body).unwrap().is_empty());
}

#[test]
fn test_json_decoder_single_object_body() {
    let decoder = JsonDecoder::new("me");
    let body = json!({"id": "self"});

    let records = decoder.records(&body).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_json_decoder_path_not_array() {
    let decoder = JsonDecoder::new("groups").with_path("values");
    let body = json!({"values": "oops"});

    let err = decoder.records(&body).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DatasourceFailed);
    assert!(err.to_string().contains("expected an array at 'values'"));
}

#[test]
fn test_json_decoder_record_not_object() {
    let decoder = JsonDecoder::new("users");
    let body = json!([{"id": 1}, 2]);

    let err = decoder.records(&body).unwrap_err();
    assert_eq!(err.code(), ErrorCode::DatasourceFailed);
    assert!(err.to_string().contains("record 1 is not an object"));
}

#[test]
fn test_json_decoder_optional_path() {
    let decoder = JsonDecoder::new("users").with_optional_path(Some("members"));
    let body = json!({"members": [{"id": "U1"}]});
    assert_eq!(decoder.records(&body).unwrap().len(), 1);

    let decoder = JsonDecoder::new("users").with_optional_path(None);
    assert_eq!(decoder.records(&json!([])).unwrap().len(), 0);
}

// ============================================================================
// Path Lookup Tests
// ============================================================================

#[test]
fn test_extract_path_simple() {
    let body = json!({"response_metadata": {"next_cursor": "dXNlcjpVMDYx"}});

    assert_eq!(
        extract_path(&body, "response_metadata.next_cursor").unwrap(),
        Some(json!("dXNlcjpVMDYx"))
    );
    assert_eq!(
        extract_path(&body, "$.response_metadata.next_cursor").unwrap(),
        Some(json!("dXNlcjpVMDYx"))
    );
    assert_eq!(extract_path(&body, "response_metadata.missing").unwrap(), None);
}

#[test]
fn test_extract_path_array_index() {
    let body = json!({"values": [{"id": "a"}, {"id": "b"}]});

    assert_eq!(extract_path(&body, "values[1].id").unwrap(), Some(json!("b")));
    assert_eq!(extract_path(&body, "values[5].id").unwrap(), None);
}

#[test]
fn test_extract_path_scalar_types() {
    let body = json!({"isLast": false, "total": 42});

    assert_eq!(extract_path(&body, "isLast").unwrap(), Some(json!(false)));
    assert_eq!(extract_path(&body, "total").unwrap(), Some(json!(42)));
}
