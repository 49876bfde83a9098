//! Tests for cursor module

use super::*;
use crate::error::ErrorCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pretty_assertions::assert_eq;
use test_case::test_case;

// ============================================================================
// CompositeCursor Tests
// ============================================================================

#[test]
fn test_cursor_builders() {
    let cursor = CompositeCursor::at(5_i64)
        .with_collection_id("G1")
        .with_collection_cursor(2);

    assert_eq!(cursor.cursor, Some(5));
    assert_eq!(cursor.collection_id.as_deref(), Some("G1"));
    assert_eq!(cursor.collection_cursor, Some(2));
    assert!(cursor.has_collection_fields());
    assert!(!cursor.is_empty());
}

#[test]
fn test_cursor_into_next_collapses_positionless() {
    let cursor = CompositeCursor::<i64>::new().with_collection_id("acc4");
    assert_eq!(cursor.into_next(), None);

    let cursor = CompositeCursor::<i64>::new().with_collection_cursor(3);
    assert_eq!(cursor.clone().into_next(), Some(cursor));
}

#[test]
fn test_from_position() {
    assert_eq!(CompositeCursor::<i64>::from_position(None), None);
    assert_eq!(
        CompositeCursor::from_position(Some("tok".to_string())),
        Some(CompositeCursor::at("tok".to_string()))
    );
}

// ============================================================================
// Codec Tests
// ============================================================================

#[test]
fn test_encode_none_is_empty_string() {
    assert_eq!(encode::<i64>(None).unwrap(), "");
    assert_eq!(encode(Some(&CompositeCursor::<i64>::new())).unwrap(), "");
}

#[test]
fn test_decode_empty_string_is_first_page() {
    assert_eq!(decode::<i64>("").unwrap(), None);
    assert_eq!(decode::<String>("").unwrap(), None);
}

#[test]
fn test_encode_omits_absent_fields() {
    let cursor = CompositeCursor::<i64>::new()
        .with_collection_id("acc4")
        .with_collection_cursor(4);

    let encoded = encode(Some(&cursor)).unwrap();
    let json = STANDARD.decode(encoded).unwrap();
    assert_eq!(
        String::from_utf8(json).unwrap(),
        r#"{"collectionID":"acc4","collectionCursor":4}"#
    );
}

#[test_case(CompositeCursor::at(0) ; "offset zero")]
#[test_case(CompositeCursor::at(500) ; "flat offset")]
#[test_case(CompositeCursor::new().with_collection_cursor(3) ; "bare collection cursor")]
#[test_case(CompositeCursor::at(2).with_collection_id("G1").with_collection_cursor(1) ; "all fields")]
#[test_case(CompositeCursor::new().with_collection_id("acc4").with_collection_cursor(4) ; "batch boundary")]
#[test_case(CompositeCursor::new() ; "all absent collapses to none")]
fn test_offset_cursor_round_trip(cursor: CompositeCursor<i64>) {
    let encoded = encode(Some(&cursor)).unwrap();
    let decoded = decode::<i64>(&encoded).unwrap();

    if cursor.is_empty() {
        assert_eq!(encoded, "");
        assert_eq!(decoded, None);
    } else {
        assert_eq!(decoded, Some(cursor));
    }
}

#[test]
fn test_decode_missing_fields_are_absent() {
    let encoded = STANDARD.encode(r#"{"collectionCursor":7}"#);
    assert_eq!(
        decode::<i64>(&encoded).unwrap(),
        Some(CompositeCursor::new().with_collection_cursor(7))
    );
}

#[test_case(CompositeCursor::at("eyJvZmZzZXQiOjF9".to_string()) ; "opaque token")]
#[test_case(CompositeCursor::at("dXNlcjpVMDYx".to_string()).with_collection_id("C01").with_collection_cursor("next=abc".to_string()) ; "nested token")]
#[test_case(CompositeCursor::new().with_collection_cursor("page-2".to_string()) ; "token collection cursor")]
fn test_token_cursor_round_trip(cursor: CompositeCursor<String>) {
    let encoded = encode(Some(&cursor)).unwrap();
    assert_eq!(decode::<String>(&encoded).unwrap(), Some(cursor));
}

#[test]
fn test_decode_malformed_base64() {
    let err = decode::<i64>("not base64!!").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPageRequestConfig);
    assert!(err.to_string().contains("Failed to decode base64 cursor"));
    assert!(!err.is_retryable());
}

#[test]
fn test_decode_malformed_json() {
    let encoded = STANDARD.encode("{not json");
    let err = decode::<i64>(&encoded).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPageRequestConfig);
    assert!(err.to_string().contains("Failed to unmarshal JSON cursor"));
}

#[test]
fn test_decode_wrong_field_type() {
    // A token cursor handed to an offset entity
    let encoded = STANDARD.encode(r#"{"cursor":"abc"}"#);
    let err = decode::<i64>(&encoded).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPageRequestConfig);
}

// ============================================================================
// Validator Tests
// ============================================================================

#[test]
fn test_validate_no_cursor_always_ok() {
    assert!(validate::<i64>(None, "users", false).is_ok());
    assert!(validate::<i64>(None, "members", true).is_ok());
}

#[test]
fn test_validate_flat_rejects_collection_fields() {
    let cursor = CompositeCursor::at(10_i64).with_collection_id("G1");
    let err = validate(Some(&cursor), "users", false).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPageRequestConfig);
    assert_eq!(
        err.to_string(),
        "Invalid page request: Cursor must not contain CollectionID or CollectionCursor fields for entity users"
    );

    let cursor = CompositeCursor::<i64>::new().with_collection_cursor(1);
    assert!(validate(Some(&cursor), "users", false).is_err());

    let cursor = CompositeCursor::at(10_i64);
    assert!(validate(Some(&cursor), "users", false).is_ok());
}

#[test]
fn test_validate_member_requires_collection_id_for_child_position() {
    let cursor = CompositeCursor::at(2_i64).with_collection_cursor(1);
    let err = validate(Some(&cursor), "members", true).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid page request: Cursor does not have CollectionID set for entity members"
    );

    let cursor = CompositeCursor::at(2_i64).with_collection_id("G1");
    assert!(validate(Some(&cursor), "members", true).is_ok());
}

#[test]
fn test_validate_member_allows_bare_collection_cursor() {
    let cursor = CompositeCursor::<i64>::new().with_collection_cursor(3);
    assert!(validate(Some(&cursor), "members", true).is_ok());
}
