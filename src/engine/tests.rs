//! Tests for engine module

use super::*;
use crate::error::{Error, ErrorCode};
use crate::types::JsonObject;
use async_trait::async_trait;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

/// Adapter that serves scripted responses keyed by incoming cursor
#[derive(Default)]
struct ScriptedAdapter {
    pages: HashMap<String, Response>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedAdapter {
    fn page(mut self, cursor: &str, ids: &[&str], next: &str) -> Self {
        self.pages.insert(
            cursor.to_string(),
            Response {
                status_code: 200,
                retry_after: None,
                objects: ids.iter().map(|id| record(id)).collect(),
                next_cursor: next.to_string(),
            },
        );
        self
    }

    fn status(mut self, cursor: &str, status_code: u16, retry_after: Option<&str>) -> Self {
        self.pages.insert(
            cursor.to_string(),
            Response {
                status_code,
                retry_after: retry_after.map(str::to_string),
                objects: Vec::new(),
                next_cursor: String::new(),
            },
        );
        self
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Adapter for ScriptedAdapter {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn get_page(&self, request: &Request) -> Result<Response> {
        self.seen.lock().unwrap().push(request.cursor.clone());
        self.pages
            .get(&request.cursor)
            .cloned()
            .ok_or_else(|| Error::invalid_page_request(format!("unexpected cursor '{}'", request.cursor)))
    }
}

fn record(id: &str) -> JsonObject {
    let mut obj = JsonObject::new();
    obj.insert("id".to_string(), json!(id));
    obj
}

fn ids(objects: &[JsonObject]) -> Vec<&str> {
    objects.iter().filter_map(|o| o["id"].as_str()).collect()
}

fn request() -> Request {
    Request::new("users", "http://localhost").with_page_size(2)
}

// ============================================================================
// SyncConfig / SyncStats Tests
// ============================================================================

#[test]
fn test_sync_config_builder() {
    let config = SyncConfig::new().with_max_pages(5).with_max_records(100);
    assert_eq!(config.max_pages, 5);
    assert_eq!(config.max_records, 100);
}

#[test]
fn test_sync_stats_counts_empty_pages() {
    let mut stats = SyncStats::new();
    stats.add_page(2);
    stats.add_page(0);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.records_synced, 2);
    assert_eq!(stats.empty_pages, 1);
}

// ============================================================================
// Page Stream Tests
// ============================================================================

#[tokio::test]
async fn test_page_stream_follows_cursors() {
    let adapter = ScriptedAdapter::default()
        .page("", &["a", "b"], "c1")
        .page("c1", &[], "c2")
        .page("c2", &["c"], "");

    let pages: Vec<_> = page_stream(&adapter, request()).collect().await;

    assert_eq!(pages.len(), 3);
    assert!(pages.iter().all(|p| p.is_ok()));
    assert_eq!(adapter.seen(), vec!["", "c1", "c2"]);
}

#[tokio::test]
async fn test_page_stream_ends_after_error() {
    let adapter = ScriptedAdapter::default().page("", &["a"], "missing");

    let pages: Vec<_> = page_stream(&adapter, request()).collect().await;

    assert_eq!(pages.len(), 2);
    assert!(pages[0].is_ok());
    let err = pages[1].as_ref().unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPageRequestConfig);
}

// ============================================================================
// SyncEngine Tests
// ============================================================================

#[tokio::test]
async fn test_full_sync() {
    let adapter = ScriptedAdapter::default()
        .page("", &["a", "b"], "c1")
        .page("c1", &["c", "d"], "c2")
        .page("c2", &[], "");

    let mut engine = SyncEngine::new(adapter);
    let outcome = engine.run(request()).await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(ids(&outcome.objects), vec!["a", "b", "c", "d"]);
    assert_eq!(outcome.resume_cursor, "");
    assert_eq!(outcome.stats.pages_fetched, 3);
    assert_eq!(outcome.stats.empty_pages, 1);
    assert_eq!(engine.stats().records_synced, 4);
}

#[tokio::test]
async fn test_run_each_hands_over_pages_in_order() {
    let adapter = ScriptedAdapter::default()
        .page("", &["a", "b"], "c1")
        .page("c1", &[], "c2")
        .page("c2", &["c"], "");

    let mut pages = Vec::new();
    let mut engine = SyncEngine::new(adapter);
    let outcome = engine
        .run_each(request(), |page| {
            pages.push(ids(&page).join(","));
        })
        .await
        .unwrap();

    assert_eq!(pages, vec!["a,b", "", "c"]);
    assert!(outcome.is_complete());
    assert!(outcome.objects.is_empty());
    assert_eq!(outcome.stats.records_synced, 3);
}

#[tokio::test]
async fn test_sync_resumes_from_cursor() {
    let adapter = ScriptedAdapter::default().page("c1", &["c"], "");

    let mut engine = SyncEngine::new(adapter);
    let outcome = engine.run(request().with_cursor("c1")).await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(ids(&outcome.objects), vec!["c"]);
    assert_eq!(engine.adapter().seen(), vec!["c1"]);
}

#[tokio::test]
async fn test_sync_interrupted_keeps_resume_cursor() {
    let adapter = ScriptedAdapter::default()
        .page("", &["a", "b"], "c1")
        .status("c1", 429, Some("30"));

    let mut engine = SyncEngine::new(adapter);
    let outcome = engine.run(request()).await.unwrap();

    assert_eq!(
        outcome.status,
        SyncStatus::Interrupted {
            status_code: 429,
            retry_after: Some("30".to_string()),
        }
    );
    assert_eq!(outcome.resume_cursor, "c1");
    assert_eq!(outcome.stats.pages_fetched, 1);
}

#[tokio::test]
async fn test_sync_page_limit() {
    let adapter = ScriptedAdapter::default()
        .page("", &["a", "b"], "c1")
        .page("c1", &["c", "d"], "c2");

    let mut engine = SyncEngine::new(adapter).with_config(SyncConfig::new().with_max_pages(1));
    let outcome = engine.run(request()).await.unwrap();

    assert_eq!(outcome.status, SyncStatus::LimitReached);
    assert_eq!(outcome.resume_cursor, "c1");
    assert_eq!(engine.adapter().seen(), vec![""]);
}

#[tokio::test]
async fn test_sync_record_limit_stops_on_page_boundary() {
    let adapter = ScriptedAdapter::default()
        .page("", &["a", "b"], "c1")
        .page("c1", &["c", "d"], "c2");

    let mut engine = SyncEngine::new(adapter).with_config(SyncConfig::new().with_max_records(3));
    let outcome = engine.run(request()).await.unwrap();

    assert_eq!(outcome.status, SyncStatus::LimitReached);
    assert_eq!(outcome.objects.len(), 4);
    assert_eq!(outcome.resume_cursor, "c2");
}

#[tokio::test]
async fn test_sync_propagates_errors() {
    let adapter = ScriptedAdapter::default();

    let mut engine = SyncEngine::new(adapter);
    let err = engine.run(request()).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidPageRequestConfig);
}
