//! Tests for pagination module

use super::*;
use crate::auth::Credentials;
use crate::error::Error;
use crate::http::mock::MockTransport;
use crate::partition::DateWindow;
use crate::query::{PageToken, QueryBuilder};
use crate::types::{Region, Source};
use chrono::NaiveDate;
use serde_json::json;

fn credentials() -> Credentials {
    Credentials::new("https://api.example.com/vipapi/", "secret").unwrap()
}

fn window() -> DateWindow {
    DateWindow::new(
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
    )
    .unwrap()
}

fn rows(start: u32, count: u32) -> serde_json::Value {
    (start..start + count)
        .map(|id| json!({"id": id}))
        .collect::<Vec<_>>()
        .into()
}

async fn walk(transport: &MockTransport, source: Source, per_page: u32) -> crate::error::Result<WindowWalk> {
    let credentials = credentials();
    let region = Region::All;
    let walker = PaginationWalker::new(
        transport,
        QueryBuilder::new(&credentials),
        source,
        per_page,
        &region,
    );
    walker.walk(&window()).await
}

// ============================================================================
// Style classification
// ============================================================================

#[test]
fn test_classify_styles() {
    assert_eq!(PaginationStyle::classify(&json!([{"id": 1}])), PaginationStyle::None);
    assert_eq!(PaginationStyle::classify(&json!({"status": "ok"})), PaginationStyle::None);
    assert_eq!(
        PaginationStyle::classify(&json!({"data": []})),
        PaginationStyle::PageNumber
    );
    assert_eq!(
        PaginationStyle::classify(&json!({"data": [], "next_page_url": null})),
        PaginationStyle::Cursor {
            key: "next_page_url".to_string()
        }
    );
}

#[test]
fn test_classify_prefers_first_cursor_key() {
    let style = PaginationStyle::classify(&json!({"data": [], "next": "b", "cursor": "a"}));
    assert_eq!(
        style,
        PaginationStyle::Cursor {
            key: "cursor".to_string()
        }
    );
}

#[test]
fn test_next_token() {
    let page = PaginationStyle::PageNumber;
    assert_eq!(
        page.next_token(&json!({}), &PageToken::None),
        Some(PageToken::PageNumber(2))
    );
    assert_eq!(
        page.next_token(&json!({}), &PageToken::PageNumber(4)),
        Some(PageToken::PageNumber(5))
    );

    let cursor = PaginationStyle::Cursor {
        key: "next_cursor".to_string(),
    };
    assert_eq!(
        cursor.next_token(&json!({"next_cursor": "abc"}), &PageToken::None),
        Some(PageToken::Cursor("abc".to_string()))
    );
    assert_eq!(
        cursor.next_token(&json!({"next_cursor": 17}), &PageToken::None),
        Some(PageToken::Cursor("17".to_string()))
    );
    assert_eq!(cursor.next_token(&json!({"next_cursor": null}), &PageToken::None), None);
    assert_eq!(cursor.next_token(&json!({"next_cursor": ""}), &PageToken::None), None);

    assert_eq!(PaginationStyle::None.next_token(&json!({}), &PageToken::None), None);
}

// ============================================================================
// Page-number walks
// ============================================================================

#[tokio::test]
async fn test_walk_stops_on_short_page() {
    let transport = MockTransport::new()
        .respond(json!({"data": rows(0, 3)}))
        .respond(json!({"data": rows(3, 3)}))
        .respond(json!({"data": rows(6, 3)}))
        .respond(json!({"data": rows(9, 1)}));

    let result = walk(&transport, Source::Jobs, 3).await.unwrap();

    assert_eq!(transport.calls(), 4);
    assert_eq!(result.pages, 4);
    assert_eq!(result.rows(), 10);
    assert_eq!(result.style, Some(PaginationStyle::PageNumber));

    let pages: Vec<Option<String>> = transport
        .requests()
        .iter()
        .map(|r| r.query_param("page"))
        .collect();
    assert_eq!(
        pages,
        vec![None, Some("2".into()), Some("3".into()), Some("4".into())]
    );
}

#[tokio::test]
async fn test_walk_single_short_page() {
    let transport = MockTransport::new().respond(json!({"data": rows(0, 2)}));

    let result = walk(&transport, Source::Company, 5).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(result.rows(), 2);
}

#[tokio::test]
async fn test_walk_empty_first_page() {
    let transport = MockTransport::new().respond(json!({"data": []}));

    let result = walk(&transport, Source::Jobs, 5).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(result.rows(), 0);
}

#[tokio::test]
async fn test_walk_unpaginated_payload() {
    let transport = MockTransport::new().respond(rows(0, 10));

    let result = walk(&transport, Source::Survey, 3).await.unwrap();

    // Bare lists are a single batch regardless of size
    assert_eq!(transport.calls(), 1);
    assert_eq!(result.rows(), 10);
    assert_eq!(result.style, Some(PaginationStyle::None));
}

#[tokio::test]
async fn test_walk_state_is_per_call() {
    let transport = MockTransport::new()
        .respond(json!({"data": rows(0, 2)}))
        .respond(json!({"data": rows(2, 1)}))
        .respond(json!({"data": rows(3, 1)}));

    let credentials = credentials();
    let region = Region::All;
    let walker = PaginationWalker::new(
        &transport,
        QueryBuilder::new(&credentials),
        Source::Jobs,
        2,
        &region,
    );

    let first = walker.walk(&window()).await.unwrap();
    let second = walker.walk(&window()).await.unwrap();

    assert_eq!(first.pages, 2);
    assert_eq!(second.pages, 1);
    // Second walk starts again without a page token
    assert_eq!(transport.requests()[2].query_param("page"), None);
}

// ============================================================================
// Cursor walks
// ============================================================================

#[tokio::test]
async fn test_walk_follows_cursor() {
    let transport = MockTransport::new()
        .respond(json!({"data": rows(0, 2), "next_cursor": "c2"}))
        .respond(json!({"data": rows(2, 2), "next_cursor": "c3"}))
        .respond(json!({"data": rows(4, 1), "next_cursor": null}));

    let result = walk(&transport, Source::Jobs, 2).await.unwrap();

    assert_eq!(result.rows(), 5);
    let requests = transport.requests();
    assert_eq!(requests[1].query_param("cursor"), Some("c2".to_string()));
    assert_eq!(requests[2].query_param("cursor"), Some("c3".to_string()));
    assert_eq!(requests[2].query_param("page"), None);
}

#[tokio::test]
async fn test_walk_follows_next_page_url() {
    let transport = MockTransport::new()
        .respond(json!({
            "data": rows(0, 2),
            "next_page_url": "https://api.example.com/vipapi/jobs?page=2&limit=2"
        }))
        .respond(json!({"data": rows(2, 1), "next_page_url": null}));

    let result = walk(&transport, Source::Jobs, 2).await.unwrap();

    assert_eq!(result.rows(), 3);
    let second = &transport.requests()[1];
    assert_eq!(second.url.path(), "/vipapi/jobs");
    assert_eq!(second.query_param("page"), Some("2".to_string()));
    assert_eq!(second.query_param("from"), Some("2023-01-01".to_string()));
    assert_eq!(second.query_param("limit"), Some("2".to_string()));
}

#[tokio::test]
async fn test_walk_full_page_without_cursor_stops() {
    let transport = MockTransport::new().respond(json!({"data": rows(0, 2), "cursor": null}));

    let result = walk(&transport, Source::Jobs, 2).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(result.rows(), 2);
}

#[tokio::test]
async fn test_walk_stops_when_cursor_repeats() {
    let mut transport = MockTransport::new();
    for _ in 0..5 {
        transport = transport.respond(json!({"data": rows(0, 2), "next_cursor": "same"}));
    }

    let result = walk(&transport, Source::Company, 2).await.unwrap();

    // First page, then the page addressed by "same", which points at itself
    assert_eq!(transport.calls(), 2);
    assert_eq!(result.pages, 2);
    assert_eq!(result.rows(), 4);
}

// ============================================================================
// Endpoint corrections and failures
// ============================================================================

#[tokio::test]
async fn test_walk_transposes_product_pages() {
    let transport = MockTransport::new()
        .respond(json!({"data": {
            "p1": {"name": "Roof window", "price": 10},
            "p2": {"name": "Blind", "price": 4}
        }}))
        .respond(json!({"data": {
            "p3": {"name": "Flashing", "price": 2}
        }}));

    let result = walk(&transport, Source::Product, 2).await.unwrap();

    assert_eq!(transport.calls(), 2);
    assert_eq!(result.rows(), 3);
    for batch in &result.batches {
        assert_eq!(batch.columns(), ["name", "price"]);
    }
    assert_eq!(result.batches[1].labels(), ["p3"]);
}

#[tokio::test]
async fn test_walk_wraps_transport_error() {
    let transport = MockTransport::new()
        .respond(json!({"data": rows(0, 2)}))
        .fail(Error::http_status(500, "boom"));

    let err = walk(&transport, Source::Jobs, 2).await.unwrap_err();

    match err {
        Error::UpstreamRequestFailed { request, source } => {
            assert!(request.contains("page=2"));
            assert!(matches!(*source, Error::HttpStatus { status: 500, .. }));
        }
        other => panic!("expected UpstreamRequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_walk_scalar_first_response_fails() {
    let transport = MockTransport::new().respond(json!(null));

    let err = walk(&transport, Source::Company, 2).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_walk_missing_data_mid_walk() {
    let transport = MockTransport::new()
        .respond(json!({"data": rows(0, 2)}))
        .respond(json!({"error": "gone"}));

    let err = walk(&transport, Source::Jobs, 2).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}
