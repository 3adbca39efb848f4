//! Tests for engine module

use super::*;
use crate::error::Error;
use crate::http::mock::MockTransport;
use crate::types::{IfEmpty, Region, Source};
use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn credentials() -> Credentials {
    Credentials::new("https://api.example.com/vipapi/", "secret").unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn extractor(transport: &Arc<MockTransport>) -> Extractor {
    let fixed = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    Extractor::with_transport(credentials(), Arc::clone(transport))
        .with_metadata(IngestionMetadata::with_timestamp(fixed))
}

// ============================================================================
// Message Tests
// ============================================================================

#[test]
fn test_message_levels() {
    assert_eq!(Message::info("a").level, LogLevel::Info);
    assert_eq!(Message::debug("b").level, LogLevel::Debug);
    assert!(Message::warn("c").is_warning());
    assert!(!Message::info("d").is_warning());
}

// ============================================================================
// Request Validation Tests
// ============================================================================

#[test]
fn test_request_parse() {
    let request =
        ExtractRequest::parse("jobs", "2023-01-01", Some("2023-02-01"), 50, "PL", "warn").unwrap();

    assert_eq!(request.source, Source::Jobs);
    assert_eq!(request.window.from, date(2023, 1, 1));
    assert_eq!(request.window.to, date(2023, 2, 1));
    assert_eq!(request.items_per_page, 50);
    assert_eq!(request.region, Region::Code("pl".to_string()));
    assert_eq!(request.if_empty, IfEmpty::Warn);
}

#[test]
fn test_request_to_date_defaults_to_today() {
    let request = ExtractRequest::parse("company", "2023-01-01", None, 10, "all", "fail").unwrap();
    assert_eq!(request.window.to, Utc::now().date_naive());
}

#[test]
fn test_request_validation_errors() {
    let cases = [
        ExtractRequest::parse("orders", "2023-01-01", None, 10, "all", "fail"),
        ExtractRequest::parse("jobs", "2022-03-21", Some("2022-04-01"), 10, "all", "fail"),
        ExtractRequest::parse("jobs", "2023-02-01", Some("2023-01-01"), 10, "all", "fail"),
        ExtractRequest::parse("jobs", "2023-01-01", None, 0, "all", "fail"),
        ExtractRequest::parse("jobs", "2023-01-01", None, 10, "europe", "fail"),
        ExtractRequest::parse("jobs", "2023-01-01", None, 10, "all", "ignore"),
        ExtractRequest::parse("jobs", "01/01/2023", None, 10, "all", "fail"),
    ];

    for result in cases {
        let err = result.unwrap_err();
        assert!(err.is_validation(), "not a validation error: {err}");
    }
}

#[test]
fn test_request_floor_date_is_allowed() {
    let request =
        ExtractRequest::parse("jobs", "2022-03-22", Some("2022-03-22"), 10, "all", "fail");
    assert!(request.is_ok());
}

#[test]
fn test_extractor_request_uses_settings() {
    let transport = Arc::new(MockTransport::new());
    let settings = crate::config::ExtractionSettings {
        items_per_page: 25,
        if_empty: IfEmpty::Skip,
        ..Default::default()
    };
    let extractor = extractor(&transport).with_settings(settings);

    let request = extractor
        .request("product", "2023-01-01", Some("2023-01-02"))
        .unwrap();
    assert_eq!(request.items_per_page, 25);
    assert_eq!(request.if_empty, IfEmpty::Skip);
    assert_eq!(request.region, Region::All);
}

// ============================================================================
// Extraction Tests
// ============================================================================

#[tokio::test]
async fn test_survey_single_fetch_with_metadata() {
    let transport = Arc::new(MockTransport::new().respond(json!([
        {"id": 1, "type": "question", "text": "How did you hear about us?"},
        {"id": 2, "type": "question", "text": "Would you recommend us?"}
    ])));

    let request =
        ExtractRequest::parse("survey", "2022-03-22", Some("2024-01-01"), 100, "all", "fail")
            .unwrap();
    let extraction = extractor(&transport).extract(&request).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(
        transport.requests()[0].url.as_str(),
        "https://api.example.com/vipapi/survey?language=en&type=question"
    );
    assert_eq!(
        extraction.table.columns(),
        ["id", "type", "text", SOURCE_COLUMN, DOWNLOADED_AT_COLUMN]
    );
    assert_eq!(extraction.table.value(0, SOURCE_COLUMN), &json!("vidclub"));
    assert_eq!(
        extraction.table.value(1, DOWNLOADED_AT_COLUMN),
        &json!("2024-05-01T12:00:00.000000Z")
    );
    assert_eq!(extraction.stats.windows, 1);
}

#[tokio::test]
async fn test_windows_are_walked_in_order_and_deduplicated() {
    // 2023-01-01..=2023-01-20 with 10-day windows: [01..11], [11..20]
    let transport = Arc::new(
        MockTransport::new()
            .respond(json!({"data": [
                {"id": 1, "created": "2023-01-05"},
                {"id": 2, "created": "2023-01-11"}
            ]}))
            .respond(json!({"data": [
                {"id": 2, "created": "2023-01-11"},
                {"id": 3, "created": "2023-01-15"}
            ]})),
    );

    let request = ExtractRequest::new(Source::Jobs, date(2023, 1, 1), Some(date(2023, 1, 20)))
        .unwrap()
        .with_items_per_page(5)
        .with_max_span_days(10);
    let extraction = extractor(&transport).extract(&request).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].query_param("to"), Some("2023-01-11".to_string()));
    assert_eq!(requests[1].query_param("from"), Some("2023-01-11".to_string()));

    assert_eq!(
        extraction.table.column_values("id"),
        vec![&json!(1), &json!(2), &json!(3)]
    );
    assert_eq!(extraction.stats.rows_fetched, 4);
    assert_eq!(extraction.stats.duplicates_removed, 1);
    assert_eq!(extraction.stats.rows, 3);
}

#[tokio::test]
async fn test_product_rows_are_transposed_and_counted() {
    let transport = Arc::new(
        MockTransport::new()
            // Window 1, full page then short page
            .respond(json!({"data": {
                "p1": {"name": "Roof window", "price": 10},
                "p2": {"name": "Blind", "price": 4}
            }}))
            .respond(json!({"data": {"p3": {"name": "Flashing", "price": 2}}}))
            // Window 2 repeats p3 from the shared boundary day
            .respond(json!({"data": {
                "p3": {"name": "Flashing", "price": 2},
                "p4": {"name": "Awning", "price": 30}
            }}))
            .respond(json!({"data": {}})),
    );

    let request = ExtractRequest::new(Source::Product, date(2023, 3, 1), Some(date(2023, 3, 10)))
        .unwrap()
        .with_items_per_page(2)
        .with_max_span_days(5);
    let extraction = extractor(&transport).extract(&request).await.unwrap();

    assert_eq!(transport.calls(), 4);
    assert_eq!(extraction.stats.rows_fetched, 5);
    assert_eq!(extraction.table.len(), 4);
    assert_eq!(
        extraction.table.columns(),
        ["name", "price", SOURCE_COLUMN, DOWNLOADED_AT_COLUMN]
    );
}

#[tokio::test]
async fn test_floor_violation_makes_no_request() {
    let transport = Arc::new(MockTransport::new());
    let extractor = extractor(&transport);

    let mut request = ExtractRequest::new(Source::Jobs, date(2023, 1, 1), Some(date(2023, 1, 2)))
        .unwrap();
    request.window = crate::partition::DateWindow::new(date(2022, 3, 21), date(2022, 4, 1)).unwrap();

    let err = extractor.extract(&request).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_failed_page_fails_whole_call() {
    let transport = Arc::new(
        MockTransport::new()
            .respond(json!({"data": [{"id": 1}]}))
            .fail(Error::http_status(502, "bad gateway")),
    );

    let request = ExtractRequest::new(Source::Company, date(2023, 1, 1), Some(date(2023, 1, 20)))
        .unwrap()
        .with_items_per_page(5)
        .with_max_span_days(10);
    let err = extractor(&transport).extract(&request).await.unwrap_err();

    assert!(matches!(err, Error::UpstreamRequestFailed { .. }));
}

// ============================================================================
// Empty Result Tests
// ============================================================================

async fn extract_empty(if_empty: IfEmpty) -> crate::error::Result<Extraction> {
    let transport = Arc::new(MockTransport::new().respond(json!({"data": []})));
    let request = ExtractRequest::new(Source::Jobs, date(2023, 1, 1), Some(date(2023, 1, 5)))
        .unwrap()
        .with_if_empty(if_empty);
    extractor(&transport).extract(&request).await
}

#[tokio::test]
async fn test_empty_fail() {
    let err = extract_empty(IfEmpty::Fail).await.unwrap_err();
    assert!(matches!(err, Error::EmptyResult { ref source_name } if source_name == "jobs"));
}

#[tokio::test]
async fn test_empty_skip() {
    let extraction = extract_empty(IfEmpty::Skip).await.unwrap();
    assert!(extraction.table.is_empty());
    assert!(extraction.table.columns().is_empty());
    assert_eq!(extraction.warnings().count(), 0);
}

#[tokio::test]
async fn test_empty_warn() {
    let extraction = extract_empty(IfEmpty::Warn).await.unwrap();
    assert!(extraction.table.is_empty());
    assert_eq!(extraction.warnings().count(), 1);
}

// ============================================================================
// Independence Tests
// ============================================================================

#[tokio::test]
async fn test_sequential_calls_classify_independently() {
    let transport = Arc::new(
        MockTransport::new()
            // First call: page-number style
            .respond(json!({"data": [{"id": 1}, {"id": 2}]}))
            .respond(json!({"data": []}))
            // Second call: cursor style
            .respond(json!({"data": [{"id": 3}, {"id": 4}], "next_cursor": "abc"}))
            .respond(json!({"data": [{"id": 5}], "next_cursor": null})),
    );
    let extractor = extractor(&transport);
    let request = ExtractRequest::new(Source::Jobs, date(2023, 1, 1), Some(date(2023, 1, 5)))
        .unwrap()
        .with_items_per_page(2);

    let first = extractor.extract(&request).await.unwrap();
    let second = extractor.extract(&request).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[1].query_param("page"), Some("2".to_string()));
    assert_eq!(requests[3].query_param("cursor"), Some("abc".to_string()));
    assert_eq!(requests[3].query_param("page"), None);
    assert_eq!(first.table.len(), 2);
    assert_eq!(second.table.len(), 3);
}
