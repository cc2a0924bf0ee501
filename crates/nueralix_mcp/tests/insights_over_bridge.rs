//! Drives the insights service through the HTTP bridge client against a
//! wiremock bridge.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use health_connect_client::http_client::ReqwestHealthClient;
use nueralix_mcp::aggregator::HealthMetricsAggregator;
use nueralix_mcp::capability::{Capability, UnavailableReason};
use nueralix_mcp::services::InsightsService;
use nueralix_mcp::snapshot::Trend;
use nueralix_mcp::state::{NoticeAction, NoticeKind};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn now() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0)
        .unwrap()
        .fixed_offset()
}

fn service(server: &MockServer) -> InsightsService {
    let client = ReqwestHealthClient::new(&server.uri(), SecretString::new("tok".into()));
    InsightsService::with_clock(Arc::new(client), HealthMetricsAggregator::default(), now)
}

fn all_permissions() -> serde_json::Value {
    json!([
        {"accessType": "read", "recordType": "Steps"},
        {"accessType": "read", "recordType": "HeartRate"},
        {"accessType": "read", "recordType": "SleepSession"},
        {"accessType": "read", "recordType": "ActiveCaloriesBurned"}
    ])
}

async fn mount_status(server: &MockServer, status: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/sdk-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": status})))
        .mount(server)
        .await;
}

async fn mount_granted(server: &MockServer, granted: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/permissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(granted))
        .mount(server)
        .await;
}

async fn mount_read(server: &MockServer, matcher: serde_json::Value, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/records/read"))
        .and(body_partial_json(matcher))
        .respond_with(response)
        .mount(server)
        .await;
}

fn records(records: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "records": records }))
}

async fn mount_sample_day(server: &MockServer, heart_rate: ResponseTemplate) {
    mount_read(
        server,
        json!({"recordType": "Steps", "timeRangeFilter": {"startTime": "2025-03-01T00:00:00Z"}}),
        records(json!([
            {"startTime": "2025-03-01T08:00:00Z", "endTime": "2025-03-01T09:00:00Z", "count": 3000},
            {"startTime": "2025-03-01T12:00:00Z", "endTime": "2025-03-01T13:00:00Z", "count": 2000}
        ])),
    )
    .await;
    mount_read(
        server,
        json!({"recordType": "Steps", "timeRangeFilter": {"startTime": "2025-02-28T00:00:00Z"}}),
        records(json!([
            {"startTime": "2025-02-28T10:00:00Z", "endTime": "2025-02-28T11:00:00Z", "count": 4000}
        ])),
    )
    .await;
    mount_read(
        server,
        json!({"recordType": "HeartRate", "ascendingOrder": false, "pageSize": 1}),
        heart_rate,
    )
    .await;
    mount_read(
        server,
        json!({"recordType": "SleepSession", "ascendingOrder": false, "pageSize": 1}),
        records(json!([
            {"startTime": "2025-02-28T22:00:00Z", "endTime": "2025-03-01T05:23:00Z"}
        ])),
    )
    .await;
    mount_read(
        server,
        json!({"recordType": "ActiveCaloriesBurned"}),
        records(json!([
            {"startTime": "2025-03-01T08:00:00Z", "endTime": "2025-03-01T09:00:00Z",
             "energy": {"inKilocalories": 1200.3}},
            {"startTime": "2025-03-01T12:00:00Z", "endTime": "2025-03-01T13:00:00Z",
             "energy": {"inKilocalories": 649.4}}
        ])),
    )
    .await;
}

fn heart_rate_ok() -> ResponseTemplate {
    records(json!([{
        "startTime": "2025-03-01T09:00:00Z",
        "endTime": "2025-03-01T09:30:00Z",
        "samples": [
            {"time": "2025-03-01T09:00:00Z", "beatsPerMinute": 64.0},
            {"time": "2025-03-01T09:30:00Z", "beatsPerMinute": 71.6}
        ]
    }]))
}

#[tokio::test]
async fn full_day_over_bridge() {
    let server = MockServer::start().await;
    mount_status(&server, "available").await;
    mount_granted(&server, all_permissions()).await;
    mount_sample_day(&server, heart_rate_ok()).await;

    let state = service(&server).on_mount().await;
    assert_eq!(state.capability, Capability::Ready);
    assert!(state.notices.is_empty());

    let snap = state.snapshot.expect("snapshot");
    assert_eq!(snap.steps.display_value(), "5,000");
    assert_eq!(snap.steps.trend, Trend::Up);
    assert_eq!(snap.steps.change, "+1,000 from yesterday");
    assert_eq!(snap.heart_rate.display_value(), "72 bpm");
    assert_eq!(snap.sleep.display_value(), "7h 23m");
    assert_eq!(snap.calories.display_value(), "1,850");
}

#[tokio::test]
async fn bridge_error_degrades_one_metric() {
    let server = MockServer::start().await;
    mount_status(&server, "available").await;
    mount_granted(&server, all_permissions()).await;
    mount_sample_day(&server, ResponseTemplate::new(500).set_body_string("boom")).await;

    let state = service(&server).refresh().await;
    let snap = state.snapshot.as_ref().expect("snapshot");
    assert_eq!(snap.heart_rate.display_value(), "--");
    assert_eq!(snap.steps.display_value(), "5,000");
    assert_eq!(state.notices.len(), 1);
    assert_eq!(state.notices[0].kind, NoticeKind::Transient);
    assert!(state.notices[0].message.contains("Heart Rate"));
}

#[tokio::test]
async fn denied_permissions_skip_reads() {
    let server = MockServer::start().await;
    mount_status(&server, "available").await;
    mount_granted(&server, json!([{"accessType": "read", "recordType": "Steps"}])).await;
    Mock::given(method("POST"))
        .and(path("/v1/records/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(0)
        .mount(&server)
        .await;

    let state = service(&server).refresh().await;
    match &state.capability {
        Capability::Unavailable {
            reason: UnavailableReason::PermissionsMissing { missing },
        } => assert_eq!(missing.len(), 3),
        other => panic!("unexpected capability: {other:?}"),
    }
    assert_eq!(state.notices[0].action, Some(NoticeAction::RequestPermission));
    let snap = state.snapshot.expect("snapshot");
    assert!(!snap.steps.has_data());
    assert!(!snap.calories.has_data());
}

#[tokio::test]
async fn unreachable_status_endpoint_is_a_notice_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/sdk-status"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let state = service(&server).refresh().await;
    assert!(matches!(
        state.capability,
        Capability::Unavailable {
            reason: UnavailableReason::ProviderError { .. }
        }
    ));
    assert_eq!(state.notices.len(), 1);
    assert_eq!(state.notices[0].kind, NoticeKind::Persistent);
    assert!(!state.loading);
}
