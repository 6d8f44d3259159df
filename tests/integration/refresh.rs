//! Voice-list refresh against a mock backend

use crate::integration::mock_server::{MockServerFixture, REFRESH_PATH, UNREACHABLE_URL};
use serde_json::json;
use voice_catalog::{CatalogEvent, Credential, ErrorKind, VoiceFilter};

fn key() -> Credential {
    Credential::new("sk-test")
}

#[tokio::test]
async fn test_refresh_sends_credential_and_default_filter() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(
            REFRESH_PATH,
            Some(json!({"api_key": "sk-test", "voice_type": "all"})),
            200,
            r#"{"status":"success","voice_names":["Wise_Woman","Calm_Man"],"count":2}"#,
        )
        .await;

    let client = fixture.client();
    let voices = client.refresh_voices(&key(), None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(voices.as_slice(), &["Wise_Woman", "Calm_Man"]);
    assert_eq!(client.voices(), voices);
    assert_eq!(client.selected_voice().as_deref(), Some("Wise_Woman"));
    assert!(client.activity().is_idle());
}

#[tokio::test]
async fn test_refresh_forwards_explicit_filter() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(
            REFRESH_PATH,
            Some(json!({"voice_type": "voice_cloning"})),
            200,
            r#"{"status":"success","voice_names":["快速复刻 - clone01"],"count":1}"#,
        )
        .await;

    let client = fixture.client();
    let voices = client
        .refresh_voices(&key(), VoiceFilter::VoiceCloning)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(voices.first(), Some("快速复刻 - clone01"));
}

#[tokio::test]
async fn test_refresh_keeps_selection_still_in_list() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            REFRESH_PATH,
            None,
            200,
            r#"{"status":"success","voices":["v1","v2"],"count":2}"#,
        )
        .await;

    let client = fixture
        .builder()
        .initial_voices(["v0", "v1"])
        .initial_selection("v1")
        .build()
        .unwrap();
    client.refresh_voices(&key(), None).await.unwrap();

    assert_eq!(client.selected_voice().as_deref(), Some("v1"));
    assert!(fixture.events.events_named("selection_changed").is_empty());
}

#[tokio::test]
async fn test_refresh_moves_missing_selection_to_first_voice() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            REFRESH_PATH,
            None,
            200,
            r#"{"status":"success","voice_names":["v1","v2"],"count":2}"#,
        )
        .await;

    let client = fixture
        .builder()
        .initial_voices(["old1", "old2"])
        .initial_selection("old2")
        .build()
        .unwrap();
    client.refresh_voices(&key(), None).await.unwrap();

    assert_eq!(client.selected_voice().as_deref(), Some("v1"));
    assert_eq!(
        fixture.events.events_named("selection_changed"),
        vec![CatalogEvent::SelectionChanged {
            previous: Some("old2".into()),
            current: Some("v1".into()),
        }]
    );
}

#[tokio::test]
async fn test_refresh_with_empty_list_clears_selection() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            REFRESH_PATH,
            None,
            200,
            r#"{"status":"success","voice_names":[],"count":0}"#,
        )
        .await;

    let client = fixture
        .builder()
        .initial_voices(["v1"])
        .build()
        .unwrap();
    assert_eq!(client.selected_voice().as_deref(), Some("v1"));

    let voices = client.refresh_voices(&key(), None).await.unwrap();
    assert!(voices.is_empty());
    assert_eq!(client.selected_voice(), None);
}

#[tokio::test]
async fn test_refresh_returns_unique_non_empty_names() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            REFRESH_PATH,
            None,
            200,
            r#"{"status":"success","voice_names":["a","","b","a"," ","c"],"count":6}"#,
        )
        .await;

    let client = fixture.client();
    let voices = client.refresh_voices(&key(), None).await.unwrap();
    assert_eq!(voices.as_slice(), &["a", "b", "c"]);
}

#[tokio::test]
async fn test_refresh_blank_credential_makes_no_request() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_never_called(REFRESH_PATH).await;

    let client = fixture.builder().initial_voices(["v1"]).build().unwrap();
    for blank in ["", "   "] {
        let err = client
            .refresh_voices(&Credential::new(blank), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthMissing);
    }

    mock.assert_async().await;
    assert_eq!(client.voices().as_slice(), &["v1"]);
    assert!(fixture.events.is_empty());
}

#[tokio::test]
async fn test_refresh_http_500_is_transport_error_and_keeps_list() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(REFRESH_PATH, None, 500, r#"{"error":"internal"}"#)
        .await;

    let client = fixture
        .builder()
        .initial_voices(["v1", "v2"])
        .initial_selection("v2")
        .build()
        .unwrap();
    let err = client.refresh_voices(&key(), None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.http_status(), Some(500));
    assert_eq!(client.voices().as_slice(), &["v1", "v2"]);
    assert_eq!(client.selected_voice().as_deref(), Some("v2"));

    let failed = fixture.events.events_named("refresh_failed");
    assert_eq!(failed.len(), 1);
    assert!(matches!(
        &failed[0],
        CatalogEvent::RefreshFailed { kind: ErrorKind::Transport, .. }
    ));
    assert!(client.activity().is_idle());
}

#[tokio::test]
async fn test_refresh_server_reported_error_carries_message() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            REFRESH_PATH,
            None,
            200,
            r#"{"status":"error","error":"无法获取音色数据"}"#,
        )
        .await;

    let client = fixture.client();
    let err = client.refresh_voices(&key(), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerReported);
    assert_eq!(err.to_string(), "Server reported error: 无法获取音色数据");
}

#[tokio::test]
async fn test_refresh_error_status_without_message() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(REFRESH_PATH, None, 200, r#"{"status":"error"}"#)
        .await;

    let client = fixture.client();
    let err = client.refresh_voices(&key(), None).await.unwrap_err();
    assert_eq!(err.to_string(), "Server reported error: refresh failed");
}

#[tokio::test]
async fn test_refresh_malformed_bodies() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(REFRESH_PATH, None, 200, "<html>gateway</html>")
        .await;
    let client = fixture.client();
    let err = client.refresh_voices(&key(), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);

    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(REFRESH_PATH, None, 200, r#"{"status":"success","count":3}"#)
        .await;
    let client = fixture.client();
    let err = client.refresh_voices(&key(), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert_eq!(
        err.context().and_then(|c| c.field_path.as_deref()),
        Some("voice_names")
    );
}

#[tokio::test]
async fn test_refresh_events_in_order() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            REFRESH_PATH,
            None,
            200,
            r#"{"status":"success","voice_names":["v1"],"count":1}"#,
        )
        .await;

    let client = fixture.client();
    client.refresh_voices(&key(), VoiceFilter::System).await.unwrap();

    let names: Vec<&str> = fixture.events.events().iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec!["refresh_started", "voices_refreshed", "selection_changed"]
    );
    assert_eq!(
        fixture.events.events()[0],
        CatalogEvent::RefreshStarted {
            seq: 1,
            filter: VoiceFilter::System
        }
    );
}

#[tokio::test]
async fn test_select_voice_requires_membership() {
    let fixture = MockServerFixture::new().await;
    let client = fixture
        .builder()
        .initial_voices(["v1", "v2"])
        .build()
        .unwrap();

    client.select_voice("v2").await.unwrap();
    assert_eq!(client.selected_voice().as_deref(), Some("v2"));

    let err = client.select_voice("v9").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(client.selected_voice().as_deref(), Some("v2"));
}

#[tokio::test]
async fn test_refresh_network_failure_keeps_list() {
    let fixture = MockServerFixture::new().await;
    let client = fixture
        .builder()
        .base_url(UNREACHABLE_URL)
        .initial_voices(["v1", "v2"])
        .initial_selection("v2")
        .build()
        .unwrap();

    let err = client.refresh_voices(&key(), None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.http_status(), None);
    assert_eq!(client.voices().as_slice(), &["v1", "v2"]);
    assert_eq!(client.selected_voice().as_deref(), Some("v2"));
    assert!(client.activity().is_idle());
    assert!(matches!(
        fixture.events.events_named("refresh_failed").first(),
        Some(CatalogEvent::RefreshFailed { kind: ErrorKind::Transport, .. })
    ));
    assert!(fixture.events.events_named("selection_changed").is_empty());
}

#[tokio::test]
async fn test_refresh_ignores_unreadable_count() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            REFRESH_PATH,
            None,
            200,
            r#"{"status":"success","voice_names":["a","b"],"count":-1}"#,
        )
        .await;

    let client = fixture.client();
    let voices = client.refresh_voices(&key(), None).await.unwrap();
    assert_eq!(voices.as_slice(), &["a", "b"]);
}

#[tokio::test]
async fn test_refresh_structured_server_error() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            REFRESH_PATH,
            None,
            200,
            r#"{"status":"error","error":{"message":"invalid api key"}}"#,
        )
        .await;

    let client = fixture.client();
    let err = client.refresh_voices(&key(), None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServerReported);
    assert_eq!(err.to_string(), "Server reported error: invalid api key");
}
