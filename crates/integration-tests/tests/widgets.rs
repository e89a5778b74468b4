//! Integration tests for the page-view tracker and release download badges.

use std::time::Duration;

use little_oat_integration_tests::TestContext;
use little_oat_storefront::config::GithubConfig;
use little_oat_storefront::releases::{Platform, ReleasesClient};
use little_oat_storefront::storage::keys;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Analytics
// ============================================================================

#[tokio::test]
async fn test_page_view_posts_stable_visitor_id() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/analytics/track"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&ctx.server)
        .await;

    ctx.page
        .track_page_view("/shop")
        .expect("analytics configured")
        .await
        .expect("task completes");
    ctx.page
        .track_page_view("/about")
        .expect("analytics configured")
        .await
        .expect("task completes");

    let visitor_id = ctx.storage.peek(keys::VISITOR_ID).expect("visitor id saved");
    let requests = ctx.server.received_requests().await.expect("recording enabled");
    let bodies: Vec<serde_json::Value> = requests
        .iter()
        .map(|r| r.body_json().expect("JSON body"))
        .collect();
    assert_eq!(
        bodies,
        vec![
            json!({ "visitor_id": visitor_id, "page": "/shop" }),
            json!({ "visitor_id": visitor_id, "page": "/about" }),
        ]
    );
}

#[tokio::test]
async fn test_page_view_failure_is_silent() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/analytics/track"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(20)))
        .mount(&ctx.server)
        .await;

    ctx.page
        .track_page_view("/shop")
        .expect("analytics configured")
        .await
        .expect("task completes");
    assert!(ctx.ui.alerts().is_empty());
}

// ============================================================================
// Release Download Badges
// ============================================================================

fn github_config(server: &MockServer, token: Option<&str>) -> GithubConfig {
    GithubConfig {
        api_url: url::Url::parse(&server.uri()).expect("mock url"),
        owner: "littleoat".to_string(),
        repo: "worksheets-app".to_string(),
        token: token.map(|t| secrecy::SecretString::from(t.to_string())),
    }
}

#[tokio::test]
async fn test_download_badges_are_aggregated_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/littleoat/worksheets-app/releases"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "tag_name": "v2.0.0",
                "published_at": "2026-05-01T09:00:00Z",
                "assets": [
                    {"name": "Oat-Setup-2.0.0.exe", "download_count": 1200},
                    {"name": "Oat-2.0.0.dmg", "download_count": 450},
                    {"name": "oat-2.0.0.AppImage", "download_count": 80}
                ]
            },
            {
                "tag_name": "v1.0.0",
                "published_at": "2025-11-20T09:00:00Z",
                "assets": [
                    {"name": "Oat-Setup-1.0.0.exe", "download_count": 34},
                    {"name": "SHA256SUMS", "download_count": 9}
                ]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReleasesClient::new(reqwest::Client::new(), &github_config(&server, Some("ghp_test")));

    let badges = client.download_badges().await.expect("badges");
    assert_eq!(badges.count(Platform::Windows), 1234);
    assert_eq!(badges.label(Platform::Windows), "1.2k");
    assert_eq!(badges.label(Platform::MacOs), "450");
    assert_eq!(badges.label(Platform::Linux), "80");
    assert_eq!(badges.latest_tag.as_deref(), Some("v2.0.0"));

    // Served from cache; the mock's expect(1) verifies no second request.
    let again = client.download_badges().await.expect("cached badges");
    assert_eq!(again, badges);
}

#[tokio::test]
async fn test_download_badges_unavailable_on_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/littleoat/worksheets-app/releases"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    let client = ReleasesClient::new(reqwest::Client::new(), &github_config(&server, None));
    assert!(client.download_badges().await.is_none());
}

#[tokio::test]
async fn test_storefront_without_github_has_no_badges() {
    let ctx = TestContext::new().await;
    assert!(ctx.page.download_badges().await.is_none());
}
