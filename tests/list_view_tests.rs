/// List view tests against a mocked influencer API
/// Covers the fetch lifecycle without a running server
use fraterny_affiliates::client::InfluencerApiClient;
use fraterny_affiliates::view::{render_text, InfluencerListView, Screen};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn influencer_json(name: &str, email: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "3f2504e0-4f89-11d3-9a0c-0305e82c3301",
        "name": name,
        "email": email,
        "phone": null,
        "bio": null,
        "affiliate_code": "CODE",
        "commission_rate": 30.0,
        "total_earnings": 1234.5,
        "remaining_balance": 0,
        "total_clicks": 10,
        "total_signups": 2,
        "total_purchases": 1,
        "conversion_rate": 10.0,
        "status": status,
        "is_india": true,
        "created_at": "2024-03-05T10:00:00Z"
    })
}

fn success_body(rows: Vec<serde_json::Value>) -> serde_json::Value {
    let count = rows.len();
    serde_json::json!({
        "status": "success",
        "data": rows,
        "count": count,
        "message": "Influencers fetched successfully"
    })
}

fn client_for(server: &MockServer) -> InfluencerApiClient {
    InfluencerApiClient::new(&server.uri()).unwrap()
}

#[tokio::test]
async fn test_unseeded_mount_fetches_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/influencers"))
        .and(query_param("limit", "50"))
        .and(query_param_is_missing("search"))
        .and(query_param_is_missing("status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(vec![
            influencer_json("Asha Rao", "asha@example.com", "active"),
            influencer_json("Ravi", "ravi@example.com", "inactive"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let view = InfluencerListView::mount(client_for(&mock_server), None).await;

    assert!(!view.state().is_loading());
    assert_eq!(view.state().screen(), Screen::Results);
    assert_eq!(view.state().influencers().len(), 2);
    assert_eq!(view.state().influencers()[0].name, "Asha Rao");

    let text = render_text(view.state());
    assert!(text.contains("Asha Rao"));
    assert!(text.ends_with("Showing 2 influencers\n"));
}

#[tokio::test]
async fn test_seeded_mount_does_not_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(Vec::new())))
        .expect(0)
        .mount(&mock_server)
        .await;

    let view = InfluencerListView::mount(client_for(&mock_server), Some(Vec::new())).await;

    assert!(!view.state().is_loading());
    assert_eq!(view.state().screen(), Screen::Empty);
}

#[tokio::test]
async fn test_error_envelope_message_is_shown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/influencers"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "status": "error",
            "message": "Failed to fetch influencers",
            "data": []
        })))
        .mount(&mock_server)
        .await;

    let view = InfluencerListView::mount(client_for(&mock_server), None).await;

    assert_eq!(
        view.state().screen(),
        Screen::Error("Failed to fetch influencers")
    );
    assert!(view.state().influencers().is_empty());
}

#[tokio::test]
async fn test_unparseable_response_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/influencers"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>gateway down</html>"))
        .mount(&mock_server)
        .await;

    let view = InfluencerListView::mount(client_for(&mock_server), None).await;

    assert_eq!(view.state().error(), Some("Network error occurred"));
    assert!(!view.state().is_loading());
}

#[tokio::test]
async fn test_search_sends_filters_and_replaces_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/influencers"))
        .and(query_param("limit", "50"))
        .and(query_param("search", "asha"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(vec![
            influencer_json("Asha Rao", "asha@example.com", "active"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut view = InfluencerListView::mount(client_for(&mock_server), Some(Vec::new())).await;
    view.type_search("asha");
    view.select_status("active");
    view.search().await;

    assert_eq!(view.state().screen(), Screen::Results);
    assert_eq!(view.state().influencers().len(), 1);
    assert_eq!(view.state().search_term(), "asha");
}

#[tokio::test]
async fn test_status_change_alone_does_not_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(Vec::new())))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut view = InfluencerListView::mount(client_for(&mock_server), Some(Vec::new())).await;
    view.select_status("suspended");
    view.key_press("s").await;

    assert_eq!(view.state().status_filter(), "suspended");
}

#[tokio::test]
async fn test_enter_key_searches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/influencers"))
        .and(query_param("search", "ravi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(Vec::new())))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut view = InfluencerListView::mount(client_for(&mock_server), Some(Vec::new())).await;
    view.type_search("ravi");
    view.key_press("Enter").await;

    assert_eq!(view.state().screen(), Screen::Empty);
}

#[tokio::test]
async fn test_retry_after_failure_recovers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/influencers"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/influencers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body(vec![
            influencer_json("Asha Rao", "asha@example.com", "active"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut view = InfluencerListView::mount(client_for(&mock_server), None).await;
    assert_eq!(view.state().error(), Some("Network error occurred"));

    view.retry().await;

    assert_eq!(view.state().error(), None);
    assert_eq!(view.state().screen(), Screen::Results);
}
