use dnsdumpster_api::types::AuthToken;
use dnsdumpster_api::{Client, Error};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn fetch_token_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("landing.html");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let token = client.fetch_token().await.unwrap();
    assert_eq!(token.as_str(), "f1d2d2f924e986ac86fdf7b36c94bcdf32beec15");
}

#[tokio::test]
async fn fetch_token_missing_snippet() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.fetch_token().await;
    assert!(matches!(result, Err(Error::TokenNotFound)));
}

#[tokio::test]
async fn fetch_token_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.fetch_token().await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 503 })));
}

#[tokio::test]
async fn submit_sends_token_and_target() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/htmld/"))
        .and(header("authorization", "secret-token"))
        .and(body_string("target=example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<table></table>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let html = client
        .submit(&AuthToken::new("secret-token"), "example.com")
        .await
        .unwrap();
    assert_eq!(html, "<table></table>");
}

#[tokio::test]
async fn submit_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/htmld/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.submit(&AuthToken::new("stale"), "example.com").await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 401 })));
}

#[tokio::test]
async fn fetch_asset_returns_raw_bytes() {
    let mock_server = MockServer::start().await;
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    Mock::given(method("GET"))
        .and(path("/static/maps/example.com-abc123.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png.clone()))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let url = format!("{}/static/maps/example.com-abc123.png", client.api_url());
    let bytes = client.fetch_asset(&url).await.unwrap();
    assert_eq!(bytes, png);
}

#[tokio::test]
async fn fetch_asset_not_found() {
    let mock_server = MockServer::start().await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let url = format!("{}/static/xlsx/example.com-abc123.xlsx", client.api_url());
    let result = client.fetch_asset(&url).await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 404 })));
}

#[tokio::test]
async fn fetch_asset_rejects_garbage_url() {
    let client = Client::with_base_url("http://127.0.0.1:9").unwrap();
    let result = client.fetch_asset("not a url").await;
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}
