#![allow(clippy::unwrap_used)]
// Integration tests for `UtilityAuthClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use meterly_api::{Error, TransportConfig, UtilityAuthClient};

const LOGIN_PATH: &str = "/citizenlink/common/common/ajax/checkLoginCredentials.php";
const TOKEN_PATH: &str = "/citizenlink/ubs/common/ajax/sensusFetchClientAuthorization.php";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, UtilityAuthClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = UtilityAuthClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

async fn mount_portal_session(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/utility/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "PHPSESSID=abc123; Path=/")
                .set_body_string("<html></html>"),
        )
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn password(value: &str) -> SecretString {
    value.to_string().into()
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_authenticate_and_exchange_success() {
    let (server, client) = setup().await;
    mount_portal_session(&server).await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_string_contains("loginId=12345"))
        .and(body_string_contains("passId=MyPassword"))
        .and(body_string_contains("SITENAME=UTILITY"))
        .and(body_string_contains("widgetName=INITIAL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": [] })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("SITENAME=UTILITY"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "eyJhbGciOi.test" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = client
        .authenticate("12345", &password("MyPassword"))
        .await
        .unwrap();
    assert_eq!(session.username(), "12345");

    let token = client.exchange_for_token(&session).await.unwrap();
    assert!(!token.is_empty());
    assert_eq!(token.expose(), "eyJhbGciOi.test");
}

#[tokio::test]
async fn test_token_exchange_reuses_portal_cookie() {
    let (server, client) = setup().await;
    mount_portal_session(&server).await;
    mount_login(&server, json!({ "errors": [] })).await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("cookie", "PHPSESSID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.authenticate("12345", &password("pw")).await.unwrap();
    assert!(client.has_session_cookie());

    let token = client.exchange_for_token(&session).await.unwrap();
    assert_eq!(token.expose(), "tok");
}

#[tokio::test]
async fn test_authenticate_rejected_credentials() {
    let (server, client) = setup().await;
    mount_portal_session(&server).await;
    mount_login(
        &server,
        json!({ "errors": ["Invalid username or password"] }),
    )
    .await;

    let result = client.authenticate("12345", &password("wrong")).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(
                message.contains("Invalid username or password"),
                "expected portal message, got: {message}"
            );
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_authenticate_http_failure() {
    let (server, client) = setup().await;
    mount_portal_session(&server).await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let result = client.authenticate("12345", &password("pw")).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_authenticate_without_errors_list() {
    let (server, client) = setup().await;
    mount_portal_session(&server).await;
    mount_login(&server, json!({ "status": "maintenance" })).await;

    let result = client.authenticate("12345", &password("pw")).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_authenticate_portal_unavailable() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/utility/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.authenticate("12345", &password("pw")).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("503"), "expected status in message, got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

// ── Token exchange tests ────────────────────────────────────────────

#[tokio::test]
async fn test_token_response_without_access_token() {
    let (server, client) = setup().await;
    mount_portal_session(&server).await;
    mount_login(&server, json!({ "errors": [] })).await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let session = client.authenticate("12345", &password("pw")).await.unwrap();
    let result = client.exchange_for_token(&session).await;

    match result {
        Err(Error::TokenExchange { ref message, .. }) => {
            assert!(message.contains("access_token"), "got: {message}");
        }
        other => panic!("expected TokenExchange error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_token_response_with_empty_token() {
    let (server, client) = setup().await;
    mount_portal_session(&server).await;
    mount_login(&server, json!({ "errors": [] })).await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "" })))
        .mount(&server)
        .await;

    let session = client.authenticate("12345", &password("pw")).await.unwrap();
    let result = client.exchange_for_token(&session).await;

    assert!(
        matches!(result, Err(Error::TokenExchange { .. })),
        "expected TokenExchange error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_token_endpoint_http_error() {
    let (server, client) = setup().await;
    mount_portal_session(&server).await;
    mount_login(&server, json!({ "errors": [] })).await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let session = client.authenticate("12345", &password("pw")).await.unwrap();
    let result = client.exchange_for_token(&session).await;

    match result {
        Err(Error::TokenExchange { ref message, .. }) => {
            assert!(message.contains("502"), "got: {message}");
        }
        other => panic!("expected TokenExchange error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_token_endpoint_malformed_body() {
    let (server, client) = setup().await;
    mount_portal_session(&server).await;
    mount_login(&server, json!({ "errors": [] })).await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>session expired</html>"))
        .mount(&server)
        .await;

    let session = client.authenticate("12345", &password("pw")).await.unwrap();
    let result = client.exchange_for_token(&session).await;

    assert!(
        matches!(result, Err(Error::TokenExchange { .. })),
        "expected TokenExchange error, got: {result:?}"
    );
}
