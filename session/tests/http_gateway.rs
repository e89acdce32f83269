//! `HttpIdentityGateway` against a mock identity backend.

#![allow(clippy::unwrap_used)]

use relief_ops_session::providers::IdentityGateway;
use relief_ops_session::{GatewayConfig, GatewayError, HttpIdentityGateway, Role, User};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ada() -> User {
    User {
        id: "u-ada".to_string(),
        name: "Ada".to_string(),
        email: "ada@relief.example".to_string(),
        role: Role::Volunteer,
        avatar_url: Some("https://cdn.relief.example/ada.png".to_string()),
    }
}

fn gateway_for(server: &MockServer) -> HttpIdentityGateway {
    HttpIdentityGateway::new(
        GatewayConfig::new(server.uri()).with_request_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

#[tokio::test]
async fn fetches_current_user_from_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": ada() })))
        .expect(1)
        .mount(&server)
        .await;

    let user = gateway_for(&server).fetch_current_session().await.unwrap();
    assert_eq!(user, ada());
}

#[tokio::test]
async fn login_posts_credentials_and_unwraps_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@relief.example", "password": "secret" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "user": ada() } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = gateway_for(&server)
        .login("ada@relief.example", "secret")
        .await
        .unwrap();
    assert_eq!(user, ada());
}

#[tokio::test]
async fn session_cookie_from_login_is_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "relief_session=abc123; Path=/; HttpOnly")
                .set_body_json(json!({ "data": { "user": ada() } })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("cookie", "relief_session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": ada() })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.login("ada@relief.example", "secret").await.unwrap();

    // A clone shares the cookie store
    let user = gateway.clone().fetch_current_session().await.unwrap();
    assert_eq!(user, ada());
}

#[tokio::test]
async fn backend_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let error = gateway_for(&server)
        .login("ada@relief.example", "wrong")
        .await
        .unwrap_err();

    assert_eq!(error, GatewayError::authentication(401, "Invalid credentials"));
    assert_eq!(error.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn fallback_messages_cover_bodies_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "detail": "nope" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "error": "" })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);

    let fetch = gateway.fetch_current_session().await.unwrap_err();
    assert_eq!(fetch, GatewayError::authentication(401, "Failed to fetch current user"));

    let login = gateway.login("ada@relief.example", "x").await.unwrap_err();
    assert_eq!(login, GatewayError::authentication(500, "Login failed"));

    let signup = gateway
        .signup("Ada", "ada@relief.example", "longenough", Role::Standard)
        .await
        .unwrap_err();
    assert_eq!(signup, GatewayError::authentication(422, "Sign up failed"));

    let logout = gateway.logout_session().await.unwrap_err();
    assert_eq!(logout, GatewayError::authentication(503, "Logout failed"));
}

#[tokio::test]
async fn signup_sends_wire_role_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_json(json!({
            "name": "Ada",
            "email": "ada@relief.example",
            "password": "longenough",
            "role": "volunteer",
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "data": { "user_id": "u-ada" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let body = gateway_for(&server)
        .signup("Ada", "ada@relief.example", "longenough", Role::Volunteer)
        .await
        .unwrap();
    assert_eq!(body["data"]["user_id"], "u-ada");
}

#[tokio::test]
async fn empty_logout_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let body = gateway_for(&server).logout_session().await.unwrap();
    assert_eq!(body, serde_json::Value::Null);
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 1 } })))
        .mount(&server)
        .await;

    let error = gateway_for(&server).fetch_current_session().await.unwrap_err();
    assert!(matches!(error, GatewayError::Decode(_)));
    assert!(!error.is_authentication());
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let gateway = HttpIdentityGateway::new(GatewayConfig::new(format!("http://127.0.0.1:{port}")))
        .unwrap();

    let error = gateway.fetch_current_session().await.unwrap_err();
    assert!(matches!(error, GatewayError::Transport(_)));
    assert_eq!(error.status(), None);
}
