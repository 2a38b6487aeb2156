mod common;

use axum::http::{header, Method, StatusCode};
use common::*;

#[tokio::test]
async fn root_lists_every_proxied_route() {
    let h = Harness::start().await;

    let reply = h.get("/", None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let body = reply.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "RentHive Gateway");
    assert_eq!(body["data"]["auth_mode"], "presence");

    let routes = body["data"]["routes"].as_array().expect("routes array");
    assert_eq!(routes.len(), renthive_gateway::proxy::ROUTES.len());
    assert!(routes
        .iter()
        .any(|r| r["name"] == "user_lookup" && r["path"] == "/api/users/lookup"));
}

#[tokio::test]
async fn health_reports_environment() {
    let h = Harness::start().await;

    let reply = h.get("/health", None).await;
    assert_eq!(reply.status, StatusCode::OK);

    let body = reply.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["environment"], "development");
    assert!(body["data"]["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_routes_get_the_error_envelope() {
    let h = Harness::start().await;

    let reply = h.get("/api/nothing-here", Some(&bearer(GOOD_TOKEN))).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let body = reply.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(h.backend_calls().await.is_empty());
}

#[tokio::test]
async fn wrong_method_on_a_proxied_path_is_not_forwarded() {
    let h = Harness::start().await;

    let reply = h
        .send(request(
            Method::PATCH,
            "/api/agreements/a-1/tasks",
            Some(&bearer(GOOD_TOKEN)),
            Some("{}"),
        ))
        .await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(h.backend_calls().await.is_empty());
}

#[tokio::test]
async fn development_allows_cross_origin_calls() {
    let h = Harness::start().await;

    let req = axum::http::Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(axum::body::Body::empty())
        .unwrap();
    let reply = h.send(req).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
