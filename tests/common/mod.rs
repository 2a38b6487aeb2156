#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use url::Url;
use uuid::Uuid;
use wiremock::{
    matchers::{header as header_eq, method, path},
    Mock, MockServer, ResponseTemplate,
};

use renthive_gateway::auth::SupabaseAuth;
use renthive_gateway::config::{AppConfig, AuthMode};
use renthive_gateway::state::{http_client, AppState};

pub const GOOD_TOKEN: &str = "good-token";
pub const ANON_KEY: &str = "anon-key";

/// The gateway router wired to a fake backend and a fake Supabase.
pub struct Harness {
    pub backend: MockServer,
    pub identity: MockServer,
    pub app: Router,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

impl Harness {
    pub async fn start() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn verifying() -> Self {
        Self::with_config(|config| config.server.auth_mode = AuthMode::Verify).await
    }

    pub async fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let backend = MockServer::start().await;
        let identity = MockServer::start().await;

        let mut config = config_for(&backend, &identity);
        customize(&mut config);

        let http = http_client().expect("http client");
        let validator = Arc::new(SupabaseAuth::new(http.clone(), &config.identity));
        let state = AppState::with_validator(config, http, validator);

        Self {
            app: renthive_gateway::app(state),
            backend,
            identity,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.app.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body")
            .to_vec();
        Reply { status, headers, body }
    }

    pub async fn get(&self, uri: &str, authorization: Option<&str>) -> Reply {
        self.send(request(Method::GET, uri, authorization, None)).await
    }

    /// Requests the backend saw so far.
    pub async fn backend_calls(&self) -> Vec<wiremock::Request> {
        self.backend.received_requests().await.unwrap_or_default()
    }

    /// Supabase answers `/auth/v1/user` for `GOOD_TOKEN` with a user, and
    /// rejects everything else with 401.
    pub async fn mount_identity(&self, user_id: Uuid) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header_eq("apikey", ANON_KEY))
            .and(header_eq("authorization", format!("Bearer {}", GOOD_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(user_id)))
            .with_priority(1)
            .mount(&self.identity)
            .await;

        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": 401,
                "msg": "invalid JWT: unable to parse or verify signature, token is expired"
            })))
            .with_priority(10)
            .mount(&self.identity)
            .await;
    }
}

pub fn config_for(backend: &MockServer, identity: &MockServer) -> AppConfig {
    let mut config = AppConfig::development();
    config.backend.base_url = Url::parse(&backend.uri()).expect("backend uri");
    config.backend.public_url =
        Url::parse(&format!("{}/api", backend.uri())).expect("public uri");
    config.identity.url = Url::parse(&identity.uri()).expect("identity uri");
    config.identity.anon_key = ANON_KEY.to_string();
    config
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn request(
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

pub fn json_request(method: Method, uri: &str, authorization: Option<&str>, body: Value) -> Request<Body> {
    request(method, uri, authorization, Some(&body.to_string()))
}

pub fn user_json(id: Uuid) -> Value {
    json!({
        "id": id,
        "aud": "authenticated",
        "role": "authenticated",
        "email": "tenant@example.com",
        "phone": "",
        "app_metadata": { "provider": "email" },
        "user_metadata": { "full_name": "Test Tenant" },
        "created_at": "2025-01-10T09:00:00Z",
        "last_sign_in_at": "2025-03-02T18:30:00Z",
        "identities": []
    })
}

/// The compiled binary, for the one smoke test that needs a real socket.
pub struct TestServer {
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub fn spawn(backend: &MockServer) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_renthive-gateway"))
            .args(["serve", "--port", &port.to_string()])
            .env("APP_ENV", "development")
            .env("BACKEND_URL", backend.uri())
            .env("PUBLIC_API_URL", format!("{}/api", backend.uri()))
            .env("SUPABASE_ANON_KEY", ANON_KEY)
            .env_remove("GATEWAY_AUTH_MODE")
            .env_remove("RENTHIVE_PORT")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn gateway binary")?;

        Ok(Self { base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("gateway did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
