//! Shared utilities for integration testing.

use std::net::SocketAddr;

use calira_server::config::AppConfig;
use calira_server::http::server::HttpServer;
use serde_json::Value;
use tokio::net::TcpListener;

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Boot a real server on an ephemeral port and return a client for it.
pub async fn spawn_app(mut config: AppConfig) -> TestApp {
    config.observability.metrics_enabled = false;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).expect("server should build");
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestApp { addr, client }
}

/// Register a user through the API, returning `(token, user_id)`.
#[allow(dead_code)]
pub async fn register_user(app: &TestApp, email: &str) -> (String, String) {
    let res = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({ "email": email }))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 201, "registration should succeed");

    let body: Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    (token, user_id)
}
