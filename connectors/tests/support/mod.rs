//! In-process stand-in for an exchange REST API.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    /// Decoded `application/x-www-form-urlencoded` body
    pub fn form(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect()
    }

    pub fn query_params(&self) -> HashMap<String, String> {
        url::form_urlencoded::parse(self.query.as_bytes())
            .into_owned()
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MockExchange {
    routes: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with 200 for `METHOD path`
    pub fn respond(&self, method: &str, path: &str, body: &str) {
        self.respond_with(method, path, StatusCode::OK, body);
    }

    pub fn respond_with(&self, method: &str, path: &str, status: StatusCode, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(format!("{} {}", method, path), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self, path: &str) -> Option<Recorded> {
        self.requests()
            .into_iter()
            .rev()
            .find(|request| request.path == path)
    }

    /// Start serving on an ephemeral port and return the base URL
    pub async fn start(&self) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
                .unwrap();
        });
        format!("http://{}", addr)
    }
}

async fn handle(
    State(mock): State<MockExchange>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let recorded = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    };
    let key = format!("{} {}", recorded.method, recorded.path);
    mock.requests.lock().unwrap().push(recorded);

    mock.routes
        .lock()
        .unwrap()
        .get(&key)
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, "not found".to_string()))
}
