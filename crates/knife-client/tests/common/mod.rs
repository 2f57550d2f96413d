#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use knife_client_lib::api::HttpCollaborator;
use knife_client_lib::config::ClientConfig;

/// One request as the stub server saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub cookie: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    set_cookie: Option<String>,
}

#[derive(Clone, Default)]
struct Shared {
    seen: Arc<Mutex<Vec<Seen>>>,
    routes: Arc<Mutex<HashMap<(Method, String), Canned>>>,
}

/// Records every request and answers from a table of canned responses.
/// Unknown routes get `200 null`.
pub struct StubServer {
    pub base_url: String,
    shared: Shared,
}

impl StubServer {
    pub async fn start() -> Self {
        let shared = Shared::default();
        let app = Router::new().fallback(record).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            shared,
        }
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.respond_raw(method, path, status, &body.to_string(), None);
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: &str, set_cookie: Option<&str>) {
        self.shared.routes.lock().unwrap().insert(
            (method, path.to_string()),
            Canned {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
                set_cookie: set_cookie.map(String::from),
            },
        );
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.shared.seen.lock().unwrap().clone()
    }

    /// `METHOD /path` of every request, in order.
    pub fn lines(&self) -> Vec<String> {
        self.seen()
            .iter()
            .map(|s| format!("{} {}", s.method, s.path))
            .collect()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            server_url: self.base_url.clone(),
            ..ClientConfig::default()
        }
    }

    pub fn client(&self) -> HttpCollaborator {
        HttpCollaborator::new(&self.config()).unwrap()
    }
}

async fn record(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    shared.seen.lock().unwrap().push(Seen {
        method: method.clone(),
        path: path.clone(),
        cookie: headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: serde_json::from_slice(&body).ok(),
    });

    let canned = shared.routes.lock().unwrap().get(&(method, path)).cloned();
    match canned {
        Some(c) => {
            let mut response = (c.status, [(header::CONTENT_TYPE, "application/json")], c.body).into_response();
            if let Some(cookie) = c.set_cookie {
                response
                    .headers_mut()
                    .insert(header::SET_COOKIE, cookie.parse().unwrap());
            }
            response
        }
        None => (StatusCode::OK, "null").into_response(),
    }
}
