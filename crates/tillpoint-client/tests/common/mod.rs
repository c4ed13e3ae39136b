//! In-process mock backend for the client integration tests.
//!
//! An axum server on a random local port. Every request is recorded; replies
//! are scripted per `METHOD /path` and unscripted paths answer 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use tillpoint_client::storage::MemoryStorage;
use tillpoint_client::{ClientConfig, Shell};
use tillpoint_core::Session;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is json")
    }
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

#[derive(Default)]
struct Backend {
    replies: RwLock<HashMap<String, Reply>>,
    requests: RwLock<Vec<Recorded>>,
}

pub struct MockBackend {
    backend: Arc<Backend>,
    _handle: JoinHandle<()>,
    addr: SocketAddr,
}

impl MockBackend {
    pub async fn start() -> Self {
        let backend = Arc::new(Backend::default());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");

        let app = Router::new().fallback(handle).with_state(backend.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend failed");
        });

        Self {
            backend,
            _handle: handle,
            addr,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn reply(&self, method: &str, path: &str, status: u16, body: Value) {
        self.reply_after(method, path, status, body, Duration::ZERO).await;
    }

    pub async fn reply_after(&self, method: &str, path: &str, status: u16, body: Value, delay: Duration) {
        self.backend.replies.write().await.insert(
            format!("{} {}", method, path),
            Reply {
                status,
                body: body.to_string(),
                delay,
            },
        );
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.backend.requests.read().await.clone()
    }

    pub async fn count(&self, method: &str, path: &str) -> usize {
        self.backend
            .requests
            .read()
            .await
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub async fn last(&self, method: &str, path: &str) -> Option<Recorded> {
        self.backend
            .requests
            .read()
            .await
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .cloned()
    }
}

async fn handle(
    State(backend): State<Arc<Backend>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    let key = format!("{} {}", recorded.method, recorded.path);
    backend.requests.write().await.push(recorded);

    let reply = backend.replies.read().await.get(&key).cloned();
    match reply {
        Some(reply) => {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "message": format!("no route for {}", key) }).to_string(),
        )
            .into_response(),
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn shell_for(backend: &MockBackend) -> Shell {
    Shell::with_storage(
        ClientConfig::for_base_url(backend.url()),
        Arc::new(MemoryStorage::new()),
    )
    .expect("shell")
}

/// A shell already logged in as a cashier of shop 1.
pub fn cashier_shell(backend: &MockBackend) -> Shell {
    let shell = shell_for(backend);
    shell
        .api()
        .session()
        .begin(Session {
            token: Some("cashier-token".into()),
            username: Some("cash1".into()),
            full_name: Some("Cash One".into()),
            roles: ["ROLE_CASHIER"].into_iter().collect(),
            user_id: Some(9),
            shop_id: Some(1),
            shop_name: Some("Main".into()),
        })
        .expect("begin session");
    shell
}

pub fn product(id: i64, name: &str, usd: f64) -> Value {
    json!({
        "productId": id,
        "productName": name,
        "category": "Groceries",
        "unit": "each",
        "sellingPriceUSD": usd,
        "sellingPriceZWL": usd * 100.0,
    })
}

pub fn stock_line(shop_id: i64, product: Value, quantity: i64) -> Value {
    json!({
        "product": product,
        "quantityInStock": quantity,
        "shop": { "id": shop_id, "shopName": "Main" },
    })
}

pub fn adjustment(shop_id: i64, product_id: i64, usd: f64, date: &str) -> Value {
    json!({
        "product": { "productId": product_id },
        "shop": { "id": shop_id },
        "newPriceUSD": usd,
        "newPriceZWL": null,
        "adjustmentDate": date,
    })
}
