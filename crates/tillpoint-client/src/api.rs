//! # API Gateway Client
//!
//! The single HTTP client every service goes through.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  service call                                                           │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  attach "Authorization: Bearer <token>"   (missing token: warn, go on)  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  send ──► 2xx ──► JSON body (empty body reads as null)                  │
//! │     │                                                                   │
//! │     ├──► 401 ──► clear session ──► navigate /login ──► Unauthorized     │
//! │     │                                                                   │
//! │     └──► other ──► Http { status, message from body }                   │
//! │                                                                         │
//! │  No retries, no throttling.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tillpoint_core::access::paths;
use tracing::{debug, error, warn};

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::navigator::Navigator;
use crate::session::SessionStore;

/// Query parameters as name/value pairs.
pub type Query<'a> = &'a [(&'a str, String)];

pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
}

impl ApiClient {
    pub fn new(
        settings: &ApiSettings,
        session: Arc<SessionStore>,
        navigator: Arc<Navigator>,
    ) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(ApiClient {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)).await
    }

    pub async fn get_query<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> ClientResult<T> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    /// POST with query parameters and no body.
    pub async fn post_query<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> ClientResult<T> {
        self.send(self.request(Method::POST, path).query(query)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// PUT with no body.
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::PUT, path)).await
    }

    /// PATCH with query parameters and no body.
    pub async fn patch_query<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> ClientResult<T> {
        self.send(self.request(Method::PATCH, path).query(query)).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send::<serde_json::Value>(self.request(Method::DELETE, path))
            .await
            .map(|_| ())
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, &url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => {
                warn!(%url, "No token found for request");
                builder
            }
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!(%url, "Token expired or unauthorized, logging out");
            // The redirect happens even if clearing storage fails.
            let _ = self.session.clear();
            self.navigator.go(paths::LOGIN);
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let message = backend_message(&text);
            if status.is_server_error() {
                error!(%url, status = status.as_u16(), %message, "Backend error");
            } else {
                debug!(%url, status = status.as_u16(), %message, "Backend rejected request");
            }
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        debug!(%url, status = status.as_u16(), "Request succeeded");
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

/// Human-readable message from an error body: `message`, then `error`, then
/// the raw text.
pub fn backend_message(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| text.trim().to_string()),
        Ok(serde_json::Value::String(s)) => s,
        _ => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_precedence() {
        assert_eq!(
            backend_message(r#"{"message":"Shop exists","error":"Conflict"}"#),
            "Shop exists"
        );
        assert_eq!(backend_message(r#"{"error":"Bad credentials"}"#), "Bad credentials");
        assert_eq!(backend_message(r#""plain json string""#), "plain json string");
        assert_eq!(backend_message("Insufficient stock "), "Insufficient stock");
        assert_eq!(backend_message(r#"{"status":500}"#), r#"{"status":500}"#);
    }
}
