//! # Session
//!
//! The authenticated identity: token, user fields and role set. Created from
//! the login response, destroyed wholesale on logout or on a 401.

use serde::{Deserialize, Serialize};

use crate::access::RoleSet;
use crate::error::ValidationError;
use crate::types::{ShopId, UserId};

/// Credentials posted to `/users/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Rejects blank credentials before anything leaves the client.
    pub fn new(username: &str, password: &str) -> Result<Self, ValidationError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ValidationError::Rule(
                "Please enter both username and password.".to_string(),
            ));
        }
        Ok(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Body returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub roles: RoleSet,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub shop_id: Option<ShopId>,
    #[serde(default)]
    pub shop_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub roles: RoleSet,
    pub user_id: Option<UserId>,
    pub shop_id: Option<ShopId>,
    pub shop_name: Option<String>,
}

impl Session {
    /// Only a non-empty token counts.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Full name, falling back to the username.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("")
    }
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Session {
            token: Some(resp.token),
            username: resp.username,
            full_name: resp.full_name,
            roles: resp.roles,
            user_id: resp.user_id,
            shop_id: resp.shop_id,
            shop_name: resp.shop_name,
        }
    }
}
