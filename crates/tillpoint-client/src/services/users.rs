//! User accounts (`/users`).

use serde::{Deserialize, Serialize};
use tillpoint_core::validation::validate_user_draft;
use tillpoint_core::{RoleSet, ShopId, UserDraft, UserId};
use tracing::info;

use super::Collection;
use crate::api::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, alias = "userId")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub roles: RoleSet,
    #[serde(default)]
    pub shop_id: Option<ShopId>,
    #[serde(default)]
    pub shop_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordReset {
    temporary_password: String,
}

pub struct UserService<'a> {
    api: &'a ApiClient,
    users: Collection<'a, UserRecord>,
}

impl<'a> UserService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        UserService {
            api,
            users: Collection::new(api, "/users"),
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<UserRecord>> {
        self.users.list().await
    }

    pub async fn get(&self, id: UserId) -> ClientResult<UserRecord> {
        self.users.get(id).await
    }

    pub async fn create(&self, draft: &UserDraft) -> ClientResult<UserRecord> {
        validate_user_draft(draft, true)?;
        let user = self.users.create(draft).await?;
        info!(username = %draft.username, "User created");
        Ok(user)
    }

    /// Updates a user; a blank password leaves the current one unchanged.
    pub async fn update(&self, id: UserId, draft: &UserDraft) -> ClientResult<UserRecord> {
        validate_user_draft(draft, false)?;
        let mut draft = draft.clone();
        if draft.password.as_deref().is_some_and(|p| p.trim().is_empty()) {
            draft.password = None;
        }
        self.users.update(id, &draft).await
    }

    pub async fn delete(&self, id: UserId) -> ClientResult<()> {
        self.users.delete(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Issues a temporary password and returns it for the admin to hand over.
    pub async fn reset_password(&self, id: UserId) -> ClientResult<String> {
        let reset: PasswordReset = self
            .api
            .put_empty(&format!("/users/{}/reset-password", id))
            .await?;
        info!(user_id = id, "Password reset");
        Ok(reset.temporary_password)
    }
}
