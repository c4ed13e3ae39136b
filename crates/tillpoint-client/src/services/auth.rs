use tillpoint_core::{LoginRequest, LoginResponse};
use tracing::debug;

use crate::api::ApiClient;
use crate::error::ClientResult;

pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        AuthService { api }
    }

    /// `POST /users/login`. Does not touch the session; the shell does that.
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<LoginResponse> {
        debug!(username = %credentials.username, "Logging in");
        self.api.post("/users/login", credentials).await
    }
}
