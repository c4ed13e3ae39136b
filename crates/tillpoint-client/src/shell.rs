//! # Application Shell
//!
//! Owns the session store, the navigator and the gateway client, and routes
//! every navigation through the guard.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login ──► POST /users/login ──► session written ──► role router        │
//! │                                                                         │
//! │  open(path)                                                             │
//! │    ├── unknown or "/"   ──► /login                                      │
//! │    ├── /redirect        ──► role router                                 │
//! │    ├── public           ──► render                                      │
//! │    └── protected ──► guard ──► render | redirect + notice               │
//! │                                                                         │
//! │  logout ──► session cleared ──► /login                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tillpoint_core::access::{self, paths, Resolution, RouteAccess, RouteDescriptor};
use tillpoint_core::menu::{visible_menu, MenuItem};
use tillpoint_core::{CoreError, LoginRequest, Notice, Session};
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::navigator::Navigator;
use crate::session::SessionStore;
use crate::storage::{FileStorage, MemoryStorage, SessionStorage};
use crate::terminal::CashierTerminal;

/// Where a shell operation left the user, and what to tell them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub location: String,
    pub notice: Option<Notice>,
}

impl Transition {
    fn to(location: impl Into<String>) -> Self {
        Transition {
            location: location.into(),
            notice: None,
        }
    }

    fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

pub struct Shell {
    config: ClientConfig,
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
    api: Arc<ApiClient>,
}

impl Shell {
    /// Builds a shell whose session lives in the configured file, or only in
    /// memory when no data directory can be found.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let storage: Arc<dyn SessionStorage> = match config.session.resolved_path() {
            Some(path) => {
                debug!(?path, "Using session file");
                Arc::new(FileStorage::open(path))
            }
            None => {
                warn!("No data directory available, session will not persist");
                Arc::new(MemoryStorage::new())
            }
        };
        Self::with_storage(config, storage)
    }

    /// Builds a shell with a session that lives only as long as the process.
    pub fn in_memory(config: ClientConfig) -> ClientResult<Self> {
        Self::with_storage(config, Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(config: ClientConfig, storage: Arc<dyn SessionStorage>) -> ClientResult<Self> {
        config.validate()?;
        let session = Arc::new(SessionStore::new(storage));
        let navigator = Arc::new(Navigator::new());
        let api = Arc::new(ApiClient::new(&config.api, session.clone(), navigator.clone())?);
        Ok(Shell {
            config,
            session,
            navigator,
            api,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    pub fn location(&self) -> String {
        self.navigator.current()
    }

    /// The menu the current session may see.
    pub fn menu(&self) -> Vec<MenuItem> {
        visible_menu(&self.session.snapshot().roles)
    }

    /// A cashier terminal on the session's shop.
    pub fn terminal(&self) -> CashierTerminal {
        CashierTerminal::new(self.api.clone(), self.config.payment_method())
    }

    // =========================================================================
    // Login / Logout
    // =========================================================================

    /// Logs in and lands on the role's home page.
    ///
    /// Blank credentials never reach the backend. A rejected login reports
    /// the backend's own text when it sends one.
    pub async fn login(&self, username: &str, password: &str) -> Result<Transition, Notice> {
        let request = LoginRequest::new(username, password)
            .map_err(|e| Notice::from(CoreError::Validation(e)))?;

        let response = match self.api.auth().login(&request).await {
            Ok(response) => response,
            Err(ClientError::Http { message, .. }) => {
                return Err(Notice::login_failed(Some(&message)));
            }
            Err(e) => {
                warn!(username = %request.username, error = %e, "Login failed");
                return Err(Notice::login_failed(None));
            }
        };

        let session = Session::from(response);
        let welcome = Notice::welcome(session.display_name());
        self.session
            .begin(session)
            .map_err(|e| Notice::login_failed(Some(&e.to_string())))?;

        info!(username = %request.username, "Logged in");
        Ok(self.route_by_role().with_notice(welcome))
    }

    pub fn logout(&self) -> Transition {
        // Storage failures are already logged; memory is cleared regardless.
        let _ = self.session.clear();
        self.navigator.go(paths::LOGIN);
        Transition::to(paths::LOGIN).with_notice(Notice::logged_out())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Navigates to `path`, applying the guard.
    pub fn navigate(&self, path: &str) -> Transition {
        match self.open(path, |_| ()) {
            Ok(()) => Transition::to(path),
            Err(redirect) => redirect,
        }
    }

    /// Navigates to `path` and runs `render` only if the session may see it.
    ///
    /// Any redirect (fallback, role router, guard denial) comes back as
    /// `Err` without `render` having run.
    pub fn open<T>(
        &self,
        path: &str,
        render: impl FnOnce(&'static RouteDescriptor) -> T,
    ) -> Result<T, Transition> {
        let route = match access::resolve_route(path) {
            Resolution::Fallback => {
                debug!(path, "Unknown route, falling back to login");
                self.navigator.go(paths::LOGIN);
                return Err(Transition::to(paths::LOGIN));
            }
            Resolution::Route(route) => route,
        };

        match route.access {
            RouteAccess::RoleRedirect => Err(self.route_by_role()),
            RouteAccess::Public => {
                self.navigator.go(path);
                Ok(render(route))
            }
            RouteAccess::Protected(required) => {
                let session = self.session.snapshot();
                match access::guard(&session, required, || render(route)) {
                    Ok(page) => {
                        self.navigator.go(path);
                        Ok(page)
                    }
                    Err(denial) => {
                        warn!(
                            path,
                            reason = ?denial.reason,
                            redirect_to = denial.redirect_to,
                            "Navigation denied"
                        );
                        self.navigator.go(denial.redirect_to);
                        Err(Transition::to(denial.redirect_to).with_notice(denial.notice))
                    }
                }
            }
        }
    }

    fn route_by_role(&self) -> Transition {
        let landing = access::landing_route(&self.session.snapshot());
        debug!(landing, "Role router");
        self.navigator.go(landing);
        Transition::to(landing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tillpoint_core::NoticeKind;

    fn shell_with(roles: &[&str]) -> Shell {
        let shell = Shell::in_memory(ClientConfig::default()).unwrap();
        if !roles.is_empty() {
            shell
                .session
                .begin(Session {
                    token: Some("tok".into()),
                    roles: roles.iter().copied().collect(),
                    ..Session::default()
                })
                .unwrap();
        }
        shell
    }

    #[test]
    fn test_protected_route_without_token() {
        let shell = shell_with(&[]);
        let rendered = Cell::new(false);
        let result = shell.open("/cashier", |_| rendered.set(true));

        let redirect = result.unwrap_err();
        assert!(!rendered.get());
        assert_eq!(redirect.location, "/login");
        assert_eq!(redirect.notice.unwrap().title, "Session Expired");
        assert_eq!(shell.location(), "/login");
    }

    #[test]
    fn test_denied_role_goes_to_landing() {
        let shell = shell_with(&["ROLE_CASHIER"]);
        let t = shell.navigate("/shops");
        assert_eq!(t.location, "/cashier");
        assert_eq!(t.notice.unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_allowed_route_renders() {
        let shell = shell_with(&["ROLE_CASHIER"]);
        let title = shell.open("/sales/42", |route| route.title).unwrap();
        assert_eq!(title, "Sale Details");
        assert_eq!(shell.location(), "/sales/42");
    }

    #[test]
    fn test_redirect_runs_role_router() {
        let shell = shell_with(&["ROLE_CASHIER", "ROLE_ADMIN"]);
        assert_eq!(shell.navigate("/redirect").location, "/dashboard");
        assert_eq!(shell.navigate("/").location, "/login");
        assert_eq!(shell.navigate("/no/such/page").location, "/login");
    }

    #[test]
    fn test_logout_clears_session() {
        let shell = shell_with(&["ROLE_ADMIN"]);
        let t = shell.logout();
        assert_eq!(t.location, "/login");
        assert!(!shell.session().is_authenticated());
        assert!(shell.menu().is_empty());
    }

    #[tokio::test]
    async fn test_blank_login_is_rejected_locally() {
        let shell = shell_with(&[]);
        let notice = shell.login("  ", "secret").await.unwrap_err();
        assert_eq!(notice.message, "Please enter both username and password.");
        assert!(shell.navigator().history().is_empty());
    }
}
