//! # Navigator
//!
//! Holds the current location. The shell writes guarded navigations here;
//! the API gateway writes the forced `/login` redirect after a 401.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use tillpoint_core::access::paths;
use tracing::debug;

/// Locations remembered; older moves are forgotten.
pub const HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
struct NavState {
    current: String,
    history: VecDeque<String>,
}

#[derive(Debug)]
pub struct Navigator {
    state: Mutex<NavState>,
}

impl Navigator {
    /// Starts at the login page.
    pub fn new() -> Self {
        Navigator {
            state: Mutex::new(NavState {
                current: paths::LOGIN.to_string(),
                history: VecDeque::with_capacity(HISTORY_LIMIT),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NavState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Moves to `path` and records the move.
    pub fn go(&self, path: &str) {
        debug!(path, "Navigating");
        let mut state = self.lock();
        state.current = path.to_string();
        if state.history.len() == HISTORY_LIMIT {
            state.history.pop_front();
        }
        state.history.push_back(path.to_string());
    }

    pub fn current(&self) -> String {
        self.lock().current.clone()
    }

    /// The last [`HISTORY_LIMIT`] locations moved to, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.lock().history.iter().cloned().collect()
    }

    /// How many times `path` appears in the remembered history.
    pub fn visits(&self, path: &str) -> usize {
        self.lock().history.iter().filter(|p| p.as_str() == path).count()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
