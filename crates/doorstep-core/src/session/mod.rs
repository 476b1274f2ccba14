//! Process-wide session state.
//!
//! The session store is the single piece of mutable shared state in the
//! client. Components read an owned snapshot and mutate only through the
//! named operations below; nothing hands out a reference to the internals.

use std::sync::{Arc, Mutex, PoisonError};

use crate::auth::model::UserProfile;

mod poll;

pub use poll::{spawn_poll, PollHandle};

/// Tri-state authentication status.
///
/// `Unknown` covers the window between view mount and the first profile
/// check; it must never be collapsed into "signed out", or an anonymous
/// redirect fires before the check resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unknown,
    SignedIn,
    SignedOut,
}

/// Owned copy of the session state at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: AuthStatus,
    pub user: Option<UserProfile>,
    pub unread_count: u32,
}

/// Cheaply cloneable handle to the shared session state.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<SessionSnapshot>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current state as an owned snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().clone()
    }

    /// Replace the profile wholesale and mark the session signed in.
    pub fn set_authenticated(&self, user: UserProfile) {
        let mut state = self.lock();
        state.status = AuthStatus::SignedIn;
        state.user = Some(user);
    }

    /// Reset all fields; used on logout and on a failed session resolve.
    pub fn clear_session(&self) {
        let mut state = self.lock();
        state.status = AuthStatus::SignedOut;
        state.user = None;
        state.unread_count = 0;
    }

    pub fn set_unread_count(&self, count: u32) {
        self.lock().unread_count = count;
    }

    /// Decrement the unread counter, clamped at zero.
    pub fn decrement_unread(&self) {
        let mut state = self.lock();
        state.unread_count = state.unread_count.saturating_sub(1);
    }

    pub fn reset_unread(&self) {
        self.lock().unread_count = 0;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
