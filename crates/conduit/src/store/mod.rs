//! Reducer-style UI state store.
//!
//! All state lives in one [`Store`] that callers own and pass by reference.
//! It changes only through [`Store::dispatch`], one named [`Action`] at a
//! time, so every transition can be replayed in a test.

mod articles;
mod notification;
mod user;

use tracing::trace;

pub use articles::ArticlesState;
pub use notification::NotificationState;
pub use user::{User, UserState};

use crate::page::Page;

/// A named state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Store a new feed page.
    SetPage(Page),
    /// Record a signed-in user.
    SignIn(User),
    /// Forget the signed-in user.
    SignOut,
    /// Show an error message.
    SetError(String),
    /// Hide the current error message.
    ClearError,
}

/// Snapshot of all slices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    /// Feed pagination.
    pub articles: ArticlesState,
    /// Session.
    pub user: UserState,
    /// Error notification.
    pub notification: NotificationState,
}

/// Owner of the application [`State`].
#[derive(Debug, Default)]
pub struct Store {
    state: State,
}

impl Store {
    /// Create a store with the initial state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the current state.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Apply an action.
    pub fn dispatch(&mut self, action: Action) {
        trace!(?action, "dispatch");
        match action {
            Action::SetPage(page) => self.state.articles.set_page(page),
            Action::SignIn(user) => self.state.user.user = Some(user),
            Action::SignOut => self.state.user.user = None,
            Action::SetError(message) => self.state.notification.set_error(message),
            Action::ClearError => self.state.notification.clear_error(),
        }
    }

    /// The stored feed page.
    #[must_use]
    pub fn page(&self) -> Page {
        self.state.articles.page
    }

    /// Username of the signed-in user.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.state.user.username()
    }
}

#[cfg(test)]
pub(crate) fn sample_user(username: &str) -> User {
    User {
        email: format!("{username}@example.com"),
        token: format!("token-{username}"),
        username: username.to_string(),
        bio: None,
        image: None,
    }
}
