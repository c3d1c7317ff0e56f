//! Process-wide authentication state with explicit subscribe/unsubscribe.
//!
//! The hosted auth provider pushes [`AuthEvent`]s; [`AuthHub`] folds them into one
//! [`AuthState`], applies the e-mail confirmation policy, and fans the result out to
//! subscribers.

use crate::session::notice::Notice;

/// Which auth form the caller is showing. Set explicitly, never inferred from output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Existing-account sign in.
    #[default]
    SignIn,
    /// New account registration.
    SignUp,
    /// Password recovery.
    ForgottenPassword,
}

impl AuthMode {
    /// Form heading.
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in to your account",
            Self::SignUp => "Create a new account",
            Self::ForgottenPassword => "Recover access",
        }
    }
}

/// Authenticated user session as reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuthSession {
    /// Provider user id.
    pub user_id: String,
    /// Account e-mail.
    pub email: String,
    /// Whether the e-mail address has been confirmed.
    pub email_confirmed: bool,
}

/// Provider notifications.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// Session restored at start-up (or none).
    InitialSession(Option<AuthSession>),
    /// Password sign in completed.
    SignedIn(AuthSession),
    /// Registration completed; no session until the e-mail is confirmed.
    SignedUp(Option<AuthSession>),
    /// Session ended.
    SignedOut,
    /// Access token refreshed.
    TokenRefreshed(AuthSession),
}

/// Snapshot delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    /// Current session, if signed in.
    pub session: Option<AuthSession>,
    /// `true` until the first event arrives.
    pub loading: bool,
    /// Mirrors `session.email_confirmed`.
    pub email_confirmed: bool,
}

impl AuthState {
    /// Signed-in user id.
    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }
}

/// Handle returned by [`AuthHub::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&AuthState)>;

/// Shared auth context.
pub struct AuthHub {
    state: AuthState,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    closed: bool,
}

impl Default for AuthHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AuthHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHub")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl AuthHub {
    /// Hub in the loading state with no session.
    pub fn new() -> Self {
        Self {
            state: AuthState {
                session: None,
                loading: true,
                email_confirmed: false,
            },
            next_id: 0,
            listeners: Vec::new(),
            closed: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Register a listener called after every state change.
    pub fn subscribe(&mut self, listener: impl FnMut(&AuthState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        if !self.closed {
            self.listeners.push((id, Box::new(listener)));
        }
        id
    }

    /// Remove a listener. Returns `false` when the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        before != self.listeners.len()
    }

    /// Drop all listeners; later events are ignored.
    pub fn shutdown(&mut self) {
        self.listeners.clear();
        self.closed = true;
    }

    /// Apply a provider event and return the notices it produced.
    pub fn dispatch(&mut self, event: AuthEvent) -> Vec<Notice> {
        if self.closed {
            return Vec::new();
        }
        tracing::debug!(?event, "auth event");
        let mut notices = Vec::new();

        match event {
            AuthEvent::InitialSession(session) => self.set_session(session),
            AuthEvent::SignedUp(session) => {
                if session.is_none() {
                    notices.push(Notice::info("Check your e-mail to confirm the account!"));
                }
                self.set_session(session);
            }
            AuthEvent::SignedIn(session) => {
                let confirmed = session.email_confirmed;
                self.set_session(Some(session));
                if !confirmed {
                    notices.push(Notice::error(
                        "Please confirm your e-mail before continuing.",
                    ));
                    self.set_session(None);
                }
            }
            AuthEvent::TokenRefreshed(session) => {
                if session.email_confirmed {
                    notices.push(Notice::success("E-mail confirmed successfully!"));
                }
                self.set_session(Some(session));
            }
            AuthEvent::SignedOut => self.set_session(None),
        }
        notices
    }

    /// Local sign out.
    pub fn sign_out(&mut self) {
        if !self.closed {
            self.set_session(None);
        }
    }

    fn set_session(&mut self, session: Option<AuthSession>) {
        self.state.email_confirmed = session.as_ref().is_some_and(|s| s.email_confirmed);
        self.state.session = session;
        self.state.loading = false;
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/auth.rs"]
mod tests;
