//! Session state machine - single source of truth for authentication
//!
//! States form a small machine with pure transitions:
//! `Anonymous -> Authenticating -> Authenticated | Failed`, and `Failed`
//! behaves like `Anonymous` carrying the last error message. Only
//! `Authenticated` holds a token, so `is_authenticated()` is exactly
//! "the session has a token".

use crate::models::User;
use crate::storage::TokenStore;

#[derive(Clone, Debug, PartialEq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated {
        token: String,
        /// Absent when the session was hydrated from a persisted token
        user: Option<User>,
    },
    Failed {
        error: String,
    },
}

impl Session {
    /// Start a login/register attempt, clearing any previous error
    pub fn begin(&self) -> Session {
        Session::Authenticating
    }

    pub fn complete(&self, token: String, user: Option<User>) -> Session {
        Session::Authenticated { token, user }
    }

    pub fn fail(&self, error: impl Into<String>) -> Session {
        Session::Failed {
            error: error.into(),
        }
    }

    pub fn reset(&self) -> Session {
        Session::Anonymous
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated { user, .. } => user.as_ref(),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Authenticating)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Session::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Session plus its persistence slot, constructed once in `main` and
/// handed to the app actor.
pub struct SessionStore {
    session: Session,
    store: TokenStore,
}

impl SessionStore {
    /// Build the startup session from the persisted token, if any.
    /// Identity fields are unknown until the next authenticated fetch.
    pub fn hydrate(store: TokenStore) -> Self {
        let session = match store.load() {
            Some(token) => Session::Authenticated { token, user: None },
            None => Session::Anonymous,
        };
        SessionStore { session, store }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn login_started(&mut self) {
        self.session = self.session.begin();
    }

    /// Persist the token, then transition to `Authenticated`. A storage
    /// failure leaves the session in `Failed` and reports the message.
    pub fn login_succeeded(&mut self, token: String, user: User) -> Result<(), String> {
        if let Err(e) = self.store.save(&token) {
            let message = format!("failed to persist auth token: {e}");
            self.session = self.session.fail(message.clone());
            return Err(message);
        }
        self.session = self.session.complete(token, Some(user));
        Ok(())
    }

    pub fn login_failed(&mut self, message: impl Into<String>) {
        self.session = self.session.fail(message);
    }

    /// Clear the persisted token and drop to `Anonymous`. Synchronous,
    /// no network call, always succeeds.
    pub fn logout(&mut self) {
        let _ = self.store.clear();
        self.session = self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn user() -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> TokenStore {
        TokenStore::with_dir(dir.path().to_path_buf())
    }

    #[test]
    fn begin_clears_previous_error() {
        let failed = Session::Anonymous.fail("bad credentials");
        assert_eq!(failed.error(), Some("bad credentials"));
        let next = failed.begin();
        assert_eq!(next, Session::Authenticating);
        assert_eq!(next.error(), None);
    }

    #[test]
    fn authenticated_iff_token_present() {
        let anon = Session::Anonymous;
        assert!(!anon.is_authenticated());
        assert_eq!(anon.token(), None);

        let auth = anon.begin().complete("tok".to_string(), Some(user()));
        assert!(auth.is_authenticated());
        assert_eq!(auth.token(), Some("tok"));
        assert_eq!(auth.user().map(|u| u.username.as_str()), Some("alice"));

        let out = auth.reset();
        assert!(!out.is_authenticated());
    }

    #[test]
    fn failure_is_unauthenticated_with_error() {
        let failed = Session::Authenticating.fail("duplicate username");
        assert!(!failed.is_authenticated());
        assert!(!failed.is_loading());
        assert_eq!(failed.error(), Some("duplicate username"));
    }

    #[test]
    fn hydrate_from_persisted_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save("persisted").unwrap();

        let session = SessionStore::hydrate(store);
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("persisted"));
        assert_eq!(session.user(), None);
    }

    #[test]
    fn hydrate_without_token_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionStore::hydrate(store_in(&dir));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn login_success_persists_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionStore::hydrate(store_in(&dir));

        session.login_started();
        assert!(session.session().is_loading());
        session
            .login_succeeded("fresh".to_string(), user())
            .unwrap();
        assert!(session.is_authenticated());
        assert_eq!(store_in(&dir).load(), Some("fresh".to_string()));
    }

    #[test]
    fn login_failure_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionStore::hydrate(store_in(&dir));

        session.login_started();
        session.login_failed("username already exists");
        assert!(!session.is_authenticated());
        assert_eq!(session.session().error(), Some("username already exists"));
        assert_eq!(store_in(&dir).load(), None);
    }

    #[test]
    fn storage_failure_surfaces_as_session_error() {
        // A file where the config directory should be makes save() fail
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "occupied").unwrap();

        let mut session = SessionStore::hydrate(TokenStore::with_dir(PathBuf::from(&blocked)));
        session.login_started();
        let err = session
            .login_succeeded("tok".to_string(), user())
            .unwrap_err();
        assert!(err.contains("persist"));
        assert!(!session.is_authenticated());
        assert!(session.session().error().is_some());
    }

    #[test]
    fn logout_clears_token_and_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionStore::hydrate(store_in(&dir));
        session.login_started();
        session.login_succeeded("tok".to_string(), user()).unwrap();

        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.session(), &Session::Anonymous);
        assert_eq!(store_in(&dir).load(), None);
    }
}
