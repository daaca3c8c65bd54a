//! Authenticated-user context.
//!
//! [`AuthContext`] is created once per run and handed to every flow. Only
//! [`AuthContext::login`] and [`AuthContext::logout`] write to it.
//! [`SessionStore`] keeps it on disk between runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::model::structs::{AuthResponse, Role, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Credentials {
    user: User,
    token: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    current: Option<Credentials>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, auth: AuthResponse) -> &User {
        let credentials = self.current.insert(Credentials {
            user: auth.user,
            token: auth.token,
        });
        &credentials.user
    }

    pub fn logout(&mut self) {
        self.current = None;
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref().map(|c| &c.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn require_user(&self) -> Result<&User> {
        self.current_user()
            .ok_or_else(|| ErrorKind::AuthRequired.into())
    }

    /// The current user, provided they hold `role`.
    pub fn require_role(&self, role: Role) -> Result<&User> {
        let user = self.require_user()?;
        if user.role != role {
            return Err(ErrorKind::Forbidden(role.as_str()).into());
        }
        Ok(user)
    }
}

/// JSON file holding the logged-in user and token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restores the context; a missing file yields a logged-out context.
    pub fn load(&self) -> Result<AuthContext> {
        if !self.path.exists() {
            return Ok(AuthContext::new());
        }
        let bytes = std::fs::read(&self.path)?;
        let credentials: Credentials = serde_json::from_slice(&bytes)?;
        Ok(AuthContext {
            current: Some(credentials),
        })
    }

    pub fn save(&self, ctx: &AuthContext) -> Result<()> {
        match &ctx.current {
            Some(credentials) => {
                let json = serde_json::to_vec_pretty(credentials)?;
                std::fs::write(&self.path, json)?;
                Ok(())
            }
            None => self.clear(),
        }
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Forgets the saved login when `err` says the server rejected the token.
    /// Returns whether the session was dropped.
    pub fn invalidate_on(&self, err: &Error) -> Result<bool> {
        if !err.is_auth_expired() {
            return Ok(false);
        }
        tracing::info!(path = %self.path.display(), "session expired, clearing saved login");
        self.clear()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(role: Role) -> AuthResponse {
        AuthResponse {
            message: "Login successful".into(),
            user: User {
                id: 2,
                name: "Dana".into(),
                email: "dana@example.edu".into(),
                role,
                created_at: None,
                updated_at: None,
            },
            token: "tok-123".into(),
        }
    }

    #[test]
    fn login_then_logout() {
        let mut ctx = AuthContext::new();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.login(auth(Role::Student)).id, 2);
        assert_eq!(ctx.token(), Some("tok-123"));
        ctx.logout();
        assert!(ctx.current_user().is_none());
        assert!(ctx.token().is_none());
    }

    #[test]
    fn role_gate() {
        let mut ctx = AuthContext::new();
        assert!(matches!(
            ctx.require_role(Role::Admin).unwrap_err().kind(),
            ErrorKind::AuthRequired
        ));
        ctx.login(auth(Role::Student));
        assert!(ctx.require_role(Role::Student).is_ok());
        assert!(matches!(
            ctx.require_role(Role::Admin).unwrap_err().kind(),
            ErrorKind::Forbidden("admin")
        ));
    }

    #[test]
    fn store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert!(!store.load().unwrap().is_authenticated());

        let mut ctx = AuthContext::new();
        ctx.login(auth(Role::Admin));
        store.save(&ctx).unwrap();

        let restored = store.load().unwrap();
        assert_eq!(restored.current_user().map(|u| u.role), Some(Role::Admin));
        assert_eq!(restored.token(), Some("tok-123"));

        store.clear().unwrap();
        assert!(!store.path().exists());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn only_expired_sessions_are_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let mut ctx = AuthContext::new();
        ctx.login(auth(Role::Student));
        store.save(&ctx).unwrap();

        let validation: Error = ErrorKind::Validation("nope".into()).into();
        assert!(!store.invalidate_on(&validation).unwrap());
        assert!(store.path().exists());

        let expired: Error = ErrorKind::AuthExpired.into();
        assert!(store.invalidate_on(&expired).unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn saving_logged_out_context_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let mut ctx = AuthContext::new();
        ctx.login(auth(Role::Student));
        store.save(&ctx).unwrap();
        ctx.logout();
        store.save(&ctx).unwrap();
        assert!(!store.path().exists());
    }
}
