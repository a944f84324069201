use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use super::auth::PasswordHasher;
use super::google::GoogleProfile;
use super::session_registry::SessionRegistry;
use super::user_models::{User, UserRole};
use super::user_store::FullUserStore;

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    UsernameTaken,
}

pub struct LoginSession {
    pub user: User,
    pub token: String,
}

/// Account lifecycle and session issuance, over injected stores.
pub struct UserManager {
    store: Arc<dyn FullUserStore>,
    sessions: Arc<SessionRegistry>,
    hasher: PasswordHasher,
}

impl UserManager {
    pub fn new(store: Arc<dyn FullUserStore>, sessions: Arc<SessionRegistry>) -> Self {
        Self {
            store,
            sessions,
            hasher: PasswordHasher::Argon2,
        }
    }

    pub fn register(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> Result<RegisterOutcome> {
        if self.store.get_user_by_username(username)?.is_some() {
            return Ok(RegisterOutcome::UsernameTaken);
        }
        let user_id = self.store.create_user(username, role, None, None)?;
        let salt = self.hasher.generate_b64_salt();
        let hash = self.hasher.hash(password, &salt)?;
        self.store
            .set_password_credentials(user_id, &salt, &hash, self.hasher)?;
        info!("Registered user <{username}> with role {}", role.as_str());
        Ok(RegisterOutcome::Created)
    }

    /// Password login. Absent users and hash mismatches are indistinguishable
    /// to the caller.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<LoginSession>> {
        let Some(user) = self.store.get_user_by_username(username)? else {
            return Ok(None);
        };
        let Some(credentials) = self.store.get_password_credentials(user.id)? else {
            // Social-login account, no password to check.
            return Ok(None);
        };
        if !credentials.hasher.verify(password, &credentials.hash) {
            warn!("Failed login attempt for user <{username}>");
            return Ok(None);
        }
        self.store.touch_password_credentials(user.id)?;
        let token = self.sessions.create(user.id)?;
        Ok(Some(LoginSession { user, token }))
    }

    /// Login or first-sight signup with a Google profile. Identity is keyed
    /// by lowercased email; new accounts always get the `user` role.
    pub fn google_login(&self, profile: &GoogleProfile) -> Result<LoginSession> {
        let email = profile.email.trim().to_lowercase();
        let user = match self.store.get_user_by_email(&email)? {
            Some(user) => user,
            None => {
                let mut username = profile.display_name();
                if self.store.get_user_by_username(&username)?.is_some() {
                    username = email.clone();
                }
                let user_id = self.store.create_user(
                    &username,
                    UserRole::User,
                    Some(&email),
                    profile.picture.as_deref(),
                )?;
                info!("Created account <{username}> from Google profile");
                self.store
                    .get_user(user_id)?
                    .ok_or_else(|| anyhow::anyhow!("User {user_id} vanished after insert"))?
            }
        };
        let token = self.sessions.create(user.id)?;
        Ok(LoginSession { user, token })
    }

    /// Idempotent, unknown tokens are fine.
    pub fn logout(&self, token: &str) -> Result<bool> {
        self.sessions.destroy(token)
    }

    pub fn verify(&self, token: &str) -> Result<Option<User>> {
        let Some(user_id) = self.sessions.resolve(token)? else {
            return Ok(None);
        };
        self.store.get_user(user_id)
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}
