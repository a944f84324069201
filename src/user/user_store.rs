use anyhow::Result;

use super::auth::PasswordHasher;
use super::user_models::{User, UserRole};
use crate::cart::CartStore;

#[derive(Debug, Clone)]
pub struct PasswordCredentials {
    pub user_id: i64,
    pub b64_salt: String,
    pub hash: String,
    pub hasher: PasswordHasher,
    pub created: i64,
    pub last_used: Option<i64>,
}

/// Users as account records. Usernames and emails are unique.
pub trait UserStore: Send + Sync {
    /// Creates a user and returns its id. Fails on a duplicate username or
    /// email.
    fn create_user(
        &self,
        username: &str,
        role: UserRole,
        email: Option<&str>,
        picture: Option<&str>,
    ) -> Result<i64>;

    fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Password material, kept apart from the account record.
pub trait UserCredentialsStore: Send + Sync {
    fn set_password_credentials(
        &self,
        user_id: i64,
        b64_salt: &str,
        hash: &str,
        hasher: PasswordHasher,
    ) -> Result<()>;

    fn get_password_credentials(&self, user_id: i64) -> Result<Option<PasswordCredentials>>;

    fn touch_password_credentials(&self, user_id: i64) -> Result<()>;
}

/// Everything the server needs from user persistence, in one object.
pub trait FullUserStore: UserStore + UserCredentialsStore + CartStore {}

impl<T: UserStore + UserCredentialsStore + CartStore> FullUserStore for T {}
