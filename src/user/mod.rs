pub mod auth;
mod google;
mod permissions;
mod session_registry;
mod sqlite_user_store;
mod user_manager;
mod user_models;
mod user_store;

pub use google::GoogleProfile;
pub use permissions::Permission;
pub use session_registry::{InMemorySessionStore, SessionRegistry, SessionStore};
pub use sqlite_user_store::SqliteUserStore;
pub use user_manager::{LoginSession, RegisterOutcome, UserManager};
pub use user_models::{User, UserRole};
pub use user_store::{FullUserStore, PasswordCredentials, UserCredentialsStore, UserStore};
