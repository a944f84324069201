use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;
use crate::cart::CartManager;
use crate::catalog_store::CourseStore;
use crate::user::UserManager;

pub type GuardedCourseStore = Arc<dyn CourseStore>;
pub type GuardedUserManager = Arc<UserManager>;
pub type GuardedCartManager = Arc<CartManager>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub course_store: GuardedCourseStore,
    pub user_manager: GuardedUserManager,
    pub cart_manager: GuardedCartManager,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedCourseStore {
    fn from_ref(input: &ServerState) -> Self {
        input.course_store.clone()
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedCartManager {
    fn from_ref(input: &ServerState) -> Self {
        input.cart_manager.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
