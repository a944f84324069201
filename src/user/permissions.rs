use serde::{Deserialize, Serialize};

use super::user_models::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    BrowseCatalog,
    OwnCart,
    ManageCatalog,
}

const AGENT_PERMISSIONS: &[Permission] = &[
    Permission::BrowseCatalog,
    Permission::OwnCart,
    Permission::ManageCatalog,
];
const USER_PERMISSIONS: &[Permission] = &[Permission::BrowseCatalog, Permission::OwnCart];

pub fn role_permissions(role: UserRole) -> &'static [Permission] {
    match role {
        UserRole::Agent => AGENT_PERMISSIONS,
        UserRole::User => USER_PERMISSIONS,
    }
}
