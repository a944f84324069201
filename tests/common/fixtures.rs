//! Test data seeding
//!
//! Creates the users and courses every test server starts with.

use super::constants::*;
use anyhow::Result;
use course_shop_server::catalog_store::{Course, CourseDraft, CourseStore, SqliteCourseStore};
use course_shop_server::user::auth::PasswordHasher;
use course_shop_server::user::{SqliteUserStore, UserCredentialsStore, UserRole, UserStore};

fn create_user_with_password(
    store: &SqliteUserStore,
    username: &str,
    password: &str,
    role: UserRole,
) -> Result<i64> {
    let user_id = store.create_user(username, role, None, None)?;
    let hasher = PasswordHasher::Argon2;
    let salt = hasher.generate_b64_salt();
    let hash = hasher.hash(password, &salt)?;
    store.set_password_credentials(user_id, &salt, &hash, hasher)?;
    Ok(user_id)
}

/// Seeds the standard test users: one regular user and one agent.
pub fn seed_users(store: &SqliteUserStore) -> Result<()> {
    create_user_with_password(store, TEST_USER, TEST_PASS, UserRole::User)?;
    create_user_with_password(store, AGENT_USER, AGENT_PASS, UserRole::Agent)?;
    Ok(())
}

/// Seeds three courses and returns them, ids included.
pub fn seed_courses(store: &SqliteCourseStore) -> Result<Vec<Course>> {
    let drafts = [
        (COURSE_1_TITLE, CATEGORY_PROGRAMMING, 49.9),
        (COURSE_2_TITLE, CATEGORY_PROGRAMMING, 79.0),
        (COURSE_3_TITLE, CATEGORY_ART, 25.0),
    ];
    let mut courses = Vec::new();
    for (title, category, price) in drafts {
        courses.push(store.create(CourseDraft {
            title: title.to_string(),
            details: format!("All about {}", title),
            category: category.to_string(),
            available: true,
            price,
        })?);
    }
    Ok(courses)
}
