//! SQLite-backed user, credentials and cart persistence.

use super::auth::PasswordHasher;
use super::user_models::{User, UserRole};
use super::user_store::{PasswordCredentials, UserCredentialsStore, UserStore};
use crate::cart::{CartItem, CartStore};
use crate::sqlite_column;
use crate::sqlite_persistence::{
    migrate_if_needed, Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
    DEFAULT_TIMESTAMP,
};
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("username", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("role", &SqlType::Text, non_null = true),
        sqlite_column!("email", &SqlType::Text, is_unique = true),
        sqlite_column!("picture", &SqlType::Text),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_users_username", "username")],
    unique_constraints: &[],
};

const USER_ID_FK: ForeignKey = ForeignKey {
    foreign_table: "users",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const PASSWORD_CREDENTIALS_TABLE: Table = Table {
    name: "user_password_credentials",
    columns: &[
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            is_primary_key = true,
            foreign_key = Some(&USER_ID_FK)
        ),
        sqlite_column!("b64_salt", &SqlType::Text, non_null = true),
        sqlite_column!("hash", &SqlType::Text, non_null = true),
        sqlite_column!("hasher", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
        sqlite_column!("last_used", &SqlType::Integer),
    ],
    indices: &[],
    unique_constraints: &[],
};

const CART_ITEMS_TABLE: Table = Table {
    name: "cart_items",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "user_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&USER_ID_FK)
        ),
        sqlite_column!("course_id", &SqlType::Text, non_null = true),
        sqlite_column!("quantity", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_cart_items_user_id", "user_id")],
    unique_constraints: &[&["user_id", "course_id"]],
};

const USERS_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[USERS_TABLE, PASSWORD_CREDENTIALS_TABLE, CART_ITEMS_TABLE],
    migration: None,
}];

pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

fn user_from_row(row: &Row) -> rusqlite::Result<(i64, String, String, Option<String>, Option<String>)>
{
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn into_user(
    (id, username, role, email, picture): (i64, String, String, Option<String>, Option<String>),
) -> Result<User> {
    let role = UserRole::from_str(&role).ok_or_else(|| anyhow!("Unknown user role <{role}>"))?;
    Ok(User {
        id,
        username,
        role,
        email,
        picture,
    })
}

const USER_COLUMNS: &str = "id, username, role, email, picture";

impl SqliteUserStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let mut conn =
            Connection::open(db_path.as_ref()).context("Failed to open users database")?;
        migrate_if_needed(&mut conn, USERS_VERSIONED_SCHEMAS, "users")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute("PRAGMA foreign_keys = ON;", [])?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .unwrap_or(0);
        info!("Opened users database with {} users", count);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn get_user_by(&self, column: &str, value: &str) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"),
                params![value],
                user_from_row,
            )
            .optional()?;
        row.map(into_user).transpose()
    }
}

impl UserStore for SqliteUserStore {
    fn create_user(
        &self,
        username: &str,
        role: UserRole,
        email: Option<&str>,
        picture: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (username, role, email, picture) VALUES (?1, ?2, ?3, ?4)",
            params![username, role.as_str(), email, picture],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![user_id],
                user_from_row,
            )
            .optional()?;
        row.map(into_user).transpose()
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by("username", username)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by("email", email)
    }
}

impl UserCredentialsStore for SqliteUserStore {
    fn set_password_credentials(
        &self,
        user_id: i64,
        b64_salt: &str,
        hash: &str,
        hasher: PasswordHasher,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user_password_credentials (user_id, b64_salt, hash, hasher)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                 b64_salt = excluded.b64_salt,
                 hash = excluded.hash,
                 hasher = excluded.hasher",
            params![user_id, b64_salt, hash, hasher.to_string()],
        )?;
        Ok(())
    }

    fn get_password_credentials(&self, user_id: i64) -> Result<Option<PasswordCredentials>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT user_id, b64_salt, hash, hasher, created, last_used
                 FROM user_password_credentials WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, Option<i64>>(5)?,
                    ))
                },
            )
            .optional()?;
        row.map(|(user_id, b64_salt, hash, hasher, created, last_used)| {
            Ok(PasswordCredentials {
                user_id,
                b64_salt,
                hash,
                hasher: hasher.parse()?,
                created,
                last_used,
            })
        })
        .transpose()
    }

    fn touch_password_credentials(&self, user_id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE user_password_credentials
             SET last_used = cast(strftime('%s','now') as int)
             WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(())
    }
}

impl CartStore for SqliteUserStore {
    fn cart_items(&self, user_id: i64) -> Result<Vec<CartItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT course_id, quantity FROM cart_items WHERE user_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(CartItem {
                course_id: row.get(0)?,
                quantity: row.get(1)?,
            })
        })?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    fn cart_add_one(&self, user_id: i64, course_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        // Single statement, so two concurrent adds can never both read the
        // old quantity.
        conn.execute(
            "INSERT INTO cart_items (user_id, course_id, quantity) VALUES (?1, ?2, 1)
             ON CONFLICT(user_id, course_id) DO UPDATE SET quantity = quantity + 1",
            params![user_id, course_id],
        )?;
        Ok(())
    }

    fn cart_set_quantity(&self, user_id: i64, course_id: &str, quantity: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE cart_items SET quantity = ?3 WHERE user_id = ?1 AND course_id = ?2",
            params![user_id, course_id, quantity],
        )?;
        Ok(changed > 0)
    }

    fn cart_remove(&self, user_id: i64, course_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM cart_items WHERE user_id = ?1 AND course_id = ?2",
            params![user_id, course_id],
        )?;
        Ok(())
    }

    fn cart_clear(&self, user_id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM cart_items WHERE user_id = ?1", params![user_id])?;
        Ok(())
    }

    fn cart_count(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE user_id = ?1",
            params![user_id],
            |r| r.get(0),
        )?;
        Ok(count)
    }
}
