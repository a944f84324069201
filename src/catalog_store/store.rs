//! SQLite-backed course store.

use super::models::{Course, CourseDraft};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CourseStore;
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

pub struct SqliteCourseStore {
    conn: Mutex<Connection>,
}

fn course_from_row(row: &Row) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        details: row.get(2)?,
        category: row.get(3)?,
        available: row.get::<_, i64>(4)? != 0,
        price: row.get(5)?,
    })
}

const COURSE_COLUMNS: &str = "id, title, details, category, available, price";

impl SqliteCourseStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let mut conn =
            Connection::open(db_path.as_ref()).context("Failed to open catalog database")?;
        migrate_if_needed(&mut conn, CATALOG_VERSIONED_SCHEMAS, "catalog")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM courses", [], |r| r.get(0))
            .unwrap_or(0);
        info!("Opened course catalog with {} courses", count);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CourseStore for SqliteCourseStore {
    fn list(&self, category: Option<&str>) -> Result<Vec<Course>> {
        let conn = self.conn.lock().unwrap();
        let mut courses = Vec::new();
        match category {
            Some(category) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM courses WHERE category = ?1 ORDER BY rowid",
                    COURSE_COLUMNS
                ))?;
                let rows = stmt.query_map(params![category], course_from_row)?;
                for row in rows {
                    courses.push(row?);
                }
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM courses ORDER BY rowid",
                    COURSE_COLUMNS
                ))?;
                let rows = stmt.query_map([], course_from_row)?;
                for row in rows {
                    courses.push(row?);
                }
            }
        }
        Ok(courses)
    }

    fn get(&self, id: &str) -> Result<Option<Course>> {
        let conn = self.conn.lock().unwrap();
        let course = conn
            .query_row(
                &format!("SELECT {} FROM courses WHERE id = ?1", COURSE_COLUMNS),
                params![id],
                course_from_row,
            )
            .optional()?;
        Ok(course)
    }

    fn create(&self, draft: CourseDraft) -> Result<Course> {
        let course = draft.into_course(Uuid::new_v4().to_string());
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO courses (id, title, details, category, available, price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                course.id,
                course.title,
                course.details,
                course.category,
                course.available as i64,
                course.price
            ],
        )?;
        Ok(course)
    }

    fn update(&self, id: &str, draft: CourseDraft) -> Result<Option<Course>> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE courses SET title = ?2, details = ?3, category = ?4, available = ?5, price = ?6
             WHERE id = ?1",
            params![
                id,
                draft.title,
                draft.details,
                draft.category,
                draft.available as i64,
                draft.price
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(draft.into_course(id.to_string())))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM courses WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn categories(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT DISTINCT category FROM courses ORDER BY category")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }

    fn count(&self) -> usize {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM courses", [], |r| r.get::<_, i64>(0))
            .unwrap_or(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, SqliteCourseStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteCourseStore::new(dir.path().join("catalog.db")).unwrap();
        (dir, store)
    }

    fn draft(title: &str, category: &str, price: f64) -> CourseDraft {
        CourseDraft {
            title: title.to_string(),
            details: format!("Details of {}", title),
            category: category.to_string(),
            available: true,
            price,
        }
    }

    #[test]
    fn created_course_is_returned_by_get() {
        let (_dir, store) = open_store();
        let created = store.create(draft("Rust 101", "Programming", 10.0)).unwrap();

        let fetched = store.get(&created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Rust 101");
        assert_eq!(fetched.price, 10.0);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let (_dir, store) = open_store();
        assert!(store.get("no-such-id").unwrap().is_none());
    }

    #[test]
    fn list_filters_by_category() {
        let (_dir, store) = open_store();
        store.create(draft("Rust 101", "Programming", 10.0)).unwrap();
        store.create(draft("Go 101", "Programming", 12.0)).unwrap();
        store.create(draft("Watercolors", "Art", 8.0)).unwrap();

        assert_eq!(store.list(None).unwrap().len(), 3);
        let programming = store.list(Some("Programming")).unwrap();
        assert_eq!(programming.len(), 2);
        assert!(programming.iter().all(|c| c.category == "Programming"));
        assert!(store.list(Some("History")).unwrap().is_empty());
    }

    #[test]
    fn update_replaces_fields() {
        let (_dir, store) = open_store();
        let created = store.create(draft("Rust 101", "Programming", 10.0)).unwrap();

        let mut new_draft = draft("Rust 201", "Programming", 20.0);
        new_draft.available = false;
        let updated = store.update(&created.id, new_draft).unwrap().unwrap();

        assert_eq!(updated.title, "Rust 201");
        let fetched = store.get(&created.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Rust 201");
        assert_eq!(fetched.price, 20.0);
        assert!(!fetched.available);
    }

    #[test]
    fn update_unknown_id_is_none() {
        let (_dir, store) = open_store();
        assert!(store
            .update("no-such-id", draft("X", "Y", 1.0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn delete_then_get_is_none_and_second_delete_fails() {
        let (_dir, store) = open_store();
        let created = store.create(draft("Rust 101", "Programming", 10.0)).unwrap();

        assert!(store.delete(&created.id).unwrap());
        assert!(store.get(&created.id).unwrap().is_none());
        assert!(!store.delete(&created.id).unwrap());
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let (_dir, store) = open_store();
        store.create(draft("Rust 101", "Programming", 10.0)).unwrap();
        store.create(draft("Go 101", "Programming", 12.0)).unwrap();
        store.create(draft("Watercolors", "Art", 8.0)).unwrap();

        assert_eq!(
            store.categories().unwrap(),
            vec!["Art".to_string(), "Programming".to_string()]
        );
    }

    #[test]
    fn count_tracks_inserts_and_deletes() {
        let (_dir, store) = open_store();
        assert_eq!(store.count(), 0);
        let created = store.create(draft("Rust 101", "Programming", 10.0)).unwrap();
        assert_eq!(store.count(), 1);
        store.delete(&created.id).unwrap();
        assert_eq!(store.count(), 0);
    }
}
