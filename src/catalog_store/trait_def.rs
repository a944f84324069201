use super::models::{Course, CourseDraft};
use anyhow::Result;

/// Storage backend for the course catalog.
pub trait CourseStore: Send + Sync {
    /// Returns all courses, optionally filtered by exact category match.
    fn list(&self, category: Option<&str>) -> Result<Vec<Course>>;

    /// Returns a course by id. Ok(None) if the id does not resolve.
    fn get(&self, id: &str) -> Result<Option<Course>>;

    /// Inserts a new course and returns it with its assigned id.
    fn create(&self, draft: CourseDraft) -> Result<Course>;

    /// Replaces the fields of an existing course.
    /// Returns Ok(None) if the id does not resolve.
    fn update(&self, id: &str, draft: CourseDraft) -> Result<Option<Course>>;

    /// Deletes a course by id. Returns false if the id did not resolve.
    fn delete(&self, id: &str) -> Result<bool>;

    /// Returns the distinct categories across all courses, sorted.
    fn categories(&self) -> Result<Vec<String>>;

    /// Number of courses in the catalog (for metrics).
    fn count(&self) -> usize;
}
