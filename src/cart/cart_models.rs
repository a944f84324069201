use crate::catalog_store::Course;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "courseId")]
    pub course_id: String,
    pub quantity: i64,
}

/// A cart item joined with its course's current fields at read time.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedCartItem {
    #[serde(rename = "courseId")]
    pub course_id: String,
    pub quantity: i64,
    pub course: Course,
}
