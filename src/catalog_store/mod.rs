mod models;
mod schema;
mod store;
mod trait_def;

pub use models::{Course, CourseDraft};
pub use store::SqliteCourseStore;
pub use trait_def::CourseStore;
