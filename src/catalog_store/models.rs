use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub details: String,
    pub category: String,
    pub available: bool,
    pub price: f64,
}

/// Course fields minus the id, as accepted by create and update.
/// `available` defaults to true when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseDraft {
    pub title: String,
    pub details: String,
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
    pub price: f64,
}

fn default_available() -> bool {
    true
}

impl CourseDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.details.trim().is_empty() {
            return Err("details must not be empty".to_string());
        }
        if self.category.trim().is_empty() {
            return Err("category must not be empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("price must be a non-negative number".to_string());
        }
        Ok(())
    }

    pub fn into_course(self, id: String) -> Course {
        Course {
            id,
            title: self.title,
            details: self.details,
            category: self.category,
            available: self.available,
            price: self.price,
        }
    }
}
