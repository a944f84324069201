use super::cart_models::EnrichedCartItem;
use super::cart_store::CartStore;
use crate::catalog_store::CourseStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub struct CartManager {
    course_store: Arc<dyn CourseStore>,
    cart_store: Arc<dyn CartStore>,
}

impl CartManager {
    pub fn new(course_store: Arc<dyn CourseStore>, cart_store: Arc<dyn CartStore>) -> Self {
        Self {
            course_store,
            cart_store,
        }
    }

    /// Returns the user's cart joined with course details. An item whose
    /// course no longer resolves is dropped from the result, not an error.
    pub fn enriched_items(&self, user_id: i64) -> Result<Vec<EnrichedCartItem>> {
        let items = self.cart_store.cart_items(user_id)?;
        let mut enriched = Vec::with_capacity(items.len());
        for item in items {
            match self.course_store.get(&item.course_id)? {
                Some(course) => enriched.push(EnrichedCartItem {
                    course_id: item.course_id,
                    quantity: item.quantity,
                    course,
                }),
                None => {
                    debug!(
                        "Dropping cart item {} for user {}: course no longer exists",
                        item.course_id, user_id
                    );
                }
            }
        }
        Ok(enriched)
    }

    /// Adds one unit of a course to the user's cart.
    /// Returns false if the course id does not resolve.
    pub fn add(&self, user_id: i64, course_id: &str) -> Result<bool> {
        if self.course_store.get(course_id)?.is_none() {
            return Ok(false);
        }
        self.cart_store.cart_add_one(user_id, course_id)?;
        Ok(true)
    }

    /// Sets the quantity of an item; a quantity of zero or less removes it.
    /// Returns false if the item is not in the cart.
    pub fn update_quantity(&self, user_id: i64, course_id: &str, quantity: i64) -> Result<bool> {
        if quantity <= 0 {
            let present = self
                .cart_store
                .cart_items(user_id)?
                .iter()
                .any(|item| item.course_id == course_id);
            if !present {
                return Ok(false);
            }
            self.cart_store.cart_remove(user_id, course_id)?;
            return Ok(true);
        }
        self.cart_store.cart_set_quantity(user_id, course_id, quantity)
    }

    pub fn remove(&self, user_id: i64, course_id: &str) -> Result<()> {
        self.cart_store.cart_remove(user_id, course_id)
    }

    pub fn clear(&self, user_id: i64) -> Result<()> {
        self.cart_store.cart_clear(user_id)
    }

    pub fn count(&self, user_id: i64) -> Result<i64> {
        self.cart_store.cart_count(user_id)
    }
}
