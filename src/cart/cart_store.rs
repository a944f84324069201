use super::cart_models::CartItem;
use anyhow::Result;

/// Storage backend for per-user carts. A cart is the set of a user's rows,
/// created lazily on first add; at most one row exists per (user, course).
pub trait CartStore: Send + Sync {
    /// Returns the user's cart items. An absent cart reads as empty.
    fn cart_items(&self, user_id: i64) -> Result<Vec<CartItem>>;

    /// Increments the quantity of an item by one, inserting it at quantity 1
    /// if absent. The increment must be atomic with respect to concurrent
    /// adds for the same user.
    fn cart_add_one(&self, user_id: i64, course_id: &str) -> Result<()>;

    /// Sets the quantity of an existing item. Returns false if the item is
    /// absent. Callers must not pass a quantity below one.
    fn cart_set_quantity(&self, user_id: i64, course_id: &str, quantity: i64) -> Result<bool>;

    /// Removes an item. Removing an absent item is a no-op.
    fn cart_remove(&self, user_id: i64, course_id: &str) -> Result<()>;

    /// Removes every item from the user's cart. Idempotent.
    fn cart_clear(&self, user_id: i64) -> Result<()>;

    /// Sum of quantities across the user's items.
    fn cart_count(&self, user_id: i64) -> Result<i64>;
}
