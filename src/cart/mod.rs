mod cart_manager;
mod cart_models;
mod cart_store;

pub use cart_manager::CartManager;
pub use cart_models::{CartItem, EnrichedCartItem};
pub use cart_store::CartStore;
