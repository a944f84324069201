pub mod cart;
pub mod catalog_store;
pub mod server;
pub mod sqlite_persistence;
pub mod user;
