mod auth_routes;
mod cart_routes;
mod config;
mod course_routes;
mod error;
mod http_layers;
mod json;
pub mod metrics;
mod server;
mod session;
mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use http_layers::{log_requests, RequestsLoggingLevel};
pub use server::{make_app, run_metrics_server, run_server};
pub use session::Session;
pub use state::ServerState;
