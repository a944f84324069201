use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tower_http::services::ServeDir;
use tracing::info;

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::auth_routes::make_auth_routes;
use super::cart_routes::make_cart_routes;
use super::course_routes::make_course_routes;
use super::metrics::{init_metrics, metrics_handler, set_catalog_courses};
use super::session::Session;
use super::state::ServerState;
use super::{log_requests, ServerConfig};
use crate::cart::CartManager;
use crate::catalog_store::CourseStore;
use crate::user::{InMemorySessionStore, SessionRegistry, UserManager};
use crate::user::FullUserStore;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
    pub session_token: Option<String>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(session: Option<Session>, State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
        session_token: session.map(|s| s.token),
    };
    Json(stats)
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        course_store: Arc<dyn CourseStore>,
        user_store: Arc<dyn FullUserStore>,
    ) -> ServerState {
        let sessions = Arc::new(SessionRegistry::new(
            Box::new(InMemorySessionStore::default()),
            config.session_ttl,
        ));
        let user_manager = Arc::new(UserManager::new(user_store.clone(), sessions));
        let cart_manager = Arc::new(CartManager::new(course_store.clone(), user_store));
        ServerState {
            config,
            start_time: Instant::now(),
            course_store,
            user_manager,
            cart_manager,
            hash: option_env!("BUILD_HASH").unwrap_or("dev").to_string(),
        }
    }
}

pub fn make_app(state: ServerState) -> Router {
    init_metrics();
    set_catalog_courses(state.course_store.count());

    let home_router: Router = match &state.config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .nest("/api/auth", make_auth_routes(state.clone()))
        .nest("/api/courses", make_course_routes(state.clone()))
        .nest("/api/cart", make_cart_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(state: ServerState) -> Result<()> {
    let port = state.config.port;
    let app = make_app(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Listening on port {port}");
    Ok(axum::serve(listener, app).await?)
}

/// Serves /metrics on its own port so it is never exposed with the API.
pub async fn run_metrics_server(port: u16) -> Result<()> {
    let app = Router::new().route("/metrics", get(metrics_handler));
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Metrics listening on port {port}");
    Ok(axum::serve(listener, app).await?)
}
