//! Test server lifecycle management
//!
//! Each test gets an isolated server on a random port with its own
//! temporary databases, seeded with the standard users and courses.

use super::constants::*;
use super::fixtures::{seed_courses, seed_users};
use course_shop_server::catalog_store::{Course, CourseStore, SqliteCourseStore};
use course_shop_server::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use course_shop_server::user::{FullUserStore, SqliteUserStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated databases
///
/// When dropped, the server shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Course store for direct catalog access in tests
    pub course_store: Arc<dyn CourseStore>,

    /// User store for direct database access in tests
    pub user_store: Arc<dyn FullUserStore>,

    /// The courses every server starts with
    pub seeded_courses: Vec<Course>,

    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port and waits for it to be
    /// ready.
    pub async fn spawn() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let course_store = Arc::new(
            SqliteCourseStore::new(temp_dir.path().join("catalog.db"))
                .expect("Failed to open course store"),
        );
        let seeded_courses = seed_courses(&course_store).expect("Failed to seed courses");

        let sqlite_user_store = SqliteUserStore::new(temp_dir.path().join("users.db"))
            .expect("Failed to open user store");
        seed_users(&sqlite_user_store).expect("Failed to seed users");
        let user_store: Arc<dyn FullUserStore> = Arc::new(sqlite_user_store);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            metrics_port: None,
            session_ttl: Duration::from_secs(3600),
            frontend_dir_path: None,
        };
        let app = make_app(ServerState::new(
            config,
            course_store.clone(),
            user_store.clone(),
        ));

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            course_store,
            user_store,
            seeded_courses,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to answer on `/`.
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
