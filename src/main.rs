use anyhow::{Context, Result};
use clap::Parser;
use course_shop_server::catalog_store::SqliteCourseStore;
use course_shop_server::server::{
    self, run_metrics_server, run_server, RequestsLoggingLevel, ServerConfig, ServerState,
};
use course_shop_server::user::SqliteUserStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite course catalog database file.
    #[clap(value_parser = parse_path)]
    pub catalog_db: PathBuf,

    /// Path to the SQLite database file for users, credentials and carts.
    #[clap(value_parser = parse_path)]
    pub users_db: PathBuf,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Session lifetime in days.
    #[clap(long, default_value_t = 7)]
    pub session_ttl_days: u64,

    /// Interval in hours between expired-session pruning runs.
    #[clap(long, default_value_t = 1)]
    pub prune_interval_hours: u64,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!("Opening course catalog database at {:?}...", cli_args.catalog_db);
    let course_store = Arc::new(SqliteCourseStore::new(&cli_args.catalog_db)?);

    info!("Opening users database at {:?}...", cli_args.users_db);
    let user_store = Arc::new(SqliteUserStore::new(&cli_args.users_db)?);

    let config = ServerConfig {
        requests_logging_level: cli_args.logging_level,
        port: cli_args.port,
        metrics_port: Some(cli_args.metrics_port),
        session_ttl: Duration::from_secs(cli_args.session_ttl_days * 24 * 60 * 60),
        frontend_dir_path: cli_args.frontend_dir_path,
    };
    let state = ServerState::new(config, course_store, user_store);

    // Expired sessions are rejected on resolve anyway; the background task
    // only keeps the registry and the gauge from growing unbounded.
    let pruning_user_manager = state.user_manager.clone();
    let prune_interval = Duration::from_secs(cli_args.prune_interval_hours * 60 * 60);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(prune_interval);

        // Skip the first immediate tick, wait for the first interval
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let sessions = pruning_user_manager.sessions();
            match sessions.prune_expired() {
                Ok(count) => {
                    if count > 0 {
                        info!("Pruned {} expired sessions", count);
                    }
                    if let Ok(active) = sessions.active_count() {
                        server::metrics::set_active_sessions(active);
                    }
                }
                Err(e) => {
                    error!("Failed to prune expired sessions: {}", e);
                }
            }
        }
    });

    let metrics_port = cli_args.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = run_metrics_server(metrics_port).await {
            error!("Metrics server failed: {}", e);
        }
    });

    info!("Ready to serve at port {}!", cli_args.port);
    info!("Metrics available at port {}!", metrics_port);
    run_server(state).await
}
