use std::time::Duration;

use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: Option<u16>,
    pub session_ttl: Duration,
    pub frontend_dir_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            metrics_port: None,
            session_ttl: Duration::from_secs(7 * 24 * 3600),
            frontend_dir_path: None,
        }
    }
}
