use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::logging::DEFAULT_LOG_FILTER;

const DEFAULT_MAX_ACTIVE_SESSIONS: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Directory for the daily rolling log file; file logging is off when unset
    pub log_dir: Option<PathBuf>,
    /// Alternative lesson catalogue; the built-in one is used when unset
    pub content_path: Option<PathBuf>,
    pub max_active_sessions: usize,
    pub healthcheck_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let log_dir = file_log_dir(
            std::env::var("ENABLE_FILE_LOGS").ok().as_deref(),
            std::env::var("LOG_DIR").ok().as_deref(),
        );

        let content_path = std::env::var("LESSON_CONTENT_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let max_active_sessions = std::env::var("MAX_ACTIVE_SESSIONS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_MAX_ACTIVE_SESSIONS);

        let healthcheck_endpoint = normalize_healthcheck_endpoint(
            std::env::var("HEALTHCHECK_ENDPOINT")
                .ok()
                .as_deref()
                .unwrap_or("/health"),
        );

        Self {
            host,
            port,
            log_level,
            log_dir,
            content_path,
            max_active_sessions,
            healthcheck_endpoint,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            log_level: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
            content_path: None,
            max_active_sessions: DEFAULT_MAX_ACTIVE_SESSIONS,
            healthcheck_endpoint: "/health".to_string(),
        }
    }
}

fn file_log_dir(enabled: Option<&str>, dir: Option<&str>) -> Option<PathBuf> {
    let enabled = matches!(enabled.map(str::trim), Some("true") | Some("1"));
    if !enabled {
        return None;
    }
    let dir = dir.map(str::trim).filter(|d| !d.is_empty()).unwrap_or("./logs");
    Some(PathBuf::from(dir))
}

fn normalize_healthcheck_endpoint(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "/health".to_string();
    }

    let with_slash = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };

    if with_slash != "/" {
        with_slash.trim_end_matches('/').to_string()
    } else {
        "/".to_string()
    }
}
