use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Used when `RUST_LOG` is unset or cannot be parsed
pub const DEFAULT_LOG_FILTER: &str = "warn,nysh_backend=info,nysh_core=info,tower_http=info";

const LOG_FILE_PREFIX: &str = "nysh-backend.log";

/// Keeps the non-blocking file writer flushing until dropped
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let registry = tracing_subscriber::registry()
        .with(env_filter(&config.log_level))
        .with(fmt::layer().with_target(true));

    let Some(dir) = config.log_dir.as_deref() else {
        registry.init();
        return None;
    };

    match file_writer(dir) {
        Ok((writer, guard)) => {
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
                .init();
            tracing::info!(dir = %dir.display(), prefix = LOG_FILE_PREFIX, "file logging enabled");
            Some(FileLogGuard { _guard: guard })
        }
        Err(err) => {
            registry.init();
            tracing::warn!(dir = %dir.display(), error = %err, "file logging disabled");
            None
        }
    }
}

fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directives:?} ({err}), using {DEFAULT_LOG_FILTER}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

fn file_writer(dir: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_scopes_workspace_crates() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.contains("nysh_backend=info"));
        assert!(DEFAULT_LOG_FILTER.contains("nysh_core=info"));
    }

    #[test]
    fn test_file_writer_creates_missing_directory() {
        let dir = std::env::temp_dir().join(format!("nysh-logs-{}", uuid::Uuid::new_v4()));
        let (_writer, _guard) = file_writer(&dir).unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
