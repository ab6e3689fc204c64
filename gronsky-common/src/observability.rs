//! Shared observability helpers for the binary and integration tests.
//!
//! [`init_logging`] installs the global `tracing` subscriber once. A skill
//! invocation usually runs somewhere with a read-only filesystem, so the
//! rolling file sink is optional and stderr can be used on its own.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use chrono::Local;
use serde::Deserialize;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static LOG_TARGET: OnceLock<LogTarget> = OnceLock::new();

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Where [`init_logging`] ended up sending events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Daily rolling file; the path is today's file.
    File(PathBuf),
    /// No file sink, stderr only.
    Stderr,
}

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Logical name of the component (used for defaults and file names).
    pub app_name: &'static str,
    /// Write to a daily rolling file. When false only stderr is used.
    pub file_sink: bool,
    /// Optional explicit directory for log output. If `None`, we consult
    /// `GRONSKY_LOG_DIR` and finally fall back to `~/.local/share/<app_name>`.
    pub log_dir: Option<PathBuf>,
    /// Whether to duplicate events to `stderr` in addition to the file sink.
    pub emit_stderr: bool,
    /// Preferred log encoding.
    pub format: LogFormat,
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "gronsky",
            file_sink: false,
            log_dir: None,
            emit_stderr: true,
            format: LogFormat::Text,
            default_filter: "info".to_string(),
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Returns where events are written. Subsequent calls are no-ops and hand
/// back the target resolved by the first call.
pub fn init_logging(config: LogConfig) -> anyhow::Result<LogTarget> {
    if let Some(target) = LOG_TARGET.get() {
        return Ok(target.clone());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let mut layers: Vec<Box<dyn Layer<_> + Send + Sync>> = Vec::new();
    let target = if config.file_sink {
        let dir = resolve_log_dir(config.app_name, config.log_dir.as_deref());
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create log directory: {}", dir.display()))?;

        let file_name = format!("{}.log", config.app_name);
        let today = Local::now().format("%Y-%m-%d").to_string();
        let path = dir.join(format!("{file_name}.{today}"));

        let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, &file_name));
        let _ = LOG_GUARD.set(guard);
        layers.push(match config.format {
            LogFormat::Text => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        });
        LogTarget::File(path)
    } else {
        LogTarget::Stderr
    };

    if config.emit_stderr || !config.file_sink {
        layers.push(match config.format {
            LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
            LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        });
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = LOG_TARGET.set(target.clone());
    Ok(target)
}

fn resolve_log_dir(app_name: &str, explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return expand_home(dir);
    }

    if let Ok(env_dir) = std::env::var("GRONSKY_LOG_DIR") {
        return expand_home(Path::new(&env_dir));
    }

    default_data_dir(app_name)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

fn default_data_dir(app_name: &str) -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".local").join("share").join(app_name),
        Err(_) => std::env::temp_dir().join(app_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = resolve_log_dir("gronsky", Some(tmp.path()));
        assert_eq!(dir, tmp.path());
    }

    #[test]
    fn plain_paths_are_not_expanded() {
        assert_eq!(expand_home(Path::new("/var/log")), PathBuf::from("/var/log"));
    }

    #[test]
    fn default_config_logs_to_stderr_only() {
        let cfg = LogConfig::default();
        assert!(!cfg.file_sink);
        assert!(cfg.emit_stderr);
        assert_eq!(cfg.format, LogFormat::Text);
    }
}
