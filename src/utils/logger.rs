use crate::utils::error::Result;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub debug: bool,
    pub level: String,
    pub log_dir: PathBuf,
    pub file_logging: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            debug: false,
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            file_logging: false,
        }
    }
}

/// Maps a level name to `tracing::Level`, falling back to INFO for unknown names.
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" | "critical" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn log_file_name(now: chrono::DateTime<chrono::Local>) -> String {
    format!("bioxai_{}.log", now.format("%Y%m%d_%H%M%S"))
}

fn open_log_file(log_dir: &Path) -> Result<(PathBuf, File)> {
    std::fs::create_dir_all(log_dir)?;
    let path = log_dir.join(log_file_name(chrono::Local::now()));
    let file = File::create(&path)?;
    Ok((path, file))
}

/// Console logging with colors and source locations, plus an optional plain-text log file.
///
/// Returns the path of the log file when one was opened. A second call in the same
/// process leaves the first subscriber in place, opens no file and returns `None`.
pub fn init_cli_logger(settings: &LogSettings) -> Result<Option<PathBuf>> {
    let level = if settings.debug {
        Level::DEBUG
    } else {
        parse_level(&settings.level)
    };

    let directive = format!("bioxai={}", level.as_str().to_ascii_lowercase());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let (log_path, file_layer) = if settings.file_logging {
        let (path, file) = open_log_file(&settings.log_dir)?;
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(Arc::new(file));
        (Some(path), Some(layer))
    } else {
        (None, None)
    };

    if tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already set, keeping existing logger");
        // The new file layer was never installed
        if let Some(path) = &log_path {
            let _ = std::fs::remove_file(path);
        }
        return Ok(None);
    }

    Ok(log_path)
}
