//! Tracing setup: a compact stdout layer plus a non-blocking file layer.
//!
//! The file comes from [`Config::log_file`], falling back to `logs/student-api.log`. If it
//! cannot be opened, only stdout logging is installed.
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

const DEFAULT_LOG_FILE: &str = "logs/student-api.log";

// Flushes buffered file output on drop; kept for the process lifetime.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` filters events (default `info`).
pub fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let path = log_path(config);

    let file_layer = match open_log_file(&path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .compact(),
            )
        }
        Err(err) => {
            eprintln!("Failed to open log file {}: {err}", path.display());
            None
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .init();
}

fn log_path(config: &Config) -> PathBuf {
    config
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("student-api-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn log_path_prefers_configured_file() {
        let config = Config {
            log_file: Some(PathBuf::from("/tmp/custom.log")),
            ..Config::default()
        };
        assert_eq!(log_path(&config), PathBuf::from("/tmp/custom.log"));
        assert_eq!(
            log_path(&Config::default()),
            PathBuf::from("logs/student-api.log")
        );
    }

    #[test]
    fn open_log_file_creates_parents_and_appends() {
        let dir = scratch_dir("logs");
        let path = dir.join("nested").join("app.log");

        open_log_file(&path)
            .expect("first open")
            .write_all(b"one\n")
            .expect("write");
        open_log_file(&path)
            .expect("second open")
            .write_all(b"two\n")
            .expect("write");

        assert_eq!(fs::read_to_string(&path).expect("read"), "one\ntwo\n");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn open_log_file_reports_unusable_paths() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).expect("dir");
        // A directory cannot be opened as a log file.
        assert!(open_log_file(&dir).is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
