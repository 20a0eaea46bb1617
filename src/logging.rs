//! Log sink set-up.
//!
//! Stdout carries the wire protocol, so logs go to a file only.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::HostConfig;
use crate::error::{NmError, Result};

/// Install the global subscriber writing to `config.log_file`.
///
/// `RUST_LOG` wins over the `debug` setting when present.
pub fn init(config: &HostConfig) -> Result<()> {
    let (dir, file) = split_log_path(&config.log_file)?;
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file.to_string_lossy())
        .build(dir)
        .map_err(|e| NmError::Config(format!("log file {}: {e}", config.log_file.display())))?;

    let default_level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| NmError::Config(format!("logger already initialised: {e}")))
}

fn split_log_path(path: &Path) -> Result<(&Path, &std::ffi::OsStr)> {
    let file = path
        .file_name()
        .ok_or_else(|| NmError::Config(format!("log file {} has no file name", path.display())))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Ok((dir, file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_logs_to_cwd() {
        let (dir, file) = split_log_path(Path::new("tbed.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(file, "tbed.log");
    }

    #[test]
    fn directory_path_is_rejected() {
        assert!(split_log_path(Path::new("/")).is_err());
    }
}
