//! Host configuration.
//!
//! [`Settings`] is what a user may write in a TOML file (path in
//! `TBED_CONFIG`) or override through `TBED_LOG_FILE` / `TBED_DEBUG`.
//! [`HostConfig`] is the immutable value built once at start-up and handed to
//! the connection and paging code.

use serde::Deserialize;
use std::{env, fs, path::PathBuf};

use crate::endian::ByteOrder;
use crate::error::{NmError, Result};

/// Hard ceiling on a single host -> client frame body (1 MiB).
pub const MAX_TO_CLIENT: usize = 1_048_576;
/// Default cap on a single client -> host frame body (64 MiB).
pub const MAX_FROM_CLIENT: usize = 64 * 1_048_576;
/// Characters per page: half the frame ceiling, leaving room for JSON escaping.
pub const DEFAULT_PAGE_SIZE: usize = MAX_TO_CLIENT / 2;

pub const CONFIG_ENV: &str = "TBED_CONFIG";
pub const LOG_FILE_ENV: &str = "TBED_LOG_FILE";
pub const DEBUG_ENV: &str = "TBED_DEBUG";

#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub page_size: Option<usize>,
    pub max_outgoing: Option<usize>,
    pub max_incoming: Option<usize>,
    pub log_file: Option<PathBuf>,
    pub debug: Option<bool>,
}

impl Settings {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| NmError::Config(e.to_string()))
    }

    /// Read the file named by `TBED_CONFIG` (if any), then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut settings = match env::var_os(CONFIG_ENV) {
            Some(path) => {
                let raw = fs::read_to_string(&path).map_err(|e| {
                    NmError::Config(format!("reading {}: {e}", PathBuf::from(&path).display()))
                })?;
                Self::from_toml(&raw)?
            }
            None => Settings::default(),
        };
        settings.apply_env()?;
        Ok(settings)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(path) = env::var_os(LOG_FILE_ENV) {
            self.log_file = Some(PathBuf::from(path));
        }
        if let Ok(raw) = env::var(DEBUG_ENV) {
            let debug = raw
                .trim()
                .parse::<bool>()
                .map_err(|_| NmError::Config(format!("{DEBUG_ENV} must be true or false, got {raw:?}")))?;
            self.debug = Some(debug);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub byte_order: ByteOrder,
    pub page_size: usize,
    pub max_outgoing: usize,
    pub max_incoming: usize,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl HostConfig {
    /// Defaults for the given byte order.
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            page_size: DEFAULT_PAGE_SIZE,
            max_outgoing: MAX_TO_CLIENT,
            max_incoming: MAX_FROM_CLIENT,
            log_file: env::temp_dir().join("tbed.log"),
            debug: true,
        }
    }

    pub fn from_settings(byte_order: ByteOrder, settings: Settings) -> Result<Self> {
        let defaults = Self::new(byte_order);
        let config = Self {
            byte_order,
            page_size: settings.page_size.unwrap_or(defaults.page_size),
            max_outgoing: settings.max_outgoing.unwrap_or(defaults.max_outgoing),
            max_incoming: settings.max_incoming.unwrap_or(defaults.max_incoming),
            log_file: settings.log_file.unwrap_or(defaults.log_file),
            debug: settings.debug.unwrap_or(defaults.debug),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(NmError::Config("page_size must be greater than zero".into()));
        }
        if self.max_outgoing > MAX_TO_CLIENT {
            return Err(NmError::Config(format!(
                "max_outgoing {} exceeds the {MAX_TO_CLIENT} byte frame ceiling",
                self.max_outgoing
            )));
        }
        if self.page_size > self.max_outgoing {
            return Err(NmError::Config(format!(
                "page_size {} exceeds max_outgoing {}",
                self.page_size, self.max_outgoing
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_halve_the_frame_ceiling() {
        let cfg = HostConfig::new(ByteOrder::Little);
        assert_eq!(cfg.page_size, 524_288);
        assert_eq!(cfg.max_outgoing, 1_048_576);
        assert!(cfg.debug);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = Settings::from_toml(
            r#"
            page_size = 1000
            debug = false
            log_file = "/var/tmp/tbed.log"
            "#,
        )
        .unwrap();
        let cfg = HostConfig::from_settings(ByteOrder::Big, settings).unwrap();
        assert_eq!(cfg.page_size, 1000);
        assert!(!cfg.debug);
        assert_eq!(cfg.log_file, PathBuf::from("/var/tmp/tbed.log"));
        assert_eq!(cfg.max_incoming, MAX_FROM_CLIENT);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_toml("pages = 3").unwrap_err();
        assert!(matches!(err, NmError::Config(_)));
    }

    #[test]
    fn zero_page_size_is_invalid() {
        let settings = Settings {
            page_size: Some(0),
            ..Settings::default()
        };
        assert!(HostConfig::from_settings(ByteOrder::Little, settings).is_err());
    }

    #[test]
    fn outgoing_limit_cannot_exceed_ceiling() {
        let settings = Settings {
            max_outgoing: Some(MAX_TO_CLIENT + 1),
            ..Settings::default()
        };
        assert!(HostConfig::from_settings(ByteOrder::Little, settings).is_err());
    }
}
