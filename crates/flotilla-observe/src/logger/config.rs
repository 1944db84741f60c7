use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::logger::error::LoggerResult;
use crate::logger::object::{LoggerFormat, LoggerLevel};

/// Logger configuration.
///
/// The daemon builds this from `FLOTILLA_LOG_*` environment variables via
/// [`LoggerConfig::from_env`]; embedders can also construct it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Log level filter expression (e.g., "info", "flotilla_fleet=debug,info").
    pub level: LoggerLevel,
    /// Whether to include module/target names in log output.
    pub with_targets: bool,
    /// Whether to use colored output.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Build a configuration from `FLOTILLA_LOG_FORMAT`, `FLOTILLA_LOG_LEVEL`
    /// and `FLOTILLA_LOG_COLOR`. Unset variables keep their defaults;
    /// malformed values are reported, never silently ignored.
    pub fn from_env() -> LoggerResult<Self> {
        let mut cfg = Self::default();

        if let Ok(raw) = std::env::var("FLOTILLA_LOG_FORMAT") {
            cfg.format = raw.parse()?;
        }
        if let Ok(raw) = std::env::var("FLOTILLA_LOG_LEVEL") {
            cfg.level = raw.parse()?;
        }
        if let Ok(raw) = std::env::var("FLOTILLA_LOG_COLOR") {
            cfg.use_color = !matches!(raw.trim(), "0" | "false" | "no");
        }

        Ok(cfg)
    }

    /// Determines whether colored output should be used.
    ///
    /// Color is enabled only when the configuration allows it and stdout
    /// is currently a terminal, so redirected output stays clean. Checked
    /// at initialization time, not at parse time.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
