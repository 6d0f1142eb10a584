use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::PulsarError;

/// File name the driver looks for when no `--config` is given.
pub const CONFIG_FILE: &str = "pulsar.toml";

const DEFAULT_INDENT_WIDTH: usize = 4;
const DEFAULT_MAX_PARAMETERS: usize = 255;

/// Driver and pass settings, read from `pulsar.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub printer: PrinterConfig,
    pub check: CheckConfig,
    pub log_level: tracing::Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Spaces per nesting level.
    pub indent_width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckConfig {
    /// Functions declaring more parameters than this are reported.
    pub max_parameters: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            printer: PrinterConfig::default(),
            check: CheckConfig::default(),
            log_level: tracing::Level::WARN,
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self { indent_width: DEFAULT_INDENT_WIDTH }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { max_parameters: DEFAULT_MAX_PARAMETERS }
    }
}

// ---- TOML deserialization types ----

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    printer: Option<TomlPrinter>,
    check: Option<TomlCheck>,
    log: Option<TomlLog>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlPrinter {
    indent_width: Option<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlCheck {
    max_parameters: Option<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlLog {
    level: Option<String>,
}

impl Config {
    /// Parse config text. `path` is only used for error reporting.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, PulsarError> {
        let raw: TomlConfig = toml::from_str(text)
            .map_err(|e| PulsarError::config(format!("invalid {}: {e}", path.display()), path.to_path_buf()))?;

        let mut config = Config::default();

        if let Some(printer) = raw.printer {
            if let Some(width) = printer.indent_width {
                if width == 0 {
                    return Err(PulsarError::config(
                        "printer.indent_width must be at least 1",
                        path.to_path_buf(),
                    ));
                }
                config.printer.indent_width = width;
            }
        }

        if let Some(check) = raw.check {
            if let Some(max) = check.max_parameters {
                config.check.max_parameters = max;
            }
        }

        if let Some(log) = raw.log {
            if let Some(level) = log.level {
                config.log_level = parse_level(&level).ok_or_else(|| {
                    PulsarError::config(
                        format!("log.level '{level}': expected one of trace, debug, info, warn, error"),
                        path.to_path_buf(),
                    )
                })?;
            }
        }

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, PulsarError> {
        let text = std::fs::read_to_string(path).map_err(|e| PulsarError::io(e, path.to_path_buf()))?;
        Self::from_toml_str(&text, path)
    }

    /// Load `pulsar.toml` from `dir` if present, otherwise use defaults.
    pub fn discover(dir: &Path) -> Result<(Self, Option<PathBuf>), PulsarError> {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            let config = Self::load(&candidate)?;
            Ok((config, Some(candidate)))
        } else {
            Ok((Self::default(), None))
        }
    }
}

fn parse_level(level: &str) -> Option<tracing::Level> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Some(tracing::Level::TRACE),
        "debug" => Some(tracing::Level::DEBUG),
        "info" => Some(tracing::Level::INFO),
        "warn" => Some(tracing::Level::WARN),
        "error" => Some(tracing::Level::ERROR),
        _ => None,
    }
}
