pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod line_index;
pub mod passes;
pub mod visit;

use std::path::{Path, PathBuf};

use tracing::info;

use ast::TranslationUnit;
use config::Config;
use diagnostics::PulsarError;
use passes::{CensusReport, CheckReport, Folded};

/// Read a JSON tree file into a translation unit.
pub fn load_unit(path: &Path) -> Result<TranslationUnit, PulsarError> {
    let text = std::fs::read_to_string(path).map_err(|e| PulsarError::io(e, path.to_path_buf()))?;
    TranslationUnit::from_json(&text).map_err(|e| {
        PulsarError::tree(format!("{}:{}:{}: {e}", path.display(), e.line(), e.column()), path.to_path_buf())
    })
}

/// Resolve the configuration for a run over `tree`.
///
/// An explicit path must exist. Otherwise `pulsar.toml` is looked up next to
/// the tree file, and defaults are used if there is none.
pub fn resolve_config(explicit: Option<&Path>, tree: &Path) -> Result<Config, PulsarError> {
    match explicit {
        Some(path) => Config::load(path),
        None => {
            let dir = tree.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let (config, found) = Config::discover(dir)?;
            if let Some(found) = found {
                info!(path = %found.display(), "using config");
            }
            Ok(config)
        }
    }
}

/// Pretty-print the tree stored at `path`.
pub fn print_file(path: &Path, config: &Config) -> Result<String, PulsarError> {
    let unit = load_unit(path)?;
    info!(path = %path.display(), "print");
    Ok(passes::pretty_print(&unit, config.printer))
}

/// Run the declaration checker over the tree stored at `path`.
///
/// Problems in the tree are returned in the report, not as an error.
pub fn check_file(path: &Path, config: &Config) -> Result<CheckReport, PulsarError> {
    let unit = load_unit(path)?;
    let report = passes::check(&unit, config.check);
    info!(path = %path.display(), errors = report.diagnostics.len(), "check");
    Ok(report)
}

pub fn census_file(path: &Path) -> Result<CensusReport, PulsarError> {
    let unit = load_unit(path)?;
    let report = passes::census(&unit);
    info!(path = %path.display(), nodes = report.total(), "census");
    Ok(report)
}

pub fn fold_file(path: &Path) -> Result<Vec<Folded>, PulsarError> {
    let unit = load_unit(path)?;
    let folded = passes::fold(&unit);
    info!(path = %path.display(), folded = folded.len(), "fold");
    Ok(folded)
}

/// The file a `PulsarError` refers to, if any.
pub fn error_path(err: &PulsarError) -> Option<&PathBuf> {
    match err {
        PulsarError::Io { path, .. } | PulsarError::Tree { path, .. } | PulsarError::Config { path, .. } => {
            Some(path)
        }
        PulsarError::Check { .. } | PulsarError::Channel(_) => None,
    }
}
