use super::FilterConfig;
use super::validator::ConfigValidator;
use crate::error::{Error, Result};
use crate::filter::{self, RawFilterGroup};
use serde::Deserialize;
use std::path::Path;
use tracing::{Level, debug, span};

/// On-disk layout: an array of `[[filter]]` tables.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    /// Unvalidated filter records
    #[serde(default)]
    filter: Vec<RawFilterGroup>,
}

/// Read and validate a filter configuration file
///
/// # Errors
///
/// Returns [`Error::ConfigRead`], [`Error::ConfigParse`] or the first
/// validation error among the filter groups.
pub fn parse_config_file(path: &Path) -> Result<FilterConfig> {
    let span = span!(Level::DEBUG, "parse_config_file", path = %path.display());
    let _guard = span.enter();

    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    ConfigValidator::new().warn_unknown_fields(&content);

    parse_config_str(&content).map_err(|err| match err {
        Error::ConfigParse { message, .. } => Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Parse configuration text. Parse errors carry an empty path, filled in by
/// [`parse_config_file`].
///
/// # Errors
///
/// Returns [`Error::ConfigParse`] for malformed TOML or mistyped fields, and
/// a validation error for bad literals or empty pattern lists.
pub fn parse_config_str(content: &str) -> Result<FilterConfig> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| Error::ConfigParse {
        path: Default::default(),
        message: e.message().to_string(),
    })?;

    let filters = filter::validate_all(raw.filter)?;
    debug!(groups = filters.len(), "Filter groups loaded");
    Ok(FilterConfig { filters })
}
