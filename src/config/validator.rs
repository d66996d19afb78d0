use super::FilterConfig;
use crate::filter::FilterGroup;
use crate::output;
use colored::Colorize;
use std::collections::HashSet;

/// Top-level keys recognized in `osync.toml`
const KNOWN_TOP_LEVEL: &[&str] = &["filter"];

/// Keys recognized inside a `[[filter]]` table
const KNOWN_FILTER_FIELDS: &[&str] = &["direction", "kind", "patterns"];

/// Looks for configuration mistakes that do not stop a transfer
///
/// Nothing here fails: unknown keys and repeated groups are reported on
/// stderr and the run continues with what was understood.
pub struct ConfigValidator {
    /// Accepted top-level keys
    known_top_level: HashSet<&'static str>,
    /// Accepted keys inside a filter table
    known_filter_fields: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a validator for the current file layout
    #[must_use]
    pub fn new() -> Self {
        Self {
            known_top_level: KNOWN_TOP_LEVEL.iter().copied().collect(),
            known_filter_fields: KNOWN_FILTER_FIELDS.iter().copied().collect(),
        }
    }

    /// Collect the dotted names of keys that would be silently ignored
    ///
    /// Content that does not parse yields no findings; the parser reports it.
    #[must_use]
    pub fn unknown_fields(&self, content: &str) -> Vec<String> {
        let Ok(root) = toml::from_str::<toml::Table>(content) else {
            return Vec::new();
        };

        let mut unknown = Vec::new();
        for (key, value) in &root {
            if !self.known_top_level.contains(key.as_str()) {
                unknown.push(key.clone());
                continue;
            }

            if let toml::Value::Array(tables) = value {
                for (index, table) in tables.iter().enumerate() {
                    if let toml::Value::Table(fields) = table {
                        unknown.extend(
                            fields
                                .keys()
                                .filter(|field| !self.known_filter_fields.contains(field.as_str()))
                                .map(|field| format!("{key}[{index}].{field}")),
                        );
                    }
                }
            }
        }
        unknown
    }

    /// Indices of groups repeating an earlier group exactly
    #[must_use]
    pub fn duplicate_groups(config: &FilterConfig) -> Vec<usize> {
        let mut seen: HashSet<&FilterGroup> = HashSet::new();
        config
            .filters
            .iter()
            .enumerate()
            .filter_map(|(index, group)| (!seen.insert(group)).then_some(index))
            .collect()
    }

    /// Print warnings for unknown keys in `content`
    pub fn warn_unknown_fields(&self, content: &str) {
        let warnings: Vec<String> = self
            .unknown_fields(content)
            .iter()
            .map(|field| format!("Unknown configuration field: {}", field.yellow()))
            .collect();
        print_warnings(&warnings);
    }

    /// Print warnings for repeated filter groups
    pub fn warn_duplicates(&self, config: &FilterConfig) {
        let warnings: Vec<String> = Self::duplicate_groups(config)
            .into_iter()
            .map(|index| {
                format!(
                    "Filter group {} repeats an earlier group: {}",
                    index.to_string().yellow(),
                    "it adds nothing to the rsync rules".dimmed()
                )
            })
            .collect();
        print_warnings(&warnings);
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Print collected warnings under a single heading
fn print_warnings(warnings: &[String]) {
    output::warnings("Configuration warnings:", warnings);
}
