//! Configuration management.
//!
//! Provides the converter configuration: concurrency, value-type strictness,
//! output directory names, and the per-dataset delimiter table used to split
//! example rows.

use crate::constants::{CSV_DIR_NAME, JSON_DIR_NAME, KNOWN_DELIMITERS, MAX_CONCURRENT_FILES};
use crate::error::{IsfError, Result};
use crate::parser::ParserOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Global configuration for ISF conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Maximum number of files converted at once
    pub max_concurrent_files: usize,

    /// Reject value-type tokens that are not reserved words or value lists
    pub strict_value_types: bool,

    /// Delimiter used for files missing from the delimiter table
    pub default_delimiter: Option<char>,

    /// Example-row delimiter per ISF file name
    pub delimiters: BTreeMap<String, char>,

    /// Output sub-directory for schema JSON files
    pub json_dir_name: String,

    /// Output sub-directory for example CSV files
    pub csv_dir_name: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        let delimiters = KNOWN_DELIMITERS
            .iter()
            .map(|(name, delimiter)| (name.to_string(), *delimiter))
            .collect();

        Self {
            max_concurrent_files: num_cpus::get().clamp(1, MAX_CONCURRENT_FILES),
            strict_value_types: false,
            default_delimiter: None,
            delimiters,
            json_dir_name: JSON_DIR_NAME.to_string(),
            csv_dir_name: CSV_DIR_NAME.to_string(),
        }
    }
}

impl ConverterConfig {
    /// Load configuration from a TOML file; absent keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse TOML configuration text. Entries of a `[delimiters]` table are
    /// merged over the built-in delimiter table.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        let mut delimiters = Self::default().delimiters;
        delimiters.append(&mut config.delimiters);
        config.delimiters = delimiters;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(IsfError::Configuration {
                message: "max_concurrent_files must be at least 1".to_string(),
            });
        }
        if self.json_dir_name.is_empty() || self.csv_dir_name.is_empty() {
            return Err(IsfError::Configuration {
                message: "output directory names must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.max_concurrent_files = max_files;
        self
    }

    pub fn with_strict_value_types(mut self) -> Self {
        self.strict_value_types = true;
        self
    }

    pub fn with_default_delimiter(mut self, delimiter: char) -> Self {
        self.default_delimiter = Some(delimiter);
        self
    }

    /// Add or replace the delimiter of a single file
    pub fn with_delimiter(mut self, file_name: impl Into<String>, delimiter: char) -> Self {
        self.delimiters.insert(file_name.into(), delimiter);
        self
    }

    /// Resolve the example delimiter for an ISF file name
    pub fn delimiter_for(&self, file_name: &str) -> Result<char> {
        self.delimiters
            .get(file_name)
            .copied()
            .or(self.default_delimiter)
            .ok_or_else(|| IsfError::UnknownDelimiter {
                file_name: file_name.to_string(),
            })
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            strict_value_types: self.strict_value_types,
        }
    }
}

/// Parse a delimiter argument, accepting escapes for tab and space
pub fn parse_delimiter(value: &str) -> std::result::Result<char, String> {
    match value {
        "\\t" | "tab" => Ok('\t'),
        "space" => Ok(' '),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("delimiter must be a single character, got '{}'", value)),
            }
        }
    }
}

/// Parse a `FILE=DELIMITER` delimiter table override
pub fn parse_delimiter_override(value: &str) -> std::result::Result<(String, char), String> {
    let (file_name, delimiter) = value
        .split_once('=')
        .ok_or_else(|| format!("expected FILE=DELIMITER, got '{}'", value))?;
    if file_name.is_empty() {
        return Err(format!("missing file name in '{}'", value));
    }
    Ok((file_name.to_string(), parse_delimiter(delimiter)?))
}
