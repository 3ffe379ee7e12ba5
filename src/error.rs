//! Error handling for ISF conversion operations.
//!
//! Provides error types with context for line-level parse failures,
//! ARFF input, delimiter resolution, output writing and statistics
//! aggregation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IsfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("ARFF error: {0}")]
    Arff(#[from] ::arff::Error),

    #[error("Line {line_number}: data line outside a known section ({section}): {content}")]
    UnknownSection {
        line_number: usize,
        section: String,
        content: String,
    },

    #[error("Line {line_number}: malformed declaration: {content}")]
    MalformedDeclaration { line_number: usize, content: String },

    #[error("Line {line_number}: invalid value type '{token}' for attribute '{attribute}'")]
    InvalidValueType {
        line_number: usize,
        attribute: String,
        token: String,
    },

    #[error("Unsupported ARFF attribute '{attribute}': {reason}")]
    UnsupportedArffAttribute { attribute: String, reason: String },

    #[error("Dataset not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("No example delimiter configured for file: {file_name}")]
    UnknownDelimiter { file_name: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, IsfError>;
