//! ISF Converter Library
//!
//! Reads ISF dataset descriptions (attribute declarations, preference
//! declarations and example rows in `**`-delimited sections) and converts
//! them into a JSON attribute schema plus a CSV table of examples.
//!
//! This library provides tools for:
//! - Parsing ISF text line by line into an ordered attribute schema
//! - Classifying attribute value domains (integer, real, enumeration)
//! - Tracking decision attributes and preference directions
//! - Batch converting directories of ISF files with per-dataset delimiters
//! - Converting Weka ARFF files into the same schema and example layout
//! - Aggregating neighbourhood labelling results into summary tables

pub mod arff;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;
pub mod schema;
pub mod stats;

pub use config::ConverterConfig;
pub use error::{IsfError, Result};
pub use models::InputFormat;
pub use parser::{
    ParsedDataset, ParserOptions, SectionKind, SectionParser, parse_isf_file, parse_isf_str,
};
pub use processor::DatasetProcessor;
pub use schema::{AttributeDescriptor, AttributeRole, AttributeSchema, PreferenceType, ValueType};
