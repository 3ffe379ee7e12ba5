//! Core data structures shared by the conversion pipeline.
//!
//! Defines input formats, per-file conversion outcomes and batch
//! processing statistics.

use crate::constants::{ARFF_EXTENSION, ISF_EXTENSION};
use std::path::PathBuf;

/// Dataset description format read by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Isf,
    Arff,
}

impl InputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            InputFormat::Isf => ISF_EXTENSION,
            InputFormat::Arff => ARFF_EXTENSION,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputFormat::Isf => "ISF",
            InputFormat::Arff => "ARFF",
        }
    }
}

/// Result of converting a single ISF file
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub source: PathBuf,
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
    pub attribute_count: usize,
    pub decision_count: usize,
    pub example_count: usize,
}

/// Processing statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_attributes: usize,
    pub total_examples: usize,
    pub output_path: PathBuf,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    pub fn empty(output_path: PathBuf) -> Self {
        Self {
            output_path,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &ConversionOutcome) {
        self.files_processed += 1;
        self.total_attributes += outcome.attribute_count;
        self.total_examples += outcome.example_count;
    }
}
