//! Batch conversion engine.
//!
//! Orchestrates the conversion workflow: file discovery, per-file parsing
//! of ISF or ARFF input on blocking worker tasks, and JSON/CSV output
//! writing.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::discovery::FileDiscovery;
use self::writer::{write_examples_csv, write_schema_json};

use crate::arff::convert_arff_file;
use crate::config::ConverterConfig;
use crate::error::{IsfError, Result};
use crate::models::{ConversionOutcome, InputFormat, ProcessingStats};
use crate::parser::parse_isf_file;

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, warn};

/// Main processor for dataset conversion
#[derive(Debug)]
pub struct DatasetProcessor {
    input_path: PathBuf,
    output_path: PathBuf,
    config: ConverterConfig,
    format: InputFormat,
    file_discovery: FileDiscovery,
}

impl DatasetProcessor {
    /// Create a new dataset processor.
    ///
    /// Without an explicit output path, outputs go next to the input
    /// directory: `data/isf` is converted into `data/json` and `data/csv`.
    pub fn new(input_path: PathBuf, output_path: Option<PathBuf>) -> Result<Self> {
        if !input_path.exists() {
            return Err(IsfError::DatasetNotFound { path: input_path });
        }

        let output_path = output_path.unwrap_or_else(|| default_output_root(&input_path));

        Ok(Self {
            file_discovery: FileDiscovery::new(input_path.clone()),
            input_path,
            output_path,
            config: ConverterConfig::default(),
            format: InputFormat::default(),
        })
    }

    /// Configure the processor
    pub fn with_config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    /// Select the input format; ISF unless set
    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.format = format;
        self.file_discovery = FileDiscovery::new(self.input_path.clone()).with_format(format);
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Convert a single file with this processor's format and configuration
    pub fn convert_file(&self, file_path: &Path) -> Result<ConversionOutcome> {
        convert_input(self.format, file_path, &self.output_path, &self.config)
    }

    /// Main processing entry point
    pub async fn process(&self) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        let label = self.format.label();
        println!("{}", format!("Starting {} conversion", label).bright_green().bold());
        println!("  {} {}", "Input:".bright_cyan(), self.input_path.display());
        println!("  {} {}", "Output:".bright_cyan(), self.output_path.display());

        println!("\n{}", format!("Discovering {} files...", label).bright_yellow());
        let input_files = self.file_discovery.discover_files().await?;
        println!(
            "  {} {} {} files",
            "Found".bright_green(),
            input_files.len().to_string().bright_white().bold(),
            label
        );

        if input_files.is_empty() {
            return Ok(ProcessingStats {
                processing_time_ms: start_time.elapsed().as_millis(),
                ..ProcessingStats::empty(self.output_path.clone())
            });
        }

        println!("\n{}", "Converting files...".bright_yellow());
        let pb = ProgressBar::new(input_files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let config = Arc::new(self.config.clone());
        let output_root = Arc::new(self.output_path.clone());
        let format = self.format;
        let concurrent_limit = self.config.max_concurrent_files.min(input_files.len());
        debug!("Converting with up to {} concurrent files", concurrent_limit);

        let mut results = stream::iter(input_files)
            .map(|file_path| {
                let config = Arc::clone(&config);
                let output_root = Arc::clone(&output_root);
                let pb = pb.clone();
                async move {
                    let task_path = file_path.clone();
                    let result = task::spawn_blocking(move || {
                        convert_input(format, &task_path, &output_root, &config)
                    })
                    .await
                    .unwrap_or_else(|e| {
                        Err(IsfError::ProcessingFailed {
                            path: file_path.clone(),
                            reason: format!("conversion task failed: {}", e),
                        })
                    });
                    pb.inc(1);
                    (file_path, result)
                }
            })
            .buffer_unordered(concurrent_limit)
            .collect::<Vec<_>>()
            .await;

        pb.finish_and_clear();
        results.sort_by(|a, b| a.0.cmp(&b.0));

        let mut stats = ProcessingStats::empty(self.output_path.clone());
        for (file_path, result) in results {
            match result {
                Ok(outcome) => {
                    debug!(
                        "Converted {}: {} attributes, {} examples",
                        file_path.display(),
                        outcome.attribute_count,
                        outcome.example_count
                    );
                    stats.record(&outcome);
                }
                Err(e) => {
                    error!("Failed to convert {}: {}", file_path.display(), e);
                    stats.files_failed += 1;
                }
            }
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        self.report_summary(&stats);

        Ok(stats)
    }

    fn report_summary(&self, stats: &ProcessingStats) {
        println!("\n{}", "Conversion Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Files converted:".bright_cyan(),
            stats.files_processed.to_string().bright_white()
        );
        if stats.files_failed > 0 {
            println!(
                "  {} {}",
                "Files failed:".bright_red(),
                stats.files_failed.to_string().bright_red().bold()
            );
        }
        println!(
            "  {} {}",
            "Attributes:".bright_cyan(),
            stats.total_attributes.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Examples:".bright_cyan(),
            stats.total_examples.to_string().bright_white().bold()
        );
    }
}

/// Output root used when none is given: the parent of the input directory,
/// or the grandparent of a single input file
fn default_output_root(input_path: &Path) -> PathBuf {
    let base = if input_path.is_file() {
        input_path.parent().and_then(Path::parent)
    } else {
        input_path.parent()
    };

    base.filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf()
}

fn convert_input(
    format: InputFormat,
    file_path: &Path,
    output_root: &Path,
    config: &ConverterConfig,
) -> Result<ConversionOutcome> {
    match format {
        InputFormat::Isf => convert_file(file_path, output_root, config),
        InputFormat::Arff => convert_arff_file(file_path, output_root, config),
    }
}

/// File name of `file_path` plus its JSON and CSV output paths under
/// `output_root`
pub(crate) fn output_paths(
    file_path: &Path,
    output_root: &Path,
    config: &ConverterConfig,
) -> Result<(String, PathBuf, PathBuf)> {
    let (file_name, stem) = match (file_path.file_name(), file_path.file_stem()) {
        (Some(name), Some(stem)) => (
            name.to_string_lossy().to_string(),
            stem.to_string_lossy().to_string(),
        ),
        _ => {
            return Err(IsfError::ProcessingFailed {
                path: file_path.to_path_buf(),
                reason: "path has no file name".to_string(),
            });
        }
    };

    let json_path = output_root
        .join(&config.json_dir_name)
        .join(format!("{}.json", stem));
    let csv_path = output_root
        .join(&config.csv_dir_name)
        .join(format!("{}.csv", stem));

    Ok((file_name, json_path, csv_path))
}

/// Convert one ISF file into `<output_root>/json/<stem>.json` and
/// `<output_root>/csv/<stem>.csv`
pub fn convert_file(
    file_path: &Path,
    output_root: &Path,
    config: &ConverterConfig,
) -> Result<ConversionOutcome> {
    let (file_name, json_path, csv_path) = output_paths(file_path, output_root, config)?;

    let delimiter = config.delimiter_for(&file_name)?;
    let parsed = parse_isf_file(file_path, config.parser_options())?;

    let decision_count = parsed.schema.decision_attributes().count();
    if decision_count != 1 {
        warn!(
            "{} declares {} decision attributes",
            file_path.display(),
            decision_count
        );
    }

    write_schema_json(&parsed.schema, &json_path)?;
    write_examples_csv(&parsed.examples, delimiter, &csv_path)?;

    Ok(ConversionOutcome {
        source: file_path.to_path_buf(),
        json_path,
        csv_path,
        attribute_count: parsed.schema.len(),
        decision_count,
        example_count: parsed.examples.len(),
    })
}
