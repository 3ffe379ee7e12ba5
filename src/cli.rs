//! Command-line interface components.

use crate::config::{ConverterConfig, parse_delimiter, parse_delimiter_override};
use crate::constants::{DEFAULT_ARFF_INPUT_DIR, DEFAULT_INPUT_DIR};
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "isf-converter")]
#[command(about = "Convert ISF dataset descriptions to JSON attribute metadata and CSV examples")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert ISF files into json/ and csv/ output directories
    Convert(ConvertArgs),
    /// Convert ARFF files into json/ and csv/ output directories
    ConvertArff(ConvertArffArgs),
    /// Aggregate labelling results into summary tables
    Stats(StatsArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// ISF file or directory of ISF files
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT_DIR)]
    pub input_path: PathBuf,

    /// Output root; json/ and csv/ are created inside it (defaults to the input's parent)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Delimiter override for a single file, e.g. `car.isf=,` or `car.isf=\t`
    #[arg(long = "delimiter", value_name = "FILE=CHAR", value_parser = parse_delimiter_override)]
    pub delimiters: Vec<(String, char)>,

    /// Delimiter for files missing from the delimiter table
    #[arg(long, value_name = "CHAR", value_parser = parse_delimiter)]
    pub default_delimiter: Option<char>,

    /// Reject value types that are not integer, continuous or a [a,b,...] list
    #[arg(long)]
    pub strict: bool,

    /// Maximum number of files converted concurrently
    #[arg(long, value_name = "N")]
    pub max_concurrent: Option<usize>,
}

impl ConvertArgs {
    /// Build the converter configuration: config file first, then flags
    pub fn to_config(&self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_toml_file(path)?,
            None => ConverterConfig::default(),
        };

        for (file_name, delimiter) in &self.delimiters {
            config = config.with_delimiter(file_name.clone(), *delimiter);
        }
        if let Some(delimiter) = self.default_delimiter {
            config = config.with_default_delimiter(delimiter);
        }
        if self.strict {
            config = config.with_strict_value_types();
        }
        if let Some(max_files) = self.max_concurrent {
            config = config.with_max_concurrent_files(max_files);
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Parser, Debug)]
pub struct ConvertArffArgs {
    /// ARFF file or directory of ARFF files
    #[arg(value_name = "INPUT", default_value = DEFAULT_ARFF_INPUT_DIR)]
    pub input_path: PathBuf,

    /// Output root; json/ and csv/ are created inside it (defaults to the input's parent)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of files converted concurrently
    #[arg(long, value_name = "N")]
    pub max_concurrent: Option<usize>,
}

impl ConvertArffArgs {
    pub fn to_config(&self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_toml_file(path)?,
            None => ConverterConfig::default(),
        };
        if let Some(max_files) = self.max_concurrent {
            config = config.with_max_concurrent_files(max_files);
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Directory with one sub-directory of labelling results per dataset
    #[arg(short = 'c', long = "csvpath", value_name = "DIR")]
    pub csv_path: PathBuf,

    /// Output directory for the summary tables
    #[arg(short = 'r', long = "resultsdir", value_name = "DIR")]
    pub results_dir: PathBuf,
}

impl StatsArgs {
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }
}
