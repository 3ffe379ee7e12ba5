//! Labelling statistics aggregation.
//!
//! Neighbourhood analysis writes one `;`-separated labelling file per
//! dataset and method, with the label of every example in a `type` column.
//! This module turns those files into per-dataset label shares and writes
//! the four summary tables (union/class × knn/kernel).

use crate::constants::labelling::{
    CLASS_KERNEL_FILE, CLASS_KNN_FILE, FIELD_NAMES, INDEX_COLUMN, SEPARATOR, TYPE_COLUMN,
    UNION_KERNEL_FILE, UNION_KNN_FILE,
};
use crate::error::{IsfError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Percentage of examples per label for one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct LabellingShares {
    pub name: String,
    /// Lower-cased label → share of all examples, in percent
    pub shares: BTreeMap<String, f64>,
}

impl LabellingShares {
    pub fn share(&self, label: &str) -> Option<f64> {
        self.shares.get(label).copied()
    }
}

/// Labelling results found in one dataset directory
#[derive(Debug, Default)]
pub struct DatasetLabelling {
    pub union_knn: Option<LabellingShares>,
    pub union_kernel: Option<LabellingShares>,
    pub class_knn: Option<LabellingShares>,
    pub class_kernel: Option<LabellingShares>,
}

/// Count label shares in a single labelling file
pub fn count_labels(path: &Path, dataset_name: &str) -> Result<LabellingShares> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_separator(SEPARATOR))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let total = df.height();
    let counts = df
        .lazy()
        .group_by([col(TYPE_COLUMN)])
        .agg([col(INDEX_COLUMN).count().alias("count")])
        .collect()?;

    let labels_column = counts.column(TYPE_COLUMN)?.cast(&DataType::String)?;
    let labels = labels_column.as_materialized_series().str()?;
    let counts_column = counts.column("count")?.cast(&DataType::UInt64)?;
    let label_counts = counts_column.as_materialized_series().u64()?;

    let mut shares = BTreeMap::new();
    for (label, count) in labels.into_iter().zip(label_counts.into_iter()) {
        if let (Some(label), Some(count)) = (label, count) {
            shares.insert(label.to_lowercase(), count as f64 / total as f64 * 100.0);
        }
    }

    debug!(
        "Counted {} labels over {} examples in {}",
        shares.len(),
        total,
        path.display()
    );

    Ok(LabellingShares {
        name: dataset_name.to_string(),
        shares,
    })
}

/// Collect the labelling results of one dataset directory.
///
/// Files ending in `knn.csv` or `kernel.csv` are picked up; a `union`
/// prefix selects the union slot, anything else the class slot.
pub fn analyze_dataset_dir(dir: &Path) -> Result<DatasetLabelling> {
    let dataset_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| IsfError::ProcessingFailed {
            path: dir.to_path_buf(),
            reason: "directory has no name".to_string(),
        })?;

    let mut labelling = DatasetLabelling::default();
    for path in sorted_entries(dir)? {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        let is_union = file_name.starts_with("union");

        let slot = if file_name.ends_with("knn.csv") {
            if is_union {
                &mut labelling.union_knn
            } else {
                &mut labelling.class_knn
            }
        } else if file_name.ends_with("kernel.csv") {
            if is_union {
                &mut labelling.union_kernel
            } else {
                &mut labelling.class_kernel
            }
        } else {
            continue;
        };

        *slot = Some(count_labels(&path, &dataset_name)?);
    }

    Ok(labelling)
}

/// Aggregate every dataset directory under `csv_root` into the four
/// summary tables inside `results_dir`. Returns the number of datasets.
pub fn make_stats(csv_root: &Path, results_dir: &Path) -> Result<usize> {
    if !csv_root.is_dir() {
        return Err(IsfError::DatasetNotFound {
            path: csv_root.to_path_buf(),
        });
    }

    let mut union_knn = Vec::new();
    let mut union_kernel = Vec::new();
    let mut class_knn = Vec::new();
    let mut class_kernel = Vec::new();
    let mut dataset_count = 0;

    for dir in sorted_entries(csv_root)?.into_iter().filter(|p| p.is_dir()) {
        let labelling = analyze_dataset_dir(&dir)?;
        dataset_count += 1;

        for (slot, results, file) in [
            (labelling.union_knn, &mut union_knn, UNION_KNN_FILE),
            (labelling.union_kernel, &mut union_kernel, UNION_KERNEL_FILE),
            (labelling.class_knn, &mut class_knn, CLASS_KNN_FILE),
            (labelling.class_kernel, &mut class_kernel, CLASS_KERNEL_FILE),
        ] {
            match slot {
                Some(shares) => results.push(shares),
                None => warn!("No results for {} in {}", file, dir.display()),
            }
        }
    }

    fs::create_dir_all(results_dir)?;
    write_shares_csv(&union_knn, &results_dir.join(UNION_KNN_FILE))?;
    write_shares_csv(&union_kernel, &results_dir.join(UNION_KERNEL_FILE))?;
    write_shares_csv(&class_knn, &results_dir.join(CLASS_KNN_FILE))?;
    write_shares_csv(&class_kernel, &results_dir.join(CLASS_KERNEL_FILE))?;

    Ok(dataset_count)
}

/// Write shares as a `;`-separated table with a fixed label header.
///
/// Rows end with `\n`, not `\r\n`.
pub fn write_shares_csv(rows: &[LabellingShares], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(SEPARATOR)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;

    writer.write_record(FIELD_NAMES)?;
    for row in rows {
        let mut record = vec![row.name.clone()];
        for label in &FIELD_NAMES[1..] {
            record.push(row.share(label).map(|v| format!("{:?}", v)).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}
