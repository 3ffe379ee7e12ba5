//! ARFF dataset conversion.
//!
//! Reads Weka ARFF files into the same attribute schema and example table
//! produced for ISF input. Numeric attributes become `real`, nominal
//! attributes become enumerations over their declared categories, every
//! attribute is a `gain` criterion and the last attribute is the decision.
//!
//! Column types are inferred from the first present value of each column:
//! a column holding only missing values, or a string column, is rejected.

use crate::config::ConverterConfig;
use crate::error::{IsfError, Result};
use crate::models::ConversionOutcome;
use crate::processor::output_paths;
use crate::processor::writer::{write_rows_csv, write_schema_json};
use crate::schema::{AttributeSchema, PreferenceType, ValueType};

use ::arff::dynamic::{DataSet, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Written for a missing numeric value
const MISSING_NUMERIC: &str = "nan";

/// Written for a missing nominal value
const MISSING_NOMINAL: &str = "?";

/// ARFF input converted to the shared schema/rows model
#[derive(Debug, Clone, Default)]
pub struct ArffDataset {
    pub relation: String,
    pub schema: AttributeSchema,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
enum ColumnKind {
    Numeric,
    Nominal,
}

/// Parse ARFF text held in memory
pub fn parse_arff_str(text: &str) -> Result<ArffDataset> {
    let normalized = text.replace("\r\n", "\n");
    let dataset = DataSet::from_str(&normalized)?;

    if dataset.n_cols() == 0 {
        return Err(IsfError::UnsupportedArffAttribute {
            attribute: dataset.name().to_string(),
            reason: "relation declares no attributes".to_string(),
        });
    }

    let mut schema = AttributeSchema::new();
    let mut kinds = Vec::with_capacity(dataset.n_cols());

    for col in 0..dataset.n_cols() {
        let name = dataset.col_name(col).to_string();
        let (kind, value_type) = classify_column(&dataset, col)?;
        schema.set_value_type(&name, value_type);
        schema.declare_preference(&name, PreferenceType::Gain.as_str());
        kinds.push(kind);
    }

    let decision = dataset.col_name(dataset.n_cols() - 1).to_string();
    schema.mark_decision(&decision);

    let rows = (0..dataset.n_rows())
        .map(|row| {
            kinds
                .iter()
                .enumerate()
                .map(|(col, kind)| format_value(&dataset.item(row, col), kind))
                .collect()
        })
        .collect();

    Ok(ArffDataset {
        relation: dataset.name().to_string(),
        schema,
        rows,
    })
}

/// Parse an ARFF file
pub fn parse_arff_file(file_path: &Path) -> Result<ArffDataset> {
    let text = fs::read_to_string(file_path)?;
    let dataset = parse_arff_str(&text)?;

    debug!(
        "Parsed {}: relation '{}', {} attributes, {} rows",
        file_path.display(),
        dataset.relation,
        dataset.schema.len(),
        dataset.rows.len()
    );

    Ok(dataset)
}

/// Convert one ARFF file into `<output_root>/json/<stem>.json` and
/// `<output_root>/csv/<stem>.csv`
pub fn convert_arff_file(
    file_path: &Path,
    output_root: &Path,
    config: &ConverterConfig,
) -> Result<ConversionOutcome> {
    let (_, json_path, csv_path) = output_paths(file_path, output_root, config)?;
    let dataset = parse_arff_file(file_path)?;

    write_schema_json(&dataset.schema, &json_path)?;
    write_rows_csv(&dataset.rows, &csv_path)?;

    Ok(ConversionOutcome {
        source: file_path.to_path_buf(),
        json_path,
        csv_path,
        attribute_count: dataset.schema.len(),
        decision_count: dataset.schema.decision_attributes().count(),
        example_count: dataset.rows.len(),
    })
}

fn classify_column(dataset: &DataSet, col: usize) -> Result<(ColumnKind, ValueType)> {
    let name = dataset.col_name(col);

    for row in 0..dataset.n_rows() {
        match dataset.item(row, col) {
            Value::Missing => continue,
            Value::Nominal(_, categories) => {
                return Ok((ColumnKind::Nominal, ValueType::Enumeration(categories.clone())));
            }
            Value::String(_) => {
                return Err(IsfError::UnsupportedArffAttribute {
                    attribute: name.to_string(),
                    reason: "string attributes have no value domain".to_string(),
                });
            }
            _ => return Ok((ColumnKind::Numeric, ValueType::Real)),
        }
    }

    Err(IsfError::UnsupportedArffAttribute {
        attribute: name.to_string(),
        reason: "no present value to infer the attribute type from".to_string(),
    })
}

fn format_value(value: &Value, kind: &ColumnKind) -> String {
    match value {
        Value::Missing => match kind {
            ColumnKind::Numeric => MISSING_NUMERIC.to_string(),
            ColumnKind::Nominal => MISSING_NOMINAL.to_string(),
        },
        Value::U8(v) => format_number(f64::from(*v)),
        Value::U16(v) => format_number(f64::from(*v)),
        Value::U32(v) => format_number(f64::from(*v)),
        Value::U64(v) => format_number(*v as f64),
        Value::I8(v) => format_number(f64::from(*v)),
        Value::I16(v) => format_number(f64::from(*v)),
        Value::I32(v) => format_number(f64::from(*v)),
        Value::I64(v) => format_number(*v as f64),
        Value::F64(v) => format_number(*v),
        Value::String(s) => s.to_string(),
        Value::Nominal(index, categories) => categories
            .get(*index)
            .cloned()
            .unwrap_or_else(|| MISSING_NOMINAL.to_string()),
    }
}

/// Numeric values are written as floats (`2` becomes `2.0`)
fn format_number(value: f64) -> String {
    format!("{:?}", value)
}
