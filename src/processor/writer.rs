//! Output writers for converted ISF datasets
//!
//! Writes the attribute schema as indented JSON and the example rows as a
//! header-less CSV table.

use crate::error::Result;
use crate::schema::AttributeSchema;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write the attribute descriptors as a JSON array with 4-space indentation.
///
/// Non-ASCII characters are written as UTF-8, not as `\uXXXX` escapes.
pub fn write_schema_json(schema: &AttributeSchema, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);

    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    schema.serialize(&mut serializer)?;
    writer.flush()?;

    debug!("Wrote {} attributes to {}", schema.len(), path.display());
    Ok(())
}

/// Split each example line on `delimiter` and write the fields as CSV rows.
///
/// Rows keep their own field count; no header row is written. Rows end
/// with `\n`, not `\r\n`.
pub fn write_examples_csv(examples: &[String], delimiter: char, path: &Path) -> Result<()> {
    let mut writer = example_writer(path)?;
    for line in examples {
        writer.write_record(line.split(delimiter))?;
    }
    writer.flush()?;

    debug!("Wrote {} example rows to {}", examples.len(), path.display());
    Ok(())
}

/// Write already split example rows with the same layout as
/// [`write_examples_csv`]
pub fn write_rows_csv(rows: &[Vec<String>], path: &Path) -> Result<()> {
    let mut writer = example_writer(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    debug!("Wrote {} example rows to {}", rows.len(), path.display());
    Ok(())
}

fn example_writer(path: &Path) -> Result<csv::Writer<File>> {
    ensure_parent_dir(path)?;
    let writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?;
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_schema_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("json").join("car.json");

        let mut schema = AttributeSchema::new();
        schema.declare_value_type("doors", "integer");
        schema.mark_decision("doors");

        write_schema_json(&schema, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let expected = r#"[
    {
        "name": "doors",
        "active": true,
        "valueType": "integer",
        "preferenceType": null,
        "type": "decision"
    }
]"#;
        assert_eq!(content, expected);
    }

    #[test]
    fn test_write_schema_json_keeps_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("car.json");

        let mut schema = AttributeSchema::new();
        schema.declare_value_type("größe", "[klein,groß]");

        write_schema_json(&schema, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"name\": \"größe\""));
        assert!(content.contains("\"groß\""));
        assert!(!content.contains("\\u"));
    }

    #[test]
    fn test_write_examples_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("csv").join("car.csv");

        let examples = vec![
            "vhigh\t2\tunacc".to_string(),
            "low\t4".to_string(),
            "a,b\t\"q\"".to_string(),
        ];
        write_examples_csv(&examples, '\t', &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "vhigh,2,unacc\nlow,4\n\"a,b\",\"\"\"q\"\"\"\n");
    }

    #[test]
    fn test_write_rows_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("csv").join("gen.csv");

        let rows = vec![
            vec!["1.0".to_string(), "red, dark".to_string()],
            vec!["nan".to_string(), "?".to_string()],
        ];
        write_rows_csv(&rows, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1.0,\"red, dark\"\nnan,?\n");
    }

    #[test]
    fn test_write_empty_examples() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");

        write_examples_csv(&[], ',', &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
