//! ISF section parser.
//!
//! Single-pass, line-at-a-time state machine over the `**ATTRIBUTES`,
//! `**PREFERENCES` and `**EXAMPLES` sections of an ISF file. Declarations
//! are folded into an [`AttributeSchema`]; example rows are collected
//! verbatim for later delimiter-based splitting.

use crate::constants::{
    ATTRIBUTES_SECTION, DECISION_KEYWORD, DECLARATION_SEPARATOR, END_MARKER, EXAMPLES_SECTION,
    NAME_MARKER, PREFERENCES_SECTION, SECTION_PREFIX, value_types,
};
use crate::error::{IsfError, Result};
use crate::schema::{AttributeSchema, ValueType};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Section currently receiving data lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Attributes,
    Preferences,
    Examples,
    /// Header that names no known section; fails on its first data line
    Unknown(String),
}

impl SectionKind {
    pub fn from_header(header: &str) -> Self {
        match header {
            ATTRIBUTES_SECTION => SectionKind::Attributes,
            PREFERENCES_SECTION => SectionKind::Preferences,
            EXAMPLES_SECTION => SectionKind::Examples,
            other => SectionKind::Unknown(other.to_string()),
        }
    }
}

/// Parsing behaviour switches
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Reject value-type tokens that are not `integer`, `continuous` or a
    /// bracketed value list instead of reading them as enumerations
    pub strict_value_types: bool,
}

/// Result of a finished parse
#[derive(Debug, Clone, Default)]
pub struct ParsedDataset {
    pub schema: AttributeSchema,
    pub examples: Vec<String>,
}

/// Stateful line processor for ISF input
#[derive(Debug, Default)]
pub struct SectionParser {
    options: ParserOptions,
    schema: AttributeSchema,
    examples: Vec<String>,
    current_section: Option<SectionKind>,
    line_number: usize,
    end_seen: bool,
}

impl SectionParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Feed one input line, with or without its line terminator
    pub fn process_line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;
        let raw = line.trim_end_matches(['\n', '\r']);
        let trimmed = raw.trim();

        if trimmed.starts_with(END_MARKER) {
            debug!("End marker at line {}", self.line_number);
            self.end_seen = true;
        } else if trimmed.starts_with(SECTION_PREFIX) {
            let section = SectionKind::from_header(trimmed);
            debug!("Line {}: entering section {:?}", self.line_number, section);
            self.current_section = Some(section);
        } else if !trimmed.is_empty() {
            if self.end_seen {
                warn!(
                    "Line {}: data after {} marker: {}",
                    self.line_number, END_MARKER, trimmed
                );
            }
            self.process_data_line(raw, trimmed)?;
        }

        Ok(())
    }

    /// Feed a sequence of lines, stopping at the first error
    pub fn process_lines<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.process_line(line.as_ref())?;
        }
        Ok(())
    }

    fn process_data_line(&mut self, raw: &str, trimmed: &str) -> Result<()> {
        match &self.current_section {
            Some(SectionKind::Attributes) => self.add_attribute(trimmed),
            Some(SectionKind::Preferences) => self.add_preference(trimmed),
            Some(SectionKind::Examples) => {
                self.examples.push(raw.to_string());
                Ok(())
            }
            Some(SectionKind::Unknown(tag)) => Err(IsfError::UnknownSection {
                line_number: self.line_number,
                section: tag.clone(),
                content: trimmed.to_string(),
            }),
            None => Err(IsfError::UnknownSection {
                line_number: self.line_number,
                section: "no section header".to_string(),
                content: trimmed.to_string(),
            }),
        }
    }

    fn add_attribute(&mut self, line: &str) -> Result<()> {
        let (name, value) = self.split_declaration(line)?;

        if name == DECISION_KEYWORD {
            if looks_like_type_token(&value) {
                warn!(
                    "Line {}: '{}' names the decision attribute '{}', which looks like a value type; \
                     an attribute literally called '{}' cannot be declared",
                    self.line_number, DECISION_KEYWORD, value, DECISION_KEYWORD
                );
            }
            if value.is_empty() {
                return Err(IsfError::MalformedDeclaration {
                    line_number: self.line_number,
                    content: line.to_string(),
                });
            }
            self.schema.mark_decision(&value);
            return Ok(());
        }

        if self.options.strict_value_types {
            let value_type =
                ValueType::parse_strict(&value).ok_or_else(|| IsfError::InvalidValueType {
                    line_number: self.line_number,
                    attribute: name.clone(),
                    token: value.clone(),
                })?;
            self.schema.set_value_type(&name, value_type);
        } else {
            self.schema.declare_value_type(&name, &value);
        }
        Ok(())
    }

    fn add_preference(&mut self, line: &str) -> Result<()> {
        let (name, value) = self.split_declaration(line)?;
        self.schema.declare_preference(&name, &value);
        Ok(())
    }

    /// Split `name: value` on the first separator, dropping whitespace from
    /// both parts and marker characters from the name. A name that is empty
    /// after cleaning is malformed.
    fn split_declaration(&self, line: &str) -> Result<(String, String)> {
        let (name, value) = line.split_once(DECLARATION_SEPARATOR).ok_or_else(|| {
            IsfError::MalformedDeclaration {
                line_number: self.line_number,
                content: line.to_string(),
            }
        })?;

        let name: String = name
            .chars()
            .filter(|c| *c != NAME_MARKER && !c.is_whitespace())
            .collect();
        if name.is_empty() {
            return Err(IsfError::MalformedDeclaration {
                line_number: self.line_number,
                content: line.to_string(),
            });
        }
        let value = value.chars().filter(|c| !c.is_whitespace()).collect();
        Ok((name, value))
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    pub fn current_section(&self) -> Option<&SectionKind> {
        self.current_section.as_ref()
    }

    pub fn lines_processed(&self) -> usize {
        self.line_number
    }

    pub fn finish(self) -> ParsedDataset {
        ParsedDataset {
            schema: self.schema,
            examples: self.examples,
        }
    }
}

fn looks_like_type_token(value: &str) -> bool {
    value == value_types::INTEGER
        || value == value_types::CONTINUOUS
        || value.starts_with(['[', '('])
}

/// Parse ISF text held in memory
pub fn parse_isf_str(text: &str, options: ParserOptions) -> Result<ParsedDataset> {
    let mut parser = SectionParser::with_options(options);
    parser.process_lines(text.lines())?;
    Ok(parser.finish())
}

/// Parse an ISF file line by line
pub fn parse_isf_file(file_path: &Path, options: ParserOptions) -> Result<ParsedDataset> {
    let file = File::open(file_path)?;
    let reader = BufReader::new(file);

    let mut parser = SectionParser::with_options(options);
    for line in reader.lines() {
        parser.process_line(&line?)?;
    }

    debug!(
        "Parsed {}: {} lines, {} attributes, {} examples",
        file_path.display(),
        parser.lines_processed(),
        parser.schema().len(),
        parser.examples().len()
    );

    Ok(parser.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeRole, PreferenceType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(lines: &[&str]) -> Result<ParsedDataset> {
        let mut parser = SectionParser::new();
        parser.process_lines(lines)?;
        Ok(parser.finish())
    }

    #[test]
    fn test_integer_attribute() {
        let parsed = parse(&["**ATTRIBUTES", "age: integer"]).unwrap();
        let attr = parsed.schema.get("age").unwrap();
        assert_eq!(attr.value_type, Some(ValueType::Integer));
        assert_eq!(attr.domain(), None);
    }

    #[test]
    fn test_continuous_attribute_in_parentheses() {
        let parsed = parse(&["**ATTRIBUTES", "weight: (continuous)"]).unwrap();
        assert_eq!(
            parsed.schema.get("weight").unwrap().value_type,
            Some(ValueType::Real)
        );
    }

    #[test]
    fn test_enumeration_attribute() {
        let parsed = parse(&["**ATTRIBUTES", "color: [red,green,blue]"]).unwrap();
        let attr = parsed.schema.get("color").unwrap();
        assert_eq!(attr.value_type.as_ref().unwrap().as_str(), "enumeration");
        assert_eq!(
            attr.domain().unwrap(),
            &["red".to_string(), "green".to_string(), "blue".to_string()]
        );
    }

    #[test]
    fn test_whitespace_and_markers_removed() {
        let parsed = parse(&["**ATTRIBUTES", "  + buying : [v high, high, low]  "]).unwrap();
        let attr = parsed.schema.get("buying").unwrap();
        assert_eq!(
            attr.domain().unwrap(),
            &["vhigh".to_string(), "high".to_string(), "low".to_string()]
        );
    }

    #[test]
    fn test_decision_pseudo_attribute() {
        let parsed = parse(&["**ATTRIBUTES", "class: [a,b]", "decision: class"]).unwrap();
        assert!(parsed.schema.get("decision").is_none());
        assert_eq!(
            parsed.schema.get("class").unwrap().role,
            AttributeRole::Decision
        );
        assert_eq!(parsed.schema.len(), 1);
    }

    #[test]
    fn test_decision_before_declaration() {
        let parsed = parse(&["**ATTRIBUTES", "decision: class", "class: [a,b]"]).unwrap();
        let attr = parsed.schema.get("class").unwrap();
        assert_eq!(attr.role, AttributeRole::Decision);
        assert!(attr.domain().is_some());
    }

    #[test]
    fn test_full_document() {
        let parsed = parse(&[
            "**ATTRIBUTES",
            "a: integer",
            "**PREFERENCES",
            "a: gain",
            "**EXAMPLES",
            "1 2 3",
            "**END",
        ])
        .unwrap();

        assert_eq!(parsed.schema.len(), 1);
        let attr = &parsed.schema.descriptors()[0];
        assert_eq!(attr.name, "a");
        assert_eq!(attr.value_type, Some(ValueType::Integer));
        assert_eq!(attr.preference, Some(PreferenceType::Gain));
        assert_eq!(attr.role, AttributeRole::Condition);
        assert_eq!(parsed.examples, vec!["1 2 3".to_string()]);
    }

    #[test]
    fn test_order_preserved_across_sections() {
        let parsed = parse(&[
            "**ATTRIBUTES",
            "first: integer",
            "second: integer",
            "**PREFERENCES",
            "second: cost",
            "first: gain",
            "**ATTRIBUTES",
            "second: (continuous)",
        ])
        .unwrap();

        let names: Vec<&str> = parsed
            .schema
            .descriptors()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(
            parsed.schema.get("second").unwrap().value_type,
            Some(ValueType::Real)
        );
    }

    #[test]
    fn test_blank_lines_are_noops() {
        let mut parser = SectionParser::new();
        parser.process_line("**ATTRIBUTES\n").unwrap();
        parser.process_line("a: integer\n").unwrap();
        parser.process_line("\n").unwrap();
        parser.process_line("   \t  \r\n").unwrap();
        assert_eq!(parser.current_section(), Some(&SectionKind::Attributes));
        assert_eq!(parser.schema().len(), 1);
        assert!(parser.examples().is_empty());
    }

    #[test]
    fn test_data_before_section_fails() {
        let err = parse(&["", "a: integer"]).unwrap_err();
        match err {
            IsfError::UnknownSection {
                line_number,
                content,
                ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(content, "a: integer");
            }
            other => panic!("Expected UnknownSection error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_section_fails_lazily() {
        let mut parser = SectionParser::new();
        parser.process_line("**COMMENTS").unwrap();
        assert_eq!(
            parser.current_section(),
            Some(&SectionKind::Unknown("**COMMENTS".to_string()))
        );

        let err = parser.process_line("anything").unwrap_err();
        match err {
            IsfError::UnknownSection { section, .. } => assert_eq!(section, "**COMMENTS"),
            other => panic!("Expected UnknownSection error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_separator_is_error() {
        let err = parse(&["**ATTRIBUTES", "a integer"]).unwrap_err();
        assert!(matches!(
            err,
            IsfError::MalformedDeclaration { line_number: 2, .. }
        ));

        let err = parse(&["**PREFERENCES", "gain"]).unwrap_err();
        assert!(matches!(err, IsfError::MalformedDeclaration { .. }));
    }

    #[test]
    fn test_empty_name_is_error() {
        let err = parse(&["**ATTRIBUTES", "+ : integer"]).unwrap_err();
        assert!(matches!(
            err,
            IsfError::MalformedDeclaration { line_number: 2, .. }
        ));

        let err = parse(&["**PREFERENCES", ": gain"]).unwrap_err();
        assert!(matches!(err, IsfError::MalformedDeclaration { .. }));
    }

    #[test]
    fn test_empty_decision_target_is_error() {
        let err = parse(&["**ATTRIBUTES", "+ price: integer", "decision:"]).unwrap_err();
        match err {
            IsfError::MalformedDeclaration {
                line_number,
                content,
            } => {
                assert_eq!(line_number, 3);
                assert_eq!(content, "decision:");
            }
            other => panic!("Expected MalformedDeclaration error, got {:?}", other),
        }
    }

    #[test]
    fn test_examples_keep_inner_whitespace() {
        let parsed = parse(&["**EXAMPLES", "\t1\t2\t3\r\n", "x, y ,z"]).unwrap();
        assert_eq!(parsed.examples, vec!["\t1\t2\t3", "x, y ,z"]);
    }

    #[test]
    fn test_end_marker_is_noop() {
        let mut parser = SectionParser::new();
        parser
            .process_lines(["**EXAMPLES", "1,2", "**END", "3,4"])
            .unwrap();
        assert_eq!(parser.current_section(), Some(&SectionKind::Examples));
        assert_eq!(parser.examples(), &["1,2".to_string(), "3,4".to_string()]);
    }

    #[test]
    fn test_strict_value_types() {
        let options = ParserOptions {
            strict_value_types: true,
        };
        let err = parse_isf_str("**ATTRIBUTES\nshape: round\n", options).unwrap_err();
        match err {
            IsfError::InvalidValueType {
                line_number,
                attribute,
                token,
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(attribute, "shape");
                assert_eq!(token, "round");
            }
            other => panic!("Expected InvalidValueType error, got {:?}", other),
        }

        let parsed = parse_isf_str("**ATTRIBUTES\nshape: [round,square]\n", options).unwrap();
        assert!(parsed.schema.get("shape").unwrap().domain().is_some());
    }

    #[test]
    fn test_parse_isf_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "**ATTRIBUTES").unwrap();
        writeln!(temp_file, "+ a1: (continuous)").unwrap();
        writeln!(temp_file, "+ d: [0,1]").unwrap();
        writeln!(temp_file, "decision: d").unwrap();
        writeln!(temp_file).unwrap();
        writeln!(temp_file, "**PREFERENCES").unwrap();
        writeln!(temp_file, "a1: cost").unwrap();
        writeln!(temp_file, "d: gain").unwrap();
        writeln!(temp_file, "**EXAMPLES").unwrap();
        writeln!(temp_file, "0.5\t1").unwrap();
        writeln!(temp_file, "1.5\t0").unwrap();
        writeln!(temp_file, "**END").unwrap();

        let parsed = parse_isf_file(temp_file.path(), ParserOptions::default()).unwrap();

        assert_eq!(parsed.schema.len(), 2);
        assert_eq!(
            parsed.schema.get("a1").unwrap().preference,
            Some(PreferenceType::Cost)
        );
        let decisions: Vec<&str> = parsed
            .schema
            .decision_attributes()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(decisions, vec!["d"]);
        assert_eq!(parsed.examples, vec!["0.5\t1", "1.5\t0"]);
    }
}
