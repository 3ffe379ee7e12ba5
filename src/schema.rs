//! Attribute schema registry.
//!
//! Holds the ordered set of attribute descriptors built up while parsing an
//! ISF file, the value-type grammar used by attribute declarations, and the
//! JSON shape consumed by downstream tools.

use crate::constants::value_types;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Value domain of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Integer,
    Real,
    /// Permitted literal values, in declaration order
    Enumeration(Vec<String>),
}

impl ValueType {
    /// Parse a raw value-type token.
    ///
    /// Parentheses are removed first. `integer` and `continuous` are the
    /// only reserved tokens; anything else is read as an enumeration list
    /// such as `[low,med,high]`.
    pub fn parse(raw: &str) -> Self {
        let token = strip_chars(raw, &['(', ')']);
        match token.as_str() {
            value_types::INTEGER => ValueType::Integer,
            value_types::CONTINUOUS => ValueType::Real,
            _ => ValueType::Enumeration(parse_domain(&token)),
        }
    }

    /// Parse a raw value-type token, rejecting anything that is neither a
    /// reserved token nor a bracketed, non-empty value list.
    pub fn parse_strict(raw: &str) -> Option<Self> {
        let token = strip_chars(raw, &['(', ')']);
        match token.as_str() {
            value_types::INTEGER => Some(ValueType::Integer),
            value_types::CONTINUOUS => Some(ValueType::Real),
            _ => {
                let inner = token.strip_prefix('[')?.strip_suffix(']')?;
                if inner.is_empty() || inner.contains(['[', ']']) {
                    return None;
                }
                let domain = parse_domain(inner);
                if domain.iter().any(String::is_empty) {
                    return None;
                }
                Some(ValueType::Enumeration(domain))
            }
        }
    }

    /// Name used in the serialized schema
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Real => "real",
            ValueType::Enumeration(_) => "enumeration",
        }
    }

    pub fn domain(&self) -> Option<&[String]> {
        match self {
            ValueType::Enumeration(domain) => Some(domain),
            _ => None,
        }
    }
}

fn strip_chars(raw: &str, chars: &[char]) -> String {
    raw.chars().filter(|c| !chars.contains(c)).collect()
}

fn parse_domain(list: &str) -> Vec<String> {
    strip_chars(list, &['[', ']'])
        .split(',')
        .map(str::to_string)
        .collect()
}

/// Preference direction of an attribute's values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceType {
    Gain,
    Cost,
    /// Any other token, kept verbatim
    Other(String),
}

impl PreferenceType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "gain" => PreferenceType::Gain,
            "cost" => PreferenceType::Cost,
            other => PreferenceType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PreferenceType::Gain => "gain",
            PreferenceType::Cost => "cost",
            PreferenceType::Other(token) => token,
        }
    }
}

impl fmt::Display for PreferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of an attribute in the described dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeRole {
    #[default]
    Condition,
    Decision,
}

impl AttributeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeRole::Condition => "condition",
            AttributeRole::Decision => "decision",
        }
    }
}

/// Metadata record of a single named attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub name: String,
    pub active: bool,
    pub value_type: Option<ValueType>,
    pub preference: Option<PreferenceType>,
    pub role: AttributeRole,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            value_type: None,
            preference: None,
            role: AttributeRole::Condition,
        }
    }

    pub fn is_decision(&self) -> bool {
        self.role == AttributeRole::Decision
    }

    pub fn domain(&self) -> Option<&[String]> {
        self.value_type.as_ref().and_then(ValueType::domain)
    }
}

impl Serialize for AttributeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let domain = self.domain();
        let field_count = if domain.is_some() { 6 } else { 5 };
        let mut record = serializer.serialize_struct("AttributeDescriptor", field_count)?;
        record.serialize_field("name", &self.name)?;
        record.serialize_field("active", &self.active)?;
        record.serialize_field("valueType", &self.value_type.as_ref().map(ValueType::as_str))?;
        record.serialize_field(
            "preferenceType",
            &self.preference.as_ref().map(PreferenceType::as_str),
        )?;
        record.serialize_field("type", self.role.as_str())?;
        if let Some(domain) = domain {
            record.serialize_field("domain", domain)?;
        }
        record.end()
    }
}

/// Ordered registry of attribute descriptors with O(1) lookup by name.
///
/// Descriptors are created on first reference and keep their position for
/// the lifetime of the schema.
#[derive(Debug, Clone, Default)]
pub struct AttributeSchema {
    attributes: Vec<AttributeDescriptor>,
    positions: HashMap<String, usize>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, name: &str) -> &mut AttributeDescriptor {
        let position = match self.positions.get(name) {
            Some(&position) => position,
            None => {
                let position = self.attributes.len();
                self.positions.insert(name.to_string(), position);
                self.attributes.push(AttributeDescriptor::new(name));
                position
            }
        };
        &mut self.attributes[position]
    }

    /// Parse `raw_type` and record it as the value type of `name`
    pub fn declare_value_type(&mut self, name: &str, raw_type: &str) {
        self.set_value_type(name, ValueType::parse(raw_type));
    }

    /// Record an already parsed value type, replacing any earlier one
    pub fn set_value_type(&mut self, name: &str, value_type: ValueType) {
        self.entry(name).value_type = Some(value_type);
    }

    /// Record the preference token of `name`, with embedded whitespace removed
    pub fn declare_preference(&mut self, name: &str, raw_preference: &str) {
        let token: String = raw_preference
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        self.entry(name).preference = Some(PreferenceType::parse(&token));
    }

    pub fn mark_decision(&mut self, name: &str) {
        self.entry(name).role = AttributeRole::Decision;
    }

    pub fn descriptors(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.positions
            .get(name)
            .map(|&position| &self.attributes[position])
    }

    pub fn decision_attributes(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.iter().filter(|attr| attr.is_decision())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Serialize for AttributeSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}
