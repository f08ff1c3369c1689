use super::error::DriverError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Comparison operators understood by `QUERY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "CONTAINS")]
    Contains,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Contains => "CONTAINS",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            _ if s.eq_ignore_ascii_case("CONTAINS") => Ok(Operator::Contains),
            _ => Err(DriverError::InvalidCommand(format!(
                "Unknown operator '{}'",
                s
            ))),
        }
    }
}

/// A single `field operator value` predicate.
///
/// The wire form is positional and unescaped, so arguments are validated
/// instead of quoted:
///
/// - `field` must be non-empty and contain no whitespace
/// - `value` must be non-empty, contain no CR/LF and have no leading or
///   trailing whitespace. Inner spaces are allowed because the server
///   treats everything after the operator as the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    pub value: String,
}

impl Filter {
    pub fn new(field: &str, operator: Operator, value: &str) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), DriverError> {
        if self.field.is_empty() {
            return Err(DriverError::InvalidCommand(
                "Query field must not be empty".to_string(),
            ));
        }
        if self.field.chars().any(char::is_whitespace) {
            return Err(DriverError::InvalidCommand(format!(
                "Query field '{}' must not contain whitespace",
                self.field
            )));
        }
        if self.value.is_empty() {
            return Err(DriverError::InvalidCommand(
                "Query value must not be empty".to_string(),
            ));
        }
        if self.value.contains(['\n', '\r']) {
            return Err(DriverError::InvalidCommand(
                "Query value must not contain line breaks".to_string(),
            ));
        }
        if self.value.trim() != self.value {
            return Err(DriverError::InvalidCommand(format!(
                "Query value '{}' must not start or end with whitespace",
                self.value
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

impl FromStr for Filter {
    type Err = DriverError;

    /// Parses `"field operator value"`; the value keeps any inner spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, ' ');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(field), Some(op), Some(value)) => {
                let filter = Filter {
                    field: field.to_string(),
                    operator: op.parse()?,
                    value: value.trim().to_string(),
                };
                filter.validate()?;
                Ok(filter)
            }
            _ => Err(DriverError::InvalidCommand(format!(
                "Expected '<field> <operator> <value>', got '{}'",
                s
            ))),
        }
    }
}

/// A document keyed by its mandatory `_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Sets a field. `_id` is the record key and is never stored as a field.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        if name != "_id" {
            self.fields.insert(name.to_string(), value.into());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
