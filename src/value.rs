use std::{fmt, str::FromStr};

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::tree::{Dna, NodeId};

/// A node value.
///
/// Nodes may carry any of these, or nothing at all. Values compare by
/// variant and content, so `Integer(5)` never equals `String("5")`.
///
/// # Type names
///
/// Typed values in expressions (`=:int:5`) and casts (`?value.string`) use
/// these names:
///
/// ```text
/// string          String
/// int, long       Integer
/// float, double   Float
/// decimal         Decimal
/// bool            Boolean
/// path            Path
/// x               Expression
/// ```
///
/// # Examples
///
/// ```
/// use p5x::Value;
///
/// let five = Value::from_typed("int", "5").unwrap();
/// assert_eq!(five, Value::Integer(5));
/// assert_eq!(five.cast("string").unwrap(), Value::String("5".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text, the type of untyped values
    String(String),

    Integer(i64),

    Float(f64),

    /// Exact decimal number
    Decimal(Decimal),

    Boolean(bool),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Positional coordinate of another node
    Path(Dna),

    /// Reference to another node in the same tree
    Node(NodeId),

    /// Expression text, expanded by reference expressions
    Expression(String),
}

/// A value that could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionError {
    pub type_name: String,
    pub value: String,
    pub reason: String,
}

impl ConversionError {
    fn new(type_name: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ConversionError {
            type_name: type_name.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cannot convert '{}' to '{}': {}",
            self.value, self.type_name, self.reason
        )
    }
}

impl std::error::Error for ConversionError {}

impl Value {
    /// Parses `text` as a value of the named type.
    pub fn from_typed(type_name: &str, text: &str) -> Result<Value, ConversionError> {
        Value::String(text.to_string()).cast(type_name)
    }

    /// Name used for this variant in typed values and outlines.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "int",
            Value::Float(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::Boolean(_) => "bool",
            Value::Bytes(_) => "blob",
            Value::Path(_) => "path",
            Value::Node(_) => "node",
            Value::Expression(_) => "x",
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::Decimal(d) => d.to_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get as integer. Fractional numbers do not convert.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(n) if n.fract() == 0.0 => n.to_i64(),
            Value::Decimal(d) if d.fract().is_zero() => d.to_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text form of the value, as matched by value regexes.
    pub fn as_string(&self) -> String {
        match self {
            Value::String(s) | Value::Expression(s) => s.clone(),
            Value::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            other => other.to_string(),
        }
    }

    /// Converts the value to the named type.
    pub fn cast(&self, type_name: &str) -> Result<Value, ConversionError> {
        let text = self.as_string();
        let fail = |reason: &str| ConversionError::new(type_name, text.clone(), reason);

        match type_name {
            "string" => Ok(Value::String(text.clone())),
            "int" | "long" => self
                .as_int()
                .map(Value::Integer)
                .ok_or_else(|| fail("not an integer")),
            "float" | "double" => self
                .as_float()
                .map(Value::Float)
                .ok_or_else(|| fail("not a number")),
            "decimal" => match self {
                Value::Decimal(d) => Ok(Value::Decimal(*d)),
                Value::Integer(n) => Ok(Value::Decimal(Decimal::from(*n))),
                Value::Float(n) => Decimal::from_f64(*n)
                    .map(Value::Decimal)
                    .ok_or_else(|| fail("not representable as a decimal")),
                Value::String(s) => Decimal::from_str(s.trim())
                    .map(Value::Decimal)
                    .map_err(|e| fail(&e.to_string())),
                _ => Err(fail("not a number")),
            },
            "bool" => match self {
                Value::Boolean(b) => Ok(Value::Boolean(*b)),
                Value::String(s) => match s.trim() {
                    "true" => Ok(Value::Boolean(true)),
                    "false" => Ok(Value::Boolean(false)),
                    _ => Err(fail("expected 'true' or 'false'")),
                },
                _ => Err(fail("not a boolean")),
            },
            "path" => match self {
                Value::Path(dna) => Ok(Value::Path(dna.clone())),
                Value::String(s) => s
                    .parse::<Dna>()
                    .map(Value::Path)
                    .map_err(|e| fail(&e.to_string())),
                _ => Err(fail("not a node path")),
            },
            "x" => match self {
                Value::Expression(s) | Value::String(s) => Ok(Value::Expression(s.clone())),
                _ => Err(fail("not an expression")),
            },
            _ => Err(fail("unknown type")),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::Expression(s) => write!(f, "{}", s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Bytes(bytes) => write!(f, "{} bytes", bytes.len()),
            Value::Path(dna) => write!(f, "{}", dna),
            Value::Node(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}
