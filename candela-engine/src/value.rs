//! Loosely-typed values exchanged with the bridge's named sub-objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value carried by a bridge sub-object property.
///
/// The bridge exposes its tuning knobs as named properties on named
/// sub-objects rather than as a fixed struct, so the value type has to stay
/// dynamic. Serialization is untagged: a property reads back as the bare
/// JSON scalar it looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    /// Parse user input into the narrowest matching variant.
    ///
    /// Tries bool, then integer, then float; anything else is text. Never
    /// fails, which is the right shape for command-line `--set` input.
    pub fn parse(raw: &str) -> Self {
        if let Ok(b) = raw.parse::<bool>() {
            return Self::Bool(b);
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Self::Float(f);
        }
        Self::Text(raw.to_string())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view; integers promote to float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(t) => write!(f, "{}", t),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_narrows_to_first_match() {
        assert_eq!(PropertyValue::parse("true"), PropertyValue::Bool(true));
        assert_eq!(PropertyValue::parse("42"), PropertyValue::Int(42));
        assert_eq!(PropertyValue::parse("-7"), PropertyValue::Int(-7));
        assert_eq!(PropertyValue::parse("0.5"), PropertyValue::Float(0.5));
        assert_eq!(
            PropertyValue::parse("fast"),
            PropertyValue::Text("fast".to_string())
        );
    }

    #[test]
    fn test_float_view_promotes_ints() {
        assert_eq!(PropertyValue::Int(3).as_float(), Some(3.0));
        assert_eq!(PropertyValue::Float(0.25).as_float(), Some(0.25));
        assert_eq!(PropertyValue::Bool(true).as_float(), None);
    }

    #[test]
    fn test_serde_is_untagged() {
        let v: PropertyValue = serde_json::from_str("2097152").unwrap();
        assert_eq!(v, PropertyValue::Int(2097152));
        assert_eq!(serde_json::to_string(&v).unwrap(), "2097152");

        let v: PropertyValue = serde_json::from_str("\"nearest\"").unwrap();
        assert_eq!(v, PropertyValue::Text("nearest".to_string()));
    }
}
