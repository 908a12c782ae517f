//! Attribute values carried by arrays and collections.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute map, ordered for deterministic output.
pub type Attrs = BTreeMap<String, AttrValue>;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Text value.
    Str(String),
    /// Scalar numeric value.
    Num(f64),
    /// Numeric vector value.
    Nums(Vec<f64>),
}

impl AttrValue {
    /// Returns the scalar value, or the first element of a vector.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Num(v) => Some(*v),
            AttrValue::Nums(v) => v.first().copied(),
            AttrValue::Str(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) => f.write_str(s),
            AttrValue::Num(v) => write!(f, "{v}"),
            AttrValue::Nums(v) => {
                let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Num(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Num(f64::from(v))
    }
}

impl From<u8> for AttrValue {
    fn from(v: u8) -> Self {
        AttrValue::Num(f64::from(v))
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        AttrValue::Nums(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_views() {
        assert_eq!(AttrValue::Num(-9999.0).as_f64(), Some(-9999.0));
        assert_eq!(AttrValue::Nums(vec![1.0e15, 2.0]).as_f64(), Some(1.0e15));
        assert_eq!(AttrValue::from("1e15").as_f64(), Some(1.0e15));
        assert_eq!(AttrValue::from("K").as_f64(), None);
    }

    #[test]
    fn display() {
        assert_eq!(AttrValue::from("inst3").to_string(), "inst3");
        assert_eq!(AttrValue::Nums(vec![1.0, 2.5]).to_string(), "[1, 2.5]");
    }
}
