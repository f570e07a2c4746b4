//! Literal values carried by categorical types

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Literal values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),

    /// Totally ordered so categorical sets can hash their members
    Float(OrderedFloat<f64>),

    String(Box<str>),

    Bool(bool),
}

impl Literal {
    pub fn int(n: impl Into<i64>) -> Self {
        Literal::Int(n.into())
    }

    pub fn float(f: f64) -> Self {
        Literal::Float(OrderedFloat(f))
    }

    pub fn string(s: impl Into<Box<str>>) -> Self {
        Literal::String(s.into())
    }

    pub fn bool(b: bool) -> Self {
        Literal::Bool(b)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Literal::Int(_) | Literal::Float(_))
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(n.into())
    }
}

impl From<f64> for Literal {
    fn from(f: f64) -> Self {
        Literal::float(f)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.into())
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}
