//! Binding environment for one match
//!
//! Maps variable names to what they resolved to. An environment is owned
//! by a single match call and passed explicitly; there is no shared table.

use std::collections::BTreeMap;
use std::fmt;

use datashape_ast::dim::Dim;
use datashape_ast::dtype::DType;
use tracing::trace;

use crate::error::{MatchError, MatchResult};

/// What a variable is bound to
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A single non-fixed dimension (`var`, `strided`, ...)
    Dim(Dim),
    /// A fixed dimension of this size
    Size(u64),
    /// The dimensions absorbed by a named ellipsis
    Dims(Vec<Dim>),
    DType(DType),
}

impl Binding {
    /// Fixed dimensions are recorded as sizes
    pub fn from_dim(dim: &Dim) -> Self {
        match dim {
            Dim::Fixed(n) => Binding::Size(*n),
            other => Binding::Dim(other.clone()),
        }
    }

    fn normalize(self) -> Self {
        match self {
            Binding::Dim(Dim::Fixed(n)) => Binding::Size(n),
            other => other,
        }
    }

    /// Short name of the binding category, for diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            Binding::Dim(_) | Binding::Size(_) => "dimension",
            Binding::Dims(_) => "dimension sequence",
            Binding::DType(_) => "dtype",
        }
    }

    /// The binding as a single dimension, if it is one
    pub fn as_dim(&self) -> Option<Dim> {
        match self {
            Binding::Dim(dim) => Some(dim.clone()),
            Binding::Size(n) => Some(Dim::Fixed(*n)),
            Binding::Dims(_) | Binding::DType(_) => None,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Dim(dim) => write!(f, "{}", dim),
            Binding::Size(n) => write!(f, "{}", n),
            Binding::Dims(dims) => {
                write!(f, "[")?;
                for (i, dim) in dims.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", dim)?;
                }
                write!(f, "]")
            }
            Binding::DType(dtype) => write!(f, "{}", dtype),
        }
    }
}

/// Variable bindings accumulated during a match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    bindings: BTreeMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    /// Single-dimension binding of `name`
    pub fn dim(&self, name: &str) -> Option<Dim> {
        self.get(name).and_then(Binding::as_dim)
    }

    /// Size bound to `name`, if it was bound to a fixed dimension
    pub fn size(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(Binding::Size(n)) => Some(*n),
            _ => None,
        }
    }

    /// Dimensions absorbed by the ellipsis `name`
    pub fn dims(&self, name: &str) -> Option<&[Dim]> {
        match self.get(name) {
            Some(Binding::Dims(dims)) => Some(dims),
            _ => None,
        }
    }

    pub fn dtype(&self, name: &str) -> Option<&DType> {
        match self.get(name) {
            Some(Binding::DType(dtype)) => Some(dtype),
            _ => None,
        }
    }

    /// Bind `name`, or check that an existing binding agrees.
    ///
    /// Rebinding to a structurally equal value is a no-op. A different
    /// value fails with [`MatchError::ConflictingBinding`] and leaves the
    /// environment unchanged.
    pub fn bind(&mut self, name: &str, binding: Binding) -> MatchResult<()> {
        let binding = binding.normalize();
        match self.bindings.get(name) {
            Some(previous) if *previous == binding => Ok(()),
            Some(previous) => Err(MatchError::ConflictingBinding {
                name: name.to_string(),
                previous: previous.clone(),
                found: binding,
            }),
            None => {
                trace!(name, binding = %binding, "bind");
                self.bindings.insert(name.to_string(), binding);
                Ok(())
            }
        }
    }

    /// Combine with the bindings of another match.
    ///
    /// Shared names must agree; on conflict neither input is modified.
    pub fn merge(&self, other: &Environment) -> MatchResult<Environment> {
        let mut merged = self.clone();
        for (name, binding) in other.iter() {
            merged.bind(name, binding.clone())?;
        }
        Ok(merged)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, binding)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", name, binding)?;
        }
        write!(f, "}}")
    }
}
