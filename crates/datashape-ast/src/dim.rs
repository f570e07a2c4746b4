//! Dimension types

use serde::{Deserialize, Serialize};

use crate::error::{check_var_name, ModelResult};

/// One axis of a datashape
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dim {
    /// Statically known extent: `4`
    Fixed(u64),

    /// Extent varies per element (ragged): `var`
    Var,

    /// Extent fixed per array instance but unknown to the type: `strided`
    Strided,

    /// Placeholder for exactly one dimension: `N`
    TypeVar(Box<str>),

    /// Zero or more consecutive dimensions: `...` or `Dims...`
    ///
    /// Anonymous ellipses never bind.
    Ellipsis(Option<Box<str>>),
}

impl Dim {
    pub fn fixed(n: u64) -> Self {
        Dim::Fixed(n)
    }

    pub fn var() -> Self {
        Dim::Var
    }

    pub fn strided() -> Self {
        Dim::Strided
    }

    pub fn typevar(name: impl Into<Box<str>>) -> Self {
        Dim::TypeVar(name.into())
    }

    pub fn ellipsis() -> Self {
        Dim::Ellipsis(None)
    }

    pub fn named_ellipsis(name: impl Into<Box<str>>) -> Self {
        Dim::Ellipsis(Some(name.into()))
    }

    pub fn is_ellipsis(&self) -> bool {
        matches!(self, Dim::Ellipsis(_))
    }

    /// Name of the variable this dimension introduces, if any
    pub fn var_name(&self) -> Option<&str> {
        match self {
            Dim::TypeVar(name) | Dim::Ellipsis(Some(name)) => Some(name),
            _ => None,
        }
    }

    /// No type variable and no ellipsis
    pub fn is_concrete(&self) -> bool {
        matches!(self, Dim::Fixed(_) | Dim::Var | Dim::Strided)
    }

    pub(crate) fn validate(&self) -> ModelResult<()> {
        match self.var_name() {
            Some(name) => check_var_name(name),
            None => Ok(()),
        }
    }
}

impl From<u64> for Dim {
    fn from(n: u64) -> Self {
        Dim::Fixed(n)
    }
}
