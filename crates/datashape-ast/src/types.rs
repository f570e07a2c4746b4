//! Datashapes: dimensions followed by a dtype
//!
//! A [`Type`] can only be obtained through a validating constructor, so
//! every value in circulation satisfies the model invariants:
//! - the dtype is always terminal
//! - at most one ellipsis per dimension sequence
//! - type variable names are a capital followed by alphanumerics or `_`
//! - every nested dtype is itself valid

use serde::{Deserialize, Serialize};

use crate::dim::Dim;
use crate::dtype::{push_var, DType};
use crate::error::{MalformedType, ModelResult};

/// A datashape: `3 * var * int32`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawType")]
pub struct Type {
    dims: Vec<Dim>,
    dtype: DType,
}

/// Unvalidated wire form of [`Type`]
#[derive(Deserialize)]
struct RawType {
    dims: Vec<Dim>,
    dtype: DType,
}

impl TryFrom<RawType> for Type {
    type Error = MalformedType;

    fn try_from(raw: RawType) -> Result<Self, Self::Error> {
        Type::new(raw.dims, raw.dtype)
    }
}

/// One element of a parsed datashape sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Dim(Dim),
    DType(DType),
}

impl From<Dim> for Element {
    fn from(dim: Dim) -> Self {
        Element::Dim(dim)
    }
}

impl From<DType> for Element {
    fn from(dtype: DType) -> Self {
        Element::DType(dtype)
    }
}

// ============ Constructors ============

impl Type {
    pub fn new(dims: Vec<Dim>, dtype: DType) -> ModelResult<Self> {
        for dim in &dims {
            dim.validate()?;
        }
        let count = dims.iter().filter(|d| d.is_ellipsis()).count();
        if count > 1 {
            return Err(MalformedType::MultipleEllipses { count });
        }
        dtype.validate()?;
        Ok(Type { dims, dtype })
    }

    /// A datashape with no dimensions
    pub fn scalar(dtype: DType) -> ModelResult<Self> {
        Type::new(Vec::new(), dtype)
    }

    /// Build from the flat element sequence produced by a parser, e.g.
    /// `[Fixed(3), Var, Int32]` for `3 * var * int32`.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> ModelResult<Self> {
        let mut elements: Vec<Element> = elements.into_iter().collect();
        let dtype = match elements.pop() {
            Some(Element::DType(dtype)) => dtype,
            Some(Element::Dim(_)) | None => return Err(MalformedType::MissingDType),
        };
        let mut dims = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                Element::Dim(dim) => dims.push(dim),
                Element::DType(misplaced) => {
                    return Err(MalformedType::MisplacedDType(misplaced.to_string()))
                }
            }
        }
        Type::new(dims, dtype)
    }
}

// ============ Queries ============

impl Type {
    /// The dimension sequence (the datashape's "shape")
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// The terminal dtype (the datashape's "measure")
    pub fn dtype(&self) -> &DType {
        &self.dtype
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Dim>, DType) {
        (self.dims, self.dtype)
    }

    /// Position of the ellipsis in the dimension sequence
    pub fn ellipsis(&self) -> Option<usize> {
        self.dims.iter().position(Dim::is_ellipsis)
    }

    /// Drop `leading` outer dimensions.
    ///
    /// Returns `None` if the datashape has fewer dimensions than that.
    pub fn subarray(&self, leading: usize) -> Option<Type> {
        if leading > self.dims.len() {
            return None;
        }
        Some(Type {
            dims: self.dims[leading..].to_vec(),
            dtype: self.dtype.clone(),
        })
    }

    /// Signature form: every dimension replaced by a fresh type variable
    /// `I0`, `I1`, ... with the dtype kept.
    ///
    /// Fresh names are not checked against variables already used in the
    /// dtype.
    pub fn sigform(&self) -> Type {
        Type {
            dims: (0..self.dims.len()).map(|i| Dim::typevar(format!("I{}", i))).collect(),
            dtype: self.dtype.clone(),
        }
    }

    /// Type variables and named ellipses in first-occurrence order
    pub fn free_vars(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_vars(&mut vars);
        vars
    }

    pub(crate) fn collect_vars(&self, vars: &mut Vec<String>) {
        for dim in &self.dims {
            if let Some(name) = dim.var_name() {
                push_var(vars, name);
            }
        }
        self.dtype.collect_vars(vars);
    }

    /// Fully resolved: no type variables and no ellipses
    pub fn is_concrete(&self) -> bool {
        self.dims.iter().all(Dim::is_concrete) && self.dtype.is_concrete()
    }

    pub(crate) fn has_anonymous_ellipsis(&self) -> bool {
        self.dims.contains(&Dim::Ellipsis(None)) || self.dtype.has_anonymous_ellipsis()
    }
}
