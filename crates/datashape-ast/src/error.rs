//! Construction errors
//!
//! Every invariant of the type model is checked when a [`Type`](crate::types::Type)
//! is built. Nothing malformed ever reaches the matcher.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedType {
    #[error("Dimension sequence has {count} ellipses, at most one is allowed")]
    MultipleEllipses { count: usize },

    #[error("Duplicate struct field: {0}")]
    DuplicateField(String),

    #[error("Only dimensions can appear before the last position of a datashape, not {0}")]
    MisplacedDType(String),

    #[error("A datashape must end with a dtype")]
    MissingDType,

    #[error("Complex numbers are built from floats, not {0}")]
    InvalidComplexInner(String),

    #[error("Duplicate categorical value: {0}")]
    DuplicateCategory(String),

    #[error("Categorical type has no values")]
    EmptyCategories,

    #[error("Categorical value {value} does not fit base type {base}")]
    CategoryKind { value: String, base: String },

    #[error("Invalid type variable name {0:?}: expected a capital letter followed by letters, digits or underscores")]
    InvalidVariableName(String),

    #[error("Unsupported {kind} width: {width}")]
    InvalidWidth { kind: &'static str, width: u32 },

    #[error("Unsupported string encoding: {0}")]
    UnknownEncoding(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

pub type ModelResult<T> = Result<T, MalformedType>;

/// Type variable names start with an uppercase letter and continue with
/// alphanumerics or underscores.
pub(crate) fn check_var_name(name: &str) -> ModelResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => first.is_uppercase() && chars.all(|c| c.is_alphanumeric() || c == '_'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(MalformedType::InvalidVariableName(name.to_string()))
    }
}
