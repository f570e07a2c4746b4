//! Matching errors
//!
//! Every failure is a typed value. A failed match leaves no partial
//! bindings behind, so callers can recover by trying another pattern.

use datashape_ast::MalformedType;
use thiserror::Error;

use crate::env::Binding;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Arity mismatch in {what}: expected {}{expected}, found {found}", min_prefix(.at_least))]
    ArityMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
        /// The pattern has an ellipsis, so `expected` is a lower bound
        at_least: bool,
    },

    #[error("Kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: String, found: String },

    #[error("Size mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: String, found: String },

    #[error("Conflicting binding for {name}: bound to {previous}, now {found}")]
    ConflictingBinding {
        name: String,
        previous: Binding,
        found: Binding,
    },

    #[error("Unbound variable: {0}")]
    UnboundVariable(String),

    #[error("No overload matches the arguments ({} candidates tried)", .errors.len())]
    NoMatchingOverload { errors: Vec<MatchError> },

    #[error(transparent)]
    Malformed(#[from] MalformedType),
}

fn min_prefix(at_least: &bool) -> &'static str {
    if *at_least {
        "at least "
    } else {
        ""
    }
}

pub type MatchResult<T> = Result<T, MatchError>;

/// Error category without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArityMismatch,
    KindMismatch,
    SizeMismatch,
    ConflictingBinding,
    UnboundVariable,
    NoMatchingOverload,
    MalformedType,
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            MatchError::KindMismatch { .. } => ErrorKind::KindMismatch,
            MatchError::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            MatchError::ConflictingBinding { .. } => ErrorKind::ConflictingBinding,
            MatchError::UnboundVariable(_) => ErrorKind::UnboundVariable,
            MatchError::NoMatchingOverload { .. } => ErrorKind::NoMatchingOverload,
            MatchError::Malformed(_) => ErrorKind::MalformedType,
        }
    }

    pub fn kind_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        MatchError::KindMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn size_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        MatchError::SizeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn arity(what: &'static str, expected: usize, found: usize) -> Self {
        MatchError::ArityMismatch { what, expected, found, at_least: false }
    }
}
