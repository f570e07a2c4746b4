//! Substituting bindings into types

use datashape_ast::dim::Dim;
use datashape_ast::dtype::{DType, Field, FuncProto};
use datashape_ast::types::Type;
use tracing::debug;

use crate::env::{Binding, Environment};
use crate::error::{MatchError, MatchResult};

/// What to do with variables the environment does not bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Leave them in place
    Partial,
    /// Fail with [`MatchError::UnboundVariable`]
    Full,
}

/// Replace bound variables with their bindings.
///
/// The input is never modified; substituting twice with the same
/// environment gives the same result.
pub trait Substitute: Sized {
    fn substitute(&self, env: &Environment, mode: Resolution) -> MatchResult<Self>;
}

impl Substitute for Type {
    fn substitute(&self, env: &Environment, mode: Resolution) -> MatchResult<Self> {
        let mut dims = Vec::with_capacity(self.ndim());
        for dim in self.dims() {
            substitute_dim(dim, env, mode, &mut dims)?;
        }
        let dtype = self.dtype().substitute(env, mode)?;
        // A splice can introduce a second ellipsis
        Ok(Type::new(dims, dtype)?)
    }
}

impl Substitute for DType {
    fn substitute(&self, env: &Environment, mode: Resolution) -> MatchResult<Self> {
        let dtype = match self {
            DType::TypeVar(name) => match env.get(name) {
                Some(Binding::DType(bound)) => bound.clone(),
                Some(other) => return Err(wrong_category(name, "dtype", other)),
                None => unbound(name, mode, || self.clone())?,
            },

            DType::Complex(inner) => DType::Complex(Box::new(inner.substitute(env, mode)?)),
            DType::Option(inner) => DType::Option(Box::new(inner.substitute(env, mode)?)),
            DType::Categorical { base, values } => DType::Categorical {
                base: Box::new(base.substitute(env, mode)?),
                values: values.clone(),
            },
            DType::Units { unit, storage } => DType::Units {
                unit: *unit,
                storage: Box::new(storage.substitute(env, mode)?),
            },

            DType::Struct(fields) => DType::Struct(
                fields
                    .iter()
                    .map(|f| f.ty.substitute(env, mode).map(|ty| Field::new(f.name.clone(), ty)))
                    .collect::<MatchResult<_>>()?,
            ),
            DType::Tuple(elements) => DType::Tuple(substitute_all(elements, env, mode)?),
            DType::FuncProto(proto) => DType::FuncProto(FuncProto::new(
                substitute_all(&proto.args, env, mode)?,
                proto.ret.substitute(env, mode)?,
            )),
            DType::Pointer(target) => DType::Pointer(Box::new(target.substitute(env, mode)?)),

            DType::Bool
            | DType::Int(_)
            | DType::UInt(_)
            | DType::Float(_)
            | DType::Decimal(_)
            | DType::Bignum
            | DType::Void
            | DType::Char
            | DType::String { .. }
            | DType::Bytes { .. }
            | DType::Json
            | DType::Date
            | DType::Time { .. }
            | DType::DateTime { .. } => self.clone(),
        };
        // Binding a complex inner or categorical base can break an invariant
        dtype.validate()?;
        Ok(dtype)
    }
}

fn substitute_all(types: &[Type], env: &Environment, mode: Resolution) -> MatchResult<Vec<Type>> {
    types.iter().map(|ty| ty.substitute(env, mode)).collect()
}

fn substitute_dim(dim: &Dim, env: &Environment, mode: Resolution, out: &mut Vec<Dim>) -> MatchResult<()> {
    match dim {
        Dim::TypeVar(name) => match env.get(name) {
            Some(binding) => match binding.as_dim() {
                Some(bound) => out.push(bound),
                None => return Err(wrong_category(name, "dimension", binding)),
            },
            None => out.push(unbound(name, mode, || dim.clone())?),
        },
        Dim::Ellipsis(Some(name)) => match env.get(name) {
            Some(Binding::Dims(bound)) => out.extend(bound.iter().cloned()),
            Some(other) => return Err(wrong_category(name, "dimension sequence", other)),
            None => out.push(unbound(name, mode, || dim.clone())?),
        },
        Dim::Ellipsis(None) => out.push(unbound("...", mode, || dim.clone())?),
        Dim::Fixed(_) | Dim::Var | Dim::Strided => out.push(dim.clone()),
    }
    Ok(())
}

fn unbound<T>(name: &str, mode: Resolution, keep: impl FnOnce() -> T) -> MatchResult<T> {
    match mode {
        Resolution::Partial => Ok(keep()),
        Resolution::Full => {
            debug!(name, "unbound variable in full substitution");
            Err(MatchError::UnboundVariable(name.to_string()))
        }
    }
}

fn wrong_category(name: &str, expected: &str, found: &Binding) -> MatchError {
    MatchError::kind_mismatch(
        format!("{} for {}", expected, name),
        format!("{} {}", found.category(), found),
    )
}
