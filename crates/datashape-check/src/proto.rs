//! Checking arguments against function prototypes
//!
//! ```text
//! (M * N * int32) -> N * int32      applied to      4 * 5 * int32
//!                                   returns         5 * int32
//! ```

use datashape_ast::dtype::FuncProto;
use datashape_ast::types::Type;
use tracing::debug;

use crate::env::Environment;
use crate::error::{MatchError, MatchResult};
use crate::subst::{Resolution, Substitute};
use crate::unify::match_into;

/// Check `args` against `proto` and return the resolved result type
pub fn check_prototype(proto: &FuncProto, args: &[Type]) -> MatchResult<Type> {
    check_prototype_env(proto, args).map(|(_, ret)| ret)
}

/// Like [`check_prototype`], also returning the bindings.
///
/// Arguments are matched in order against one shared environment, so a
/// variable bound by an earlier argument constrains the later ones. The
/// first failing argument ends the check.
pub fn check_prototype_env(proto: &FuncProto, args: &[Type]) -> MatchResult<(Environment, Type)> {
    if proto.arity() != args.len() {
        return Err(MatchError::arity("arguments", proto.arity(), args.len()));
    }

    let mut env = Environment::new();
    for (position, (pattern, arg)) in proto.args.iter().zip(args).enumerate() {
        if let Err(err) = match_into(pattern, arg, &mut env) {
            debug!(position, pattern = %pattern, arg = %arg, error = %err, "argument rejected");
            return Err(err);
        }
    }

    let ret = proto.ret.substitute(&env, Resolution::Full)?;
    Ok((env, ret))
}

/// The overload chosen by [`resolve_overload`]
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Position of the matching prototype in the candidate list
    pub index: usize,
    pub env: Environment,
    pub ret: Type,
}

/// Pick the first prototype that accepts `args`.
///
/// When none does, the error carries each candidate's failure in order.
pub fn resolve_overload(protos: &[FuncProto], args: &[Type]) -> MatchResult<Resolved> {
    let mut errors = Vec::with_capacity(protos.len());
    for (index, proto) in protos.iter().enumerate() {
        match check_prototype_env(proto, args) {
            Ok((env, ret)) => {
                debug!(index, signature = %proto, "overload selected");
                return Ok(Resolved { index, env, ret });
            }
            Err(err) => errors.push(err),
        }
    }
    Err(MatchError::NoMatchingOverload { errors })
}
