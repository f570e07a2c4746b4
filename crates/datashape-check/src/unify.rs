//! Matching a concrete type against a pattern
//!
//! The pattern may contain type variables and at most one ellipsis per
//! dimension sequence. The concrete side is compared structurally.
//!
//! # Dimension sequences
//!
//! The pattern splits at its ellipsis into a prefix and a suffix. The
//! prefix matches the leading concrete dimensions left to right, the
//! suffix matches the trailing ones right to left, and whatever is left in
//! the middle (possibly nothing) belongs to the ellipsis:
//!
//! ```text
//! pattern   M  *  N...       * int32
//! concrete  2  *  3  *  4    * int32
//!           M=2   N=[3, 4]
//! ```

use datashape_ast::dim::Dim;
use datashape_ast::dtype::DType;
use datashape_ast::types::Type;
use datashape_ast::MalformedType;
use tracing::debug;

use crate::env::{Binding, Environment};
use crate::error::{MatchError, MatchResult};

/// Match `concrete` against `pattern`, extending a copy of `env`.
///
/// On failure the copy is dropped; `env` itself is never modified.
pub fn match_type(pattern: &Type, concrete: &Type, env: &Environment) -> MatchResult<Environment> {
    let mut scratch = env.clone();
    match match_into(pattern, concrete, &mut scratch) {
        Ok(()) => Ok(scratch),
        Err(err) => {
            debug!(pattern = %pattern, concrete = %concrete, error = %err, "match failed");
            Err(err)
        }
    }
}

/// Match in place. On error `env` may hold bindings from the part that
/// matched; callers that need atomicity use [`match_type`].
pub(crate) fn match_into(pattern: &Type, concrete: &Type, env: &mut Environment) -> MatchResult<()> {
    match_dims(pattern.dims(), concrete.dims(), env)?;
    match_dtype(pattern.dtype(), concrete.dtype(), env)
}

/// Match two dimension sequences
pub(crate) fn match_dims(pattern: &[Dim], concrete: &[Dim], env: &mut Environment) -> MatchResult<()> {
    let count = pattern.iter().filter(|d| d.is_ellipsis()).count();
    if count > 1 {
        return Err(MalformedType::MultipleEllipses { count }.into());
    }

    let (prefix, ellipsis, suffix) = match pattern.iter().position(Dim::is_ellipsis) {
        Some(i) => (&pattern[..i], Some(&pattern[i]), &pattern[i + 1..]),
        None => (pattern, None, &[][..]),
    };

    let required = prefix.len() + suffix.len();
    let arity_ok = match ellipsis {
        Some(_) => concrete.len() >= required,
        None => concrete.len() == required,
    };
    if !arity_ok {
        return Err(MatchError::ArityMismatch {
            what: "dimensions",
            expected: required,
            found: concrete.len(),
            at_least: ellipsis.is_some(),
        });
    }

    for (p, c) in prefix.iter().zip(concrete) {
        match_dim(p, c, env)?;
    }
    for (p, c) in suffix.iter().rev().zip(concrete.iter().rev()) {
        match_dim(p, c, env)?;
    }

    if let Some(Dim::Ellipsis(Some(name))) = ellipsis {
        let middle = &concrete[prefix.len()..concrete.len() - suffix.len()];
        env.bind(name, Binding::Dims(middle.to_vec()))?;
    }
    Ok(())
}

fn match_dim(pattern: &Dim, concrete: &Dim, env: &mut Environment) -> MatchResult<()> {
    match (pattern, concrete) {
        (Dim::TypeVar(name), _) => env.bind(name, Binding::from_dim(concrete)),

        (Dim::Fixed(expected), Dim::Fixed(found)) => {
            if expected == found {
                Ok(())
            } else {
                Err(MatchError::size_mismatch(expected, found))
            }
        }

        (Dim::Var, Dim::Var) | (Dim::Strided, Dim::Strided) => Ok(()),

        _ => Err(MatchError::kind_mismatch(pattern, concrete)),
    }
}

/// Match two dtypes structurally
pub(crate) fn match_dtype(pattern: &DType, concrete: &DType, env: &mut Environment) -> MatchResult<()> {
    match (pattern, concrete) {
        (DType::TypeVar(name), _) => env.bind(name, Binding::DType(concrete.clone())),

        // Widths are part of the kind: int32 and int64 are different scalars
        (DType::Int(a), DType::Int(b)) | (DType::UInt(a), DType::UInt(b)) if a == b => Ok(()),
        (DType::Float(a), DType::Float(b)) if a == b => Ok(()),
        (DType::Decimal(a), DType::Decimal(b)) if a == b => Ok(()),

        (DType::Bool, DType::Bool)
        | (DType::Bignum, DType::Bignum)
        | (DType::Void, DType::Void)
        | (DType::Char, DType::Char)
        | (DType::Json, DType::Json)
        | (DType::Date, DType::Date) => Ok(()),

        (DType::Complex(p), DType::Complex(c)) | (DType::Option(p), DType::Option(c)) => {
            match_dtype(p, c, env)
        }

        (
            DType::String { size: ps, encoding: pe },
            DType::String { size: cs, encoding: ce },
        ) => same_params(ps == cs && pe == ce, pattern, concrete),

        (DType::Bytes { size: ps }, DType::Bytes { size: cs }) => same_params(ps == cs, pattern, concrete),

        (DType::Time { tz: pt }, DType::Time { tz: ct })
        | (DType::DateTime { tz: pt }, DType::DateTime { tz: ct }) => same_params(pt == ct, pattern, concrete),

        (
            DType::Categorical { base: pb, values: pv },
            DType::Categorical { base: cb, values: cv },
        ) => {
            match_dtype(pb, cb, env)?;
            same_params(pv == cv, pattern, concrete)
        }

        (
            DType::Units { unit: pu, storage: ps },
            DType::Units { unit: cu, storage: cs },
        ) => {
            same_params(pu == cu, pattern, concrete)?;
            match_dtype(ps, cs, env)
        }

        (DType::Struct(pf), DType::Struct(cf)) => {
            if pf.len() != cf.len() {
                return Err(MatchError::arity("struct fields", pf.len(), cf.len()));
            }
            for (p, c) in pf.iter().zip(cf) {
                if p.name != c.name {
                    return Err(MatchError::kind_mismatch(
                        format!("field {}", p.name),
                        format!("field {}", c.name),
                    ));
                }
                match_into(&p.ty, &c.ty, env)?;
            }
            Ok(())
        }

        (DType::Tuple(pe), DType::Tuple(ce)) => match_all("tuple elements", pe, ce, env),

        (DType::FuncProto(p), DType::FuncProto(c)) => {
            match_all("function arguments", &p.args, &c.args, env)?;
            match_into(&p.ret, &c.ret, env)
        }

        (DType::Pointer(p), DType::Pointer(c)) => match_into(p, c, env),

        _ => Err(MatchError::kind_mismatch(pattern, concrete)),
    }
}

fn match_all(what: &'static str, patterns: &[Type], concretes: &[Type], env: &mut Environment) -> MatchResult<()> {
    if patterns.len() != concretes.len() {
        return Err(MatchError::arity(what, patterns.len(), concretes.len()));
    }
    for (p, c) in patterns.iter().zip(concretes) {
        match_into(p, c, env)?;
    }
    Ok(())
}

/// Parameters outside the kind must be equal exactly, no coercion
fn same_params(equal: bool, pattern: &DType, concrete: &DType) -> MatchResult<()> {
    if equal {
        Ok(())
    } else {
        Err(MatchError::size_mismatch(pattern, concrete))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datashape_ast::units::Unit;

    fn ty(dims: Vec<Dim>, dtype: DType) -> Type {
        Type::new(dims, dtype).unwrap()
    }

    fn scalar(dtype: DType) -> Type {
        Type::scalar(dtype).unwrap()
    }

    fn fixed(sizes: &[u64]) -> Vec<Dim> {
        sizes.iter().copied().map(Dim::Fixed).collect()
    }

    #[test]
    fn test_exact_match_binds_nothing() {
        let t = ty(fixed(&[4]), DType::int32());
        let env = match_type(&t, &t, &Environment::new()).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_fixed_size_mismatch() {
        let err = match_type(&ty(fixed(&[4]), DType::int32()), &ty(fixed(&[5]), DType::int32()), &Environment::new())
            .unwrap_err();
        assert_eq!(err, MatchError::size_mismatch(4, 5));
    }

    #[test]
    fn test_dtype_width_is_kind() {
        let err = match_type(&ty(fixed(&[4]), DType::int32()), &ty(fixed(&[4]), DType::int64()), &Environment::new())
            .unwrap_err();
        assert_eq!(err, MatchError::kind_mismatch("int32", "int64"));
    }

    #[test]
    fn test_var_and_strided() {
        let env = Environment::new();
        assert!(match_type(&ty(vec![Dim::var()], DType::bool()), &ty(vec![Dim::var()], DType::bool()), &env).is_ok());
        assert!(match_type(&ty(vec![Dim::strided()], DType::bool()), &ty(vec![Dim::strided()], DType::bool()), &env).is_ok());

        let err = match_type(&ty(vec![Dim::var()], DType::bool()), &ty(fixed(&[3]), DType::bool()), &env).unwrap_err();
        assert_eq!(err, MatchError::kind_mismatch("var", "3"));
    }

    #[test]
    fn test_typevar_dims() {
        let pattern = ty(vec![Dim::typevar("N"), Dim::typevar("N")], DType::float64());
        let env = match_type(&pattern, &ty(fixed(&[3, 3]), DType::float64()), &Environment::new()).unwrap();
        assert_eq!(env.size("N"), Some(3));

        let err = match_type(&pattern, &ty(fixed(&[3, 4]), DType::float64()), &Environment::new()).unwrap_err();
        assert!(matches!(err, MatchError::ConflictingBinding { ref name, .. } if name == "N"));

        let env = match_type(&pattern, &ty(vec![Dim::var(), Dim::var()], DType::float64()), &Environment::new()).unwrap();
        assert_eq!(env.dim("N"), Some(Dim::Var));
    }

    #[test]
    fn test_arity_without_ellipsis() {
        let err = match_type(&ty(fixed(&[2, 3]), DType::int8()), &ty(fixed(&[2]), DType::int8()), &Environment::new())
            .unwrap_err();
        assert_eq!(err, MatchError::arity("dimensions", 2, 1));
    }

    #[test]
    fn test_ellipsis_prefix_and_suffix() {
        let pattern = ty(vec![Dim::typevar("A"), Dim::named_ellipsis("Mid"), Dim::typevar("Z")], DType::int32());
        let env = match_type(&pattern, &ty(fixed(&[1, 2, 3, 4]), DType::int32()), &Environment::new()).unwrap();
        assert_eq!(env.size("A"), Some(1));
        assert_eq!(env.dims("Mid"), Some(&fixed(&[2, 3])[..]));
        assert_eq!(env.size("Z"), Some(4));
    }

    #[test]
    fn test_ellipsis_may_be_empty() {
        let pattern = ty(vec![Dim::typevar("M"), Dim::named_ellipsis("N")], DType::int32());
        let env = match_type(&pattern, &ty(fixed(&[7]), DType::int32()), &Environment::new()).unwrap();
        assert_eq!(env.dims("N"), Some(&[][..]));

        let err = match_type(&pattern, &scalar(DType::int32()), &Environment::new()).unwrap_err();
        assert_eq!(
            err,
            MatchError::ArityMismatch { what: "dimensions", expected: 1, found: 0, at_least: true }
        );
    }

    #[test]
    fn test_anonymous_ellipsis_does_not_bind() {
        let pattern = ty(vec![Dim::ellipsis()], DType::typevar("T"));
        let env = match_type(&pattern, &ty(vec![Dim::var(), Dim::fixed(2)], DType::uint8()), &Environment::new()).unwrap();
        assert_eq!(env.len(), 1);
        assert_eq!(env.dtype("T"), Some(&DType::uint8()));
    }

    #[test]
    fn test_named_ellipsis_consistency() {
        let mut env = Environment::new();
        env.bind("B", Binding::Dims(fixed(&[2, 2]))).unwrap();
        let pattern = ty(vec![Dim::named_ellipsis("B"), Dim::fixed(3)], DType::int32());

        assert!(match_type(&pattern, &ty(fixed(&[2, 2, 3]), DType::int32()), &env).is_ok());
        let err = match_type(&pattern, &ty(fixed(&[2, 3]), DType::int32()), &env).unwrap_err();
        assert!(matches!(err, MatchError::ConflictingBinding { .. }));
    }

    #[test]
    fn test_failed_match_keeps_env() {
        let mut env = Environment::new();
        env.bind("T", Binding::DType(DType::int32())).unwrap();
        let pattern = ty(vec![Dim::typevar("N")], DType::typevar("T"));

        assert!(match_type(&pattern, &ty(fixed(&[3]), DType::int64()), &env).is_err());
        assert_eq!(env.len(), 1);
        assert!(!env.contains("N"));
    }

    #[test]
    fn test_multiple_ellipses_in_raw_slice() {
        let mut env = Environment::new();
        let err = match_dims(&[Dim::ellipsis(), Dim::ellipsis()], &fixed(&[1]), &mut env).unwrap_err();
        assert_eq!(err, MatchError::Malformed(MalformedType::MultipleEllipses { count: 2 }));
    }

    #[test]
    fn test_struct_matching() {
        let int32 = scalar(DType::int32());
        let pattern = scalar(DType::record([("a", scalar(DType::typevar("T"))), ("b", int32.clone())]).unwrap());
        let concrete = scalar(DType::record([("a", scalar(DType::float32())), ("b", int32.clone())]).unwrap());
        let env = match_type(&pattern, &concrete, &Environment::new()).unwrap();
        assert_eq!(env.dtype("T"), Some(&DType::float32()));

        let swapped = scalar(DType::record([("b", int32.clone()), ("a", scalar(DType::float32()))]).unwrap());
        let err = match_type(&pattern, &swapped, &Environment::new()).unwrap_err();
        assert!(matches!(err, MatchError::KindMismatch { .. }));

        let short = scalar(DType::record([("a", int32)]).unwrap());
        let err = match_type(&pattern, &short, &Environment::new()).unwrap_err();
        assert_eq!(err, MatchError::arity("struct fields", 2, 1));
    }

    #[test]
    fn test_tuple_and_func_arity() {
        let pattern = scalar(DType::tuple(vec![scalar(DType::typevar("T")), scalar(DType::typevar("T"))]));
        let pair = scalar(DType::tuple(vec![scalar(DType::char()), scalar(DType::char())]));
        let triple = scalar(DType::tuple(vec![scalar(DType::char()); 3]));
        assert!(match_type(&pattern, &pair, &Environment::new()).is_ok());
        assert_eq!(
            match_type(&pattern, &triple, &Environment::new()).unwrap_err(),
            MatchError::arity("tuple elements", 2, 3)
        );

        let unary = scalar(DType::func(vec![scalar(DType::typevar("A"))], scalar(DType::typevar("A"))));
        let binary = scalar(DType::func(vec![scalar(DType::int8()), scalar(DType::int8())], scalar(DType::int8())));
        assert_eq!(
            match_type(&unary, &binary, &Environment::new()).unwrap_err(),
            MatchError::arity("function arguments", 1, 2)
        );
    }

    #[test]
    fn test_parametric_fields_are_sizes() {
        let env = Environment::new();
        let cases = [
            (DType::fixed_string(8), DType::fixed_string(16)),
            (DType::fixed_bytes(4), DType::bytes()),
            (DType::time_tz("UTC"), DType::time()),
            (DType::datetime_tz("UTC"), DType::datetime_tz("Europe/Paris")),
            (DType::units(Unit::Second), DType::units(Unit::Meter)),
        ];
        for (p, c) in cases {
            let err = match_type(&scalar(p), &scalar(c), &env).unwrap_err();
            assert!(matches!(err, MatchError::SizeMismatch { .. }), "{}", err);
        }
    }

    #[test]
    fn test_categorical_values() {
        let lo_hi = DType::categorical(DType::string(), vec!["lo".into(), "hi".into()]).unwrap();
        let hi_lo = DType::categorical(DType::string(), vec!["hi".into(), "lo".into()]).unwrap();
        let other = DType::categorical(DType::string(), vec!["lo".into()]).unwrap();
        let env = Environment::new();
        assert!(match_type(&scalar(lo_hi.clone()), &scalar(hi_lo), &env).is_ok());
        assert!(matches!(
            match_type(&scalar(lo_hi), &scalar(other), &env).unwrap_err(),
            MatchError::SizeMismatch { .. }
        ));
    }

    #[test]
    fn test_nested_typevars_recurse() {
        let pattern = scalar(DType::option(DType::complex(DType::typevar("F")).unwrap()));
        let concrete = scalar(DType::option(DType::complex64()));
        let env = match_type(&pattern, &concrete, &Environment::new()).unwrap();
        assert_eq!(env.dtype("F"), Some(&DType::float32()));

        let ptr_pattern = scalar(DType::pointer(ty(vec![Dim::typevar("N")], DType::typevar("T"))));
        let ptr = scalar(DType::pointer(ty(fixed(&[8]), DType::uint8())));
        let env = match_type(&ptr_pattern, &ptr, &Environment::new()).unwrap();
        assert_eq!(env.size("N"), Some(8));
    }

    #[test]
    fn test_units_storage_binds() {
        let pattern = scalar(DType::units_with(Unit::Second, DType::typevar("S")));
        let concrete = scalar(DType::units_with(Unit::Second, DType::int64()));
        let env = match_type(&pattern, &concrete, &Environment::new()).unwrap();
        assert_eq!(env.dtype("S"), Some(&DType::int64()));
    }
}
