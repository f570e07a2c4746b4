//! Data types: the terminal element of every datashape
//!
//! Features:
//! - Sized scalars (bool, signed/unsigned integers, floats, decimals, complex)
//! - Strings and byte blobs with optional fixed size
//! - Categorical types over a set of literal values
//! - Records (structs), tuples and function prototypes
//! - Option, pointer, date/time and physical units
//! - Type variables

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{check_var_name, MalformedType, ModelResult};
use crate::literal::Literal;
use crate::types::Type;
use crate::units::Unit;

macro_rules! bit_width {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident = $bits:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn bits(self) -> u32 {
                match self {
                    $($name::$variant => $bits),+
                }
            }
        }

        impl TryFrom<u32> for $name {
            type Error = MalformedType;

            fn try_from(bits: u32) -> Result<Self, Self::Error> {
                match bits {
                    $($bits => Ok($name::$variant),)+
                    width => Err(MalformedType::InvalidWidth { kind: $kind, width }),
                }
            }
        }
    };
}

bit_width!(
    /// Width of signed and unsigned integers
    IntWidth, "integer", { W8 = 8, W16 = 16, W32 = 32, W64 = 64, W128 = 128 }
);

bit_width!(
    /// Width of binary floating point numbers
    FloatWidth, "float", { W16 = 16, W32 = 32, W64 = 64, W128 = 128 }
);

bit_width!(
    /// Width of decimal floating point numbers
    DecimalWidth, "decimal", { W32 = 32, W64 = 64, W128 = 128 }
);

/// Character encoding of a string dtype
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    Ascii,
    #[default]
    Utf8,
    Utf16,
    Utf32,
}

impl Encoding {
    /// Short canonical spelling: `A`, `U8`, `U16`, `U32`
    pub fn canonical_name(self) -> &'static str {
        match self {
            Encoding::Ascii => "A",
            Encoding::Utf8 => "U8",
            Encoding::Utf16 => "U16",
            Encoding::Utf32 => "U32",
        }
    }
}

impl FromStr for Encoding {
    type Err = MalformedType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "ascii" => Ok(Encoding::Ascii),
            "U8" | "utf-8" | "utf_8" | "utf8" => Ok(Encoding::Utf8),
            "U16" | "utf-16" | "utf_16" | "utf16" => Ok(Encoding::Utf16),
            "U32" | "utf-32" | "utf_32" | "utf32" => Ok(Encoding::Utf32),
            _ => Err(MalformedType::UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// A named field of a struct dtype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: Box<str>,
    pub ty: Type,
}

impl Field {
    pub fn new(name: impl Into<Box<str>>, ty: Type) -> Self {
        Field { name: name.into(), ty }
    }
}

/// Argument and return types of a callable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncProto {
    pub args: Vec<Type>,
    pub ret: Box<Type>,
}

impl FuncProto {
    pub fn new(args: Vec<Type>, ret: Type) -> Self {
        FuncProto { args, ret: Box::new(ret) }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// The value set of a categorical dtype.
///
/// Declaration order is kept for display, but equality treats the values
/// as a set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories(Vec<Literal>);

impl Categories {
    pub fn new(values: Vec<Literal>) -> Self {
        Categories(values)
    }

    pub fn values(&self) -> &[Literal] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &Literal) -> bool {
        self.0.contains(value)
    }
}

impl PartialEq for Categories {
    fn eq(&self, other: &Self) -> bool {
        let mine: HashSet<&Literal> = self.0.iter().collect();
        let theirs: HashSet<&Literal> = other.0.iter().collect();
        mine == theirs
    }
}

impl From<Vec<Literal>> for Categories {
    fn from(values: Vec<Literal>) -> Self {
        Categories(values)
    }
}

/// Data type representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DType {
    Bool,

    /// Signed integer: `int32`
    Int(IntWidth),

    /// Unsigned integer: `uint8`
    UInt(IntWidth),

    /// Binary float: `float64`
    Float(FloatWidth),

    /// Decimal float: `decimal128`
    Decimal(DecimalWidth),

    /// Complex number over a float (or a dtype variable): `complex[float64]`
    Complex(Box<DType>),

    /// Arbitrary precision integer
    Bignum,

    Void,

    Char,

    /// `string`, `string[10]`, `string['A']`, `string[10, 'U16']`
    String {
        size: Option<u64>,
        encoding: Encoding,
    },

    /// `bytes`, `bytes[16]`
    Bytes { size: Option<u64> },

    /// One of a fixed set of values of the base type
    Categorical {
        base: Box<DType>,
        values: Categories,
    },

    Json,

    /// Record with ordered, uniquely named fields: `{ a : int32, b : float64 }`
    Struct(Vec<Field>),

    /// `(int32, float64)`
    Tuple(Vec<Type>),

    /// `(A, B) -> C`
    FuncProto(FuncProto),

    /// Placeholder for any dtype: `T`
    TypeVar(Box<str>),

    /// Nullable: `option[int32]`
    Option(Box<DType>),

    /// `pointer[3 * int32]`
    Pointer(Box<Type>),

    Date,

    Time { tz: Option<Box<str>> },

    DateTime { tz: Option<Box<str>> },

    /// Numeric value with a physical unit: `units['second', int64]`
    Units { unit: Unit, storage: Box<DType> },
}

// ============ Constructors ============

impl DType {
    pub fn bool() -> Self { DType::Bool }
    pub fn int8() -> Self { DType::Int(IntWidth::W8) }
    pub fn int16() -> Self { DType::Int(IntWidth::W16) }
    pub fn int32() -> Self { DType::Int(IntWidth::W32) }
    pub fn int64() -> Self { DType::Int(IntWidth::W64) }
    pub fn int128() -> Self { DType::Int(IntWidth::W128) }
    pub fn uint8() -> Self { DType::UInt(IntWidth::W8) }
    pub fn uint16() -> Self { DType::UInt(IntWidth::W16) }
    pub fn uint32() -> Self { DType::UInt(IntWidth::W32) }
    pub fn uint64() -> Self { DType::UInt(IntWidth::W64) }
    pub fn uint128() -> Self { DType::UInt(IntWidth::W128) }
    pub fn float16() -> Self { DType::Float(FloatWidth::W16) }
    pub fn float32() -> Self { DType::Float(FloatWidth::W32) }
    pub fn float64() -> Self { DType::Float(FloatWidth::W64) }
    pub fn float128() -> Self { DType::Float(FloatWidth::W128) }
    pub fn bignum() -> Self { DType::Bignum }
    pub fn void() -> Self { DType::Void }
    pub fn char() -> Self { DType::Char }
    pub fn json() -> Self { DType::Json }
    pub fn date() -> Self { DType::Date }

    /// `complex[float32]`
    pub fn complex64() -> Self {
        DType::Complex(Box::new(DType::float32()))
    }

    /// `complex[float64]`
    pub fn complex128() -> Self {
        DType::Complex(Box::new(DType::float64()))
    }

    pub fn complex(inner: DType) -> ModelResult<Self> {
        let ty = DType::Complex(Box::new(inner));
        ty.validate()?;
        Ok(ty)
    }

    pub fn decimal(width: DecimalWidth) -> Self {
        DType::Decimal(width)
    }

    /// Variable length UTF-8 string
    pub fn string() -> Self {
        DType::String { size: None, encoding: Encoding::Utf8 }
    }

    pub fn fixed_string(size: u64) -> Self {
        DType::String { size: Some(size), encoding: Encoding::Utf8 }
    }

    pub fn string_with(size: Option<u64>, encoding: Encoding) -> Self {
        DType::String { size, encoding }
    }

    pub fn bytes() -> Self {
        DType::Bytes { size: None }
    }

    pub fn fixed_bytes(size: u64) -> Self {
        DType::Bytes { size: Some(size) }
    }

    pub fn categorical(base: DType, values: Vec<Literal>) -> ModelResult<Self> {
        let ty = DType::Categorical { base: Box::new(base), values: Categories(values) };
        ty.validate()?;
        Ok(ty)
    }

    /// Record from `(name, type)` pairs, rejecting duplicate names
    pub fn record<N: Into<Box<str>>>(fields: impl IntoIterator<Item = (N, Type)>) -> ModelResult<Self> {
        let ty = DType::Struct(fields.into_iter().map(|(name, ty)| Field::new(name, ty)).collect());
        ty.validate()?;
        Ok(ty)
    }

    pub fn tuple(elements: Vec<Type>) -> Self {
        DType::Tuple(elements)
    }

    pub fn func(args: Vec<Type>, ret: Type) -> Self {
        DType::FuncProto(FuncProto::new(args, ret))
    }

    pub fn typevar(name: impl Into<Box<str>>) -> Self {
        DType::TypeVar(name.into())
    }

    pub fn option(inner: DType) -> Self {
        DType::Option(Box::new(inner))
    }

    pub fn pointer(target: Type) -> Self {
        DType::Pointer(Box::new(target))
    }

    pub fn time() -> Self {
        DType::Time { tz: None }
    }

    pub fn time_tz(tz: impl Into<Box<str>>) -> Self {
        DType::Time { tz: Some(tz.into()) }
    }

    pub fn datetime() -> Self {
        DType::DateTime { tz: None }
    }

    pub fn datetime_tz(tz: impl Into<Box<str>>) -> Self {
        DType::DateTime { tz: Some(tz.into()) }
    }

    /// Unit with the default `float64` storage
    pub fn units(unit: Unit) -> Self {
        DType::Units { unit, storage: Box::new(DType::float64()) }
    }

    pub fn units_with(unit: Unit, storage: DType) -> Self {
        DType::Units { unit, storage: Box::new(storage) }
    }
}

// ============ Queries ============

impl DType {
    pub fn is_integer(&self) -> bool {
        matches!(self, DType::Int(_) | DType::UInt(_) | DType::Bignum)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DType::Float(_))
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(self, DType::Float(_) | DType::Decimal(_) | DType::Complex(_))
    }

    pub fn is_typevar(&self) -> bool {
        matches!(self, DType::TypeVar(_))
    }

    /// Type variables and named ellipses in first-occurrence order
    pub fn free_vars(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_vars(&mut vars);
        vars
    }

    pub(crate) fn collect_vars(&self, vars: &mut Vec<String>) {
        match self {
            DType::TypeVar(name) => push_var(vars, name),
            DType::Complex(inner) | DType::Option(inner) => inner.collect_vars(vars),
            DType::Categorical { base, .. } => base.collect_vars(vars),
            DType::Units { storage, .. } => storage.collect_vars(vars),
            DType::Struct(fields) => fields.iter().for_each(|f| f.ty.collect_vars(vars)),
            DType::Tuple(elements) => elements.iter().for_each(|t| t.collect_vars(vars)),
            DType::FuncProto(proto) => {
                proto.args.iter().for_each(|t| t.collect_vars(vars));
                proto.ret.collect_vars(vars);
            }
            DType::Pointer(target) => target.collect_vars(vars),
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
            | DType::DateTime { .. } => {}
        }
    }

    /// No type variable or ellipsis anywhere inside
    pub fn is_concrete(&self) -> bool {
        self.free_vars().is_empty() && !self.has_anonymous_ellipsis()
    }

    pub(crate) fn has_anonymous_ellipsis(&self) -> bool {
        match self {
            DType::Complex(inner) | DType::Option(inner) => inner.has_anonymous_ellipsis(),
            DType::Categorical { base, .. } => base.has_anonymous_ellipsis(),
            DType::Units { storage, .. } => storage.has_anonymous_ellipsis(),
            DType::Struct(fields) => fields.iter().any(|f| f.ty.has_anonymous_ellipsis()),
            DType::Tuple(elements) => elements.iter().any(Type::has_anonymous_ellipsis),
            DType::FuncProto(proto) => {
                proto.args.iter().any(Type::has_anonymous_ellipsis) || proto.ret.has_anonymous_ellipsis()
            }
            DType::Pointer(target) => target.has_anonymous_ellipsis(),
            _ => false,
        }
    }
}

pub(crate) fn push_var(vars: &mut Vec<String>, name: &str) {
    if !vars.iter().any(|v| v == name) {
        vars.push(name.to_string());
    }
}

// ============ Validation ============

impl DType {
    /// Check the invariants of this dtype.
    ///
    /// Nested [`Type`]s are already valid since they can only be built
    /// through validating constructors, so only dtype nodes are walked.
    pub fn validate(&self) -> ModelResult<()> {
        match self {
            DType::TypeVar(name) => check_var_name(name),

            DType::Complex(inner) => match inner.as_ref() {
                DType::Float(_) => Ok(()),
                DType::TypeVar(name) => check_var_name(name),
                other => Err(MalformedType::InvalidComplexInner(other.to_string())),
            },

            DType::Struct(fields) => {
                let mut seen = HashSet::new();
                for field in fields {
                    if !seen.insert(field.name.as_ref()) {
                        return Err(MalformedType::DuplicateField(field.name.to_string()));
                    }
                }
                Ok(())
            }

            DType::Categorical { base, values } => {
                base.validate()?;
                if values.is_empty() {
                    return Err(MalformedType::EmptyCategories);
                }
                let mut seen = HashSet::new();
                for value in values.values() {
                    if !seen.insert(value) {
                        return Err(MalformedType::DuplicateCategory(value.to_string()));
                    }
                    if !category_fits(base, value) {
                        return Err(MalformedType::CategoryKind {
                            value: value.to_string(),
                            base: base.to_string(),
                        });
                    }
                }
                Ok(())
            }

            DType::Option(inner) => inner.validate(),
            DType::Units { storage, .. } => storage.validate(),

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
            | DType::Tuple(_)
            | DType::FuncProto(_)
            | DType::Pointer(_)
            | DType::Date
            | DType::Time { .. }
            | DType::DateTime { .. } => Ok(()),
        }
    }
}

fn category_fits(base: &DType, value: &Literal) -> bool {
    match (base, value) {
        (DType::TypeVar(_), _) => true,
        (DType::Int(_) | DType::Bignum, Literal::Int(_)) => true,
        (DType::UInt(_), Literal::Int(n)) => *n >= 0,
        (DType::Float(_) | DType::Decimal(_), Literal::Int(_) | Literal::Float(_)) => true,
        (DType::String { .. } | DType::Char, Literal::String(_)) => true,
        (DType::Bool, Literal::Bool(_)) => true,
        (DType::Option(inner), value) => category_fits(inner, value),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::Dim;

    #[test]
    fn test_widths() {
        assert_eq!(IntWidth::try_from(32u32), Ok(IntWidth::W32));
        assert_eq!(FloatWidth::W16.bits(), 16);
        assert_eq!(
            IntWidth::try_from(33u32),
            Err(MalformedType::InvalidWidth { kind: "integer", width: 33 })
        );
        assert!(DecimalWidth::try_from(16u32).is_err());
    }

    #[test]
    fn test_encoding_aliases() {
        assert_eq!("ascii".parse::<Encoding>(), Ok(Encoding::Ascii));
        assert_eq!("utf-8".parse::<Encoding>(), Ok(Encoding::Utf8));
        assert_eq!("utf_16".parse::<Encoding>(), Ok(Encoding::Utf16));
        assert_eq!("U32".parse::<Encoding>(), Ok(Encoding::Utf32));
        assert!("latin-1".parse::<Encoding>().is_err());
        assert_eq!(Encoding::default(), Encoding::Utf8);
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let int32 = Type::scalar(DType::int32()).unwrap();
        let err = DType::record([("a", int32.clone()), ("a", int32)]).unwrap_err();
        assert_eq!(err, MalformedType::DuplicateField("a".to_string()));
    }

    #[test]
    fn test_complex_inner_must_be_float() {
        assert!(DType::complex(DType::float32()).is_ok());
        assert!(DType::complex(DType::typevar("T")).is_ok());
        assert!(matches!(
            DType::complex(DType::int32()),
            Err(MalformedType::InvalidComplexInner(_))
        ));
    }

    #[test]
    fn test_categorical_validation() {
        let ok = DType::categorical(DType::string(), vec!["a".into(), "b".into()]);
        assert!(ok.is_ok());

        let dup = DType::categorical(DType::int32(), vec![1.into(), 1.into()]);
        assert!(matches!(dup, Err(MalformedType::DuplicateCategory(_))));

        let empty = DType::categorical(DType::int32(), vec![]);
        assert_eq!(empty, Err(MalformedType::EmptyCategories));

        let wrong = DType::categorical(DType::uint8(), vec![(-1).into()]);
        assert!(matches!(wrong, Err(MalformedType::CategoryKind { .. })));
    }

    #[test]
    fn test_categorical_equality_ignores_order() {
        let ab = DType::categorical(DType::string(), vec!["a".into(), "b".into()]).unwrap();
        let ba = DType::categorical(DType::string(), vec!["b".into(), "a".into()]).unwrap();
        let ac = DType::categorical(DType::string(), vec!["a".into(), "c".into()]).unwrap();
        assert_eq!(ab, ba);
        assert_ne!(ab, ac);
    }

    #[test]
    fn test_struct_field_order_matters() {
        let int32 = Type::scalar(DType::int32()).unwrap();
        let ab = DType::record([("a", int32.clone()), ("b", int32.clone())]).unwrap();
        let ba = DType::record([("b", int32.clone()), ("a", int32)]).unwrap();
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_free_vars() {
        let arg = Type::new(vec![Dim::typevar("M"), Dim::named_ellipsis("R")], DType::typevar("T")).unwrap();
        let ret = Type::new(vec![Dim::typevar("M")], DType::option(DType::typevar("U"))).unwrap();
        let proto = DType::func(vec![arg], ret);
        assert_eq!(proto.free_vars(), vec!["M", "R", "T", "U"]);
        assert!(!proto.is_concrete());
        assert!(DType::complex128().is_concrete());
    }

    #[test]
    fn test_numeric_queries() {
        assert!(DType::uint16().is_integer());
        assert!(DType::complex64().is_numeric());
        assert!(!DType::string().is_numeric());
        assert!(DType::float16().is_float());
    }
}
