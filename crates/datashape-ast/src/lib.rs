//! # DataShape AST
//!
//! Type model for the DataShape type system.
//!
//! A datashape is a sequence of dimensions followed by a single dtype:
//! - Dimensions: fixed (`3`), ragged (`var`), `strided`, type variables
//!   (`N`) and ellipses (`...`, `Dims...`)
//! - DTypes: sized scalars, strings, categoricals, records, tuples,
//!   function prototypes, options, pointers, date/time and units
//!
//! Values are immutable once built, and only valid values can be built.
//! The textual grammar lives elsewhere; this crate accepts already-parsed
//! trees through [`Type::from_elements`](types::Type::from_elements).
//!
//! ## Example
//!
//! ```rust
//! use datashape_ast::prelude::*;
//!
//! // 3 * var * { name : string, amount : float64 }
//! let record = DType::record([
//!     ("name", Type::scalar(DType::string()).unwrap()),
//!     ("amount", Type::scalar(DType::float64()).unwrap()),
//! ])
//! .unwrap();
//! let ty = Type::new(vec![Dim::fixed(3), Dim::var()], record).unwrap();
//!
//! assert_eq!(ty.to_string(), "3 * var * { name : string, amount : float64 }");
//! assert!(ty.is_concrete());
//! ```

pub mod error;
pub mod dim;
pub mod literal;
pub mod units;
pub mod dtype;
pub mod types;
pub mod pretty;
pub mod ser;

pub use error::{MalformedType, ModelResult};

/// Prelude - common imports
pub mod prelude {
    pub use crate::error::{MalformedType, ModelResult};
    pub use crate::dim::Dim;
    pub use crate::literal::Literal;
    pub use crate::units::Unit;
    pub use crate::dtype::{Categories, DType, DecimalWidth, Encoding, Field, FloatWidth, FuncProto, IntWidth};
    pub use crate::types::{Element, Type};
    pub use crate::pretty::{self, PrettyConfig};
    pub use crate::ser;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_matmul_signature() {
        // (M * K * T, K * N * T) -> M * N * T
        let lhs = Type::new(vec![Dim::typevar("M"), Dim::typevar("K")], DType::typevar("T")).unwrap();
        let rhs = Type::new(vec![Dim::typevar("K"), Dim::typevar("N")], DType::typevar("T")).unwrap();
        let out = Type::new(vec![Dim::typevar("M"), Dim::typevar("N")], DType::typevar("T")).unwrap();
        let sig = Type::scalar(DType::func(vec![lhs, rhs], out)).unwrap();

        assert_eq!(sig.to_string(), "(M * K * T, K * N * T) -> M * N * T");
        assert_eq!(sig.free_vars(), vec!["M", "K", "T", "N"]);
    }

    #[test]
    fn test_units_default_storage() {
        let ty = Type::new(vec![Dim::var()], DType::units(Unit::Meter)).unwrap();
        match ty.dtype() {
            DType::Units { unit, storage } => {
                assert_eq!(*unit, Unit::Meter);
                assert_eq!(**storage, DType::float64());
            }
            other => panic!("Expected Units, got {}", other),
        }
    }

    #[test]
    fn test_pointer_to_array() {
        let target = Type::new(vec![Dim::fixed(16)], DType::uint8()).unwrap();
        let ptr = Type::scalar(DType::pointer(target)).unwrap();
        assert_eq!(ptr.to_string(), "pointer[16 * uint8]");
    }
}
