//! DataShape Checker
//!
//! Pattern matching of concrete datashapes against type patterns, and
//! resolution of function prototypes.
//!
//! ## Example
//!
//! ```rust
//! use datashape_ast::prelude::*;
//! use datashape_check::check_prototype;
//!
//! // (M * N * int32) -> N * int32
//! let proto = FuncProto::new(
//!     vec![Type::new(vec![Dim::typevar("M"), Dim::typevar("N")], DType::int32()).unwrap()],
//!     Type::new(vec![Dim::typevar("N")], DType::int32()).unwrap(),
//! );
//! let arg = Type::new(vec![Dim::fixed(4), Dim::fixed(5)], DType::int32()).unwrap();
//!
//! let ret = check_prototype(&proto, &[arg]).unwrap();
//! assert_eq!(ret.to_string(), "5 * int32");
//! ```

pub mod error;
pub mod env;
pub mod subst;
pub mod unify;
pub mod proto;

pub use error::{ErrorKind, MatchError, MatchResult};
pub use env::{Binding, Environment};
pub use subst::{Resolution, Substitute};
pub use unify::match_type;
pub use proto::{check_prototype, check_prototype_env, resolve_overload, Resolved};
