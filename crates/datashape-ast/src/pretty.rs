//! Pretty printing for datashapes
//!
//! Renders types in DataShape notation: `3 * var * { a : int32, b : string }`

use std::fmt::{self, Write};

use crate::dim::Dim;
use crate::dtype::{DType, Encoding, Field, FuncProto};
use crate::literal::Literal;
use crate::types::Type;

/// Pretty print configuration
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// `{ a : int32 }` (true) or `struct[['a'], [int32]]` (false)
    pub record_sugar: bool,
    /// `?int32` (true) or `option[int32]` (false)
    pub option_sugar: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        PrettyConfig {
            record_sugar: true,
            option_sugar: false,
        }
    }
}

impl PrettyConfig {
    /// Constructor spelling for every dtype, no sugar
    pub fn verbose() -> Self {
        PrettyConfig {
            record_sugar: false,
            option_sugar: false,
        }
    }

    /// All available sugar
    pub fn compact() -> Self {
        PrettyConfig {
            record_sugar: true,
            option_sugar: true,
        }
    }
}

/// Pretty printer
pub struct Pretty {
    config: PrettyConfig,
    output: String,
}

impl Pretty {
    pub fn new(config: PrettyConfig) -> Self {
        Pretty {
            config,
            output: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn print_type(&mut self, ty: &Type) {
        for dim in ty.dims() {
            self.print_dim(dim);
            self.write(" * ");
        }
        self.print_dtype(ty.dtype());
    }

    pub fn print_dim(&mut self, dim: &Dim) {
        match dim {
            Dim::Fixed(n) => self.write_display(n),
            Dim::Var => self.write("var"),
            Dim::Strided => self.write("strided"),
            Dim::TypeVar(name) => self.write(name),
            Dim::Ellipsis(name) => {
                if let Some(name) = name {
                    self.write(name);
                }
                self.write("...");
            }
        }
    }

    pub fn print_dtype(&mut self, dtype: &DType) {
        match dtype {
            DType::Bool => self.write("bool"),
            DType::Int(w) => {
                self.write("int");
                self.write_display(w.bits());
            }
            DType::UInt(w) => {
                self.write("uint");
                self.write_display(w.bits());
            }
            DType::Float(w) => {
                self.write("float");
                self.write_display(w.bits());
            }
            DType::Decimal(w) => {
                self.write("decimal");
                self.write_display(w.bits());
            }
            DType::Complex(inner) => {
                self.write("complex[");
                self.print_dtype(inner);
                self.write("]");
            }
            DType::Bignum => self.write("bignum"),
            DType::Void => self.write("void"),
            DType::Char => self.write("char"),
            DType::String { size, encoding } => {
                self.write("string");
                let default_encoding = *encoding == Encoding::default();
                match (size, default_encoding) {
                    (None, true) => {}
                    (Some(n), true) => self.write(&format!("[{}]", n)),
                    (None, false) => self.write(&format!("['{}']", encoding)),
                    (Some(n), false) => self.write(&format!("[{}, '{}']", n, encoding)),
                }
            }
            DType::Bytes { size } => {
                self.write("bytes");
                if let Some(n) = size {
                    self.write(&format!("[{}]", n));
                }
            }
            DType::Categorical { base, values } => {
                self.write("categorical[[");
                for (i, value) in values.values().iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write_display(value);
                }
                self.write("], type=");
                self.print_dtype(base);
                self.write("]");
            }
            DType::Json => self.write("json"),
            DType::Struct(fields) => self.print_struct(fields),
            DType::Tuple(elements) => {
                self.write("(");
                self.print_list(elements);
                // (int32,) so a single element is not read as a grouping
                if elements.len() == 1 {
                    self.write(",");
                }
                self.write(")");
            }
            DType::FuncProto(proto) => self.print_proto(proto),
            DType::TypeVar(name) => self.write(name),
            DType::Option(inner) => {
                if self.config.option_sugar {
                    self.write("?");
                    self.print_dtype(inner);
                } else {
                    self.write("option[");
                    self.print_dtype(inner);
                    self.write("]");
                }
            }
            DType::Pointer(target) => {
                self.write("pointer[");
                self.print_type(target);
                self.write("]");
            }
            DType::Date => self.write("date"),
            DType::Time { tz } => {
                self.write("time");
                self.print_tz(tz.as_deref());
            }
            DType::DateTime { tz } => {
                self.write("datetime");
                self.print_tz(tz.as_deref());
            }
            DType::Units { unit, storage } => {
                self.write(&format!("units['{}'", unit));
                if **storage != DType::float64() {
                    self.write(", ");
                    self.print_dtype(storage);
                }
                self.write("]");
            }
        }
    }

    fn print_struct(&mut self, fields: &[Field]) {
        if self.config.record_sugar {
            if fields.is_empty() {
                self.write("{}");
                return;
            }
            self.write("{ ");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write(&field.name);
                self.write(" : ");
                self.print_type(&field.ty);
            }
            self.write(" }");
        } else {
            self.write("struct[[");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.write(&format!("'{}'", field.name));
            }
            self.write("], [");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.print_type(&field.ty);
            }
            self.write("]]");
        }
    }

    fn print_proto(&mut self, proto: &FuncProto) {
        self.write("(");
        self.print_list(&proto.args);
        self.write(") -> ");
        self.print_type(&proto.ret);
    }

    fn print_list(&mut self, types: &[Type]) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_type(ty);
        }
    }

    fn print_tz(&mut self, tz: Option<&str>) {
        if let Some(tz) = tz {
            self.write(&format!("[tz='{}']", tz));
        }
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_display(&mut self, value: impl fmt::Display) {
        // Writing into a String cannot fail
        let _ = write!(self.output, "{}", value);
    }
}

/// Render a datashape with the given configuration
pub fn print_type(ty: &Type, config: &PrettyConfig) -> String {
    let mut p = Pretty::new(config.clone());
    p.print_type(ty);
    p.finish()
}

/// Render a dtype with the given configuration
pub fn print_dtype(dtype: &DType, config: &PrettyConfig) -> String {
    let mut p = Pretty::new(config.clone());
    p.print_dtype(dtype);
    p.finish()
}

// ============ Display impls ============

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_type(self, &PrettyConfig::default()))
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&print_dtype(self, &PrettyConfig::default()))
    }
}

impl fmt::Display for FuncProto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut p = Pretty::new(PrettyConfig::default());
        p.print_proto(self);
        f.write_str(&p.finish())
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut p = Pretty::new(PrettyConfig::default());
        p.print_dim(self);
        f.write_str(&p.finish())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    fn scalar(dtype: DType) -> Type {
        Type::scalar(dtype).unwrap()
    }

    #[test]
    fn test_dims_and_scalars() {
        let ty = Type::new(vec![Dim::fixed(3), Dim::var(), Dim::strided()], DType::int32()).unwrap();
        assert_eq!(ty.to_string(), "3 * var * strided * int32");

        let pattern = Type::new(vec![Dim::typevar("M"), Dim::named_ellipsis("N")], DType::typevar("T")).unwrap();
        assert_eq!(pattern.to_string(), "M * N... * T");
        assert_eq!(Dim::ellipsis().to_string(), "...");
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(DType::string().to_string(), "string");
        assert_eq!(DType::fixed_string(10).to_string(), "string[10]");
        assert_eq!(DType::string_with(None, Encoding::Ascii).to_string(), "string['A']");
        assert_eq!(DType::string_with(Some(4), Encoding::Utf16).to_string(), "string[4, 'U16']");
        assert_eq!(DType::fixed_bytes(8).to_string(), "bytes[8]");
    }

    #[test]
    fn test_time_and_units() {
        assert_eq!(DType::time_tz("UTC").to_string(), "time[tz='UTC']");
        assert_eq!(DType::datetime().to_string(), "datetime");
        assert_eq!(DType::units(Unit::Second).to_string(), "units['second']");
        assert_eq!(
            DType::units_with(Unit::Second, DType::int32()).to_string(),
            "units['second', int32]"
        );
    }

    #[test]
    fn test_records() {
        let field = Type::new(vec![Dim::fixed(5)], DType::int32()).unwrap();
        let rec = DType::record([("field", field), ("name", scalar(DType::string()))]).unwrap();
        assert_eq!(rec.to_string(), "{ field : 5 * int32, name : string }");
        assert_eq!(
            print_dtype(&rec, &PrettyConfig::verbose()),
            "struct[['field', 'name'], [5 * int32, string]]"
        );
    }

    #[test]
    fn test_composites() {
        let proto = DType::func(
            vec![scalar(DType::typevar("A")), scalar(DType::typevar("B"))],
            scalar(DType::complex128()),
        );
        assert_eq!(proto.to_string(), "(A, B) -> complex[float64]");

        let opt = DType::option(DType::int16());
        assert_eq!(opt.to_string(), "option[int16]");
        assert_eq!(print_dtype(&opt, &PrettyConfig::compact()), "?int16");

        let cat = DType::categorical(DType::string(), vec!["lo".into(), "hi".into()]).unwrap();
        assert_eq!(cat.to_string(), "categorical[['lo', 'hi'], type=string]");
    }

    #[test]
    fn test_tuples() {
        let pair = DType::tuple(vec![scalar(DType::int32()), scalar(DType::float64())]);
        assert_eq!(pair.to_string(), "(int32, float64)");

        let single = DType::tuple(vec![scalar(DType::int32())]);
        assert_eq!(single.to_string(), "(int32,)");
        assert_eq!(DType::tuple(vec![]).to_string(), "()");
    }
}
