//! Physical units for `units[...]` dtypes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MalformedType;

/// A physical unit attached to a numeric storage type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    // Time
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,

    // Length
    Millimeter,
    Centimeter,
    Meter,
    Kilometer,

    // Mass
    Gram,
    Kilogram,

    // Other SI base units
    Kelvin,
    Ampere,
    Mole,
    Candela,

    // Data size
    Bit,
    Byte,
}

impl Unit {
    pub const ALL: [Unit; 19] = [
        Unit::Nanosecond,
        Unit::Microsecond,
        Unit::Millisecond,
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::Day,
        Unit::Millimeter,
        Unit::Centimeter,
        Unit::Meter,
        Unit::Kilometer,
        Unit::Gram,
        Unit::Kilogram,
        Unit::Kelvin,
        Unit::Ampere,
        Unit::Mole,
        Unit::Candela,
        Unit::Bit,
        Unit::Byte,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Unit::Nanosecond => "nanosecond",
            Unit::Microsecond => "microsecond",
            Unit::Millisecond => "millisecond",
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Millimeter => "millimeter",
            Unit::Centimeter => "centimeter",
            Unit::Meter => "meter",
            Unit::Kilometer => "kilometer",
            Unit::Gram => "gram",
            Unit::Kilogram => "kilogram",
            Unit::Kelvin => "kelvin",
            Unit::Ampere => "ampere",
            Unit::Mole => "mole",
            Unit::Candela => "candela",
            Unit::Bit => "bit",
            Unit::Byte => "byte",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Nanosecond => "ns",
            Unit::Microsecond => "us",
            Unit::Millisecond => "ms",
            Unit::Second => "s",
            Unit::Minute => "min",
            Unit::Hour => "h",
            Unit::Day => "d",
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
            Unit::Kilometer => "km",
            Unit::Gram => "g",
            Unit::Kilogram => "kg",
            Unit::Kelvin => "K",
            Unit::Ampere => "A",
            Unit::Mole => "mol",
            Unit::Candela => "cd",
            Unit::Bit => "b",
            Unit::Byte => "B",
        }
    }
}

impl FromStr for Unit {
    type Err = MalformedType;

    /// Accepts the full name (singular or plural) or the symbol.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let singular = s.strip_suffix('s').unwrap_or(s);
        Unit::ALL
            .into_iter()
            .find(|unit| unit.name() == s || unit.name() == singular || unit.symbol() == s)
            .ok_or_else(|| MalformedType::UnknownUnit(s.to_string()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
