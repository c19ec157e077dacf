//! Value kinds named in type mismatch reports.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of a [`Value`](crate::Value), or a class of kinds a function
/// accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// Absence of a value.
    Nil,
    /// Booleans.
    Bool,
    /// 64-bit signed integers.
    Int,
    /// 64-bit floats.
    Float,
    /// Either integers or floats.
    Number,
    /// Strings.
    String,
    /// Vectors of any element kind.
    Vector,
    /// Records of named fields.
    Record,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Number => "number",
            Self::String => "string",
            Self::Vector => "vector",
            Self::Record => "record",
        };
        f.write_str(name)
    }
}
