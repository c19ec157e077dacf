//! Values flowing through computation graphs.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::Result;
use crate::collections::{Elements, Record};
use crate::error::Error;
use crate::types::Type;

/// A value produced or consumed by a function.
///
/// Every variant clones in O(1), so a value can be memoized by its producer
/// and handed to any number of consumers at once. Parts of a value are
/// addressed with [`Part`](crate::Part): elements of a vector, fields of a
/// record, character ranges of a string.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value.
    Nil,
    /// A boolean.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A string.
    String(Arc<str>),
    /// A vector of values.
    Vector(Elements),
    /// A record of named fields.
    Record(Record),
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub fn value_type(&self) -> Type {
        match self {
            Self::Nil => Type::Nil,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::String(_) => Type::String,
            Self::Vector(_) => Type::Vector,
            Self::Record(_) => Type::Record,
        }
    }

    /// Returns true for integer or float zero (either sign).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(n) => *n == 0,
            Self::Float(n) => *n == 0.0,
            _ => false,
        }
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns either numeric kind as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements, if this is a vector.
    #[must_use]
    pub const fn as_vector(&self) -> Option<&Elements> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the fields, if this is a record.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    fn mismatch(&self, expected: Type) -> Error {
        Error::type_mismatch(expected, self.value_type())
    }

    /// Returns the boolean or a type mismatch naming [`Type::Bool`].
    ///
    /// # Errors
    ///
    /// Fails if this is not a boolean.
    pub fn require_bool(&self) -> Result<bool> {
        self.as_bool().ok_or_else(|| self.mismatch(Type::Bool))
    }

    /// Returns the number or a type mismatch naming [`Type::Number`].
    ///
    /// # Errors
    ///
    /// Fails if this is neither an integer nor a float.
    pub fn require_number(&self) -> Result<f64> {
        self.as_number().ok_or_else(|| self.mismatch(Type::Number))
    }

    /// Returns the string or a type mismatch naming [`Type::String`].
    ///
    /// # Errors
    ///
    /// Fails if this is not a string.
    pub fn require_str(&self) -> Result<&str> {
        self.as_str().ok_or_else(|| self.mismatch(Type::String))
    }

    /// Returns the elements or a type mismatch naming [`Type::Vector`].
    ///
    /// # Errors
    ///
    /// Fails if this is not a vector.
    pub fn require_vector(&self) -> Result<&Elements> {
        self.as_vector().ok_or_else(|| self.mismatch(Type::Vector))
    }
}

// Floats compare by bits so that Eq and Hash agree and memo lookups on NaN hit.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Vector(a), Self::Vector(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Nil => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
            Self::String(s) => s.hash(state),
            Self::Vector(v) => v.hash(state),
            Self::Record(r) => r.hash(state),
        }
    }
}

/// Numbers order across kinds and strings order lexically; anything else
/// is unordered.
impl PartialOrd for Value {
    #[allow(clippy::cast_precision_loss)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (a, b) => a.as_number()?.partial_cmp(&b.as_number()?),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Vector(v) => write!(f, "{v:?}"),
            Self::Record(r) => write!(f, "{r:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Vector(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Record(r) => {
                write!(f, "{{")?;
                for (i, (name, value)) in r.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Vector(v.into_iter().map(Into::into).collect())
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::Record(r)
    }
}
