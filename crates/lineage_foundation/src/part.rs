//! Part designators.
//!
//! A [`Part`] addresses a sub-part of a value ("element 2 of the list") or of
//! a function's ports ("output 0"). Parts compose into paths: the path
//! `element 1 of output 0` is stored as `[Output(0), Element(1)]`, in the
//! order the designators are applied to the object they designate. The first
//! element is the path's [`head`](Part::head), the rest its
//! [`tail`](Part::tail).
//!
//! Pushing an explanation backward through one computation step is a matter
//! of rewriting one atomic designator of the path (typically the `Output`
//! head) into another (an `Input`, or an input followed by an element)
//! while leaving the rest of the path intact.
//!
//! # Example
//!
//! ```
//! use lineage_foundation::Part;
//!
//! let p = Part::Element(1).of(Part::Output(0));
//! assert_eq!(p.mentioned_output(), Some(0));
//! assert_eq!(p.to_string(), "element 1 of output 0");
//!
//! let back = p.replace_output_with(Part::Input(2));
//! assert_eq!(back.to_string(), "element 1 of input 2");
//! ```

use std::fmt;
use std::iter;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A designator for a sub-part of a value or of a function's ports.
///
/// Equality and hashing are structural: two independently built parts that
/// designate the same thing are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Part {
    /// The whole object (identity).
    #[default]
    All,
    /// Nothing at all.
    Nothing,
    /// A designator that cannot be resolved.
    Unknown,
    /// The n-th input of a function.
    Input(usize),
    /// The n-th output of a function.
    Output(usize),
    /// The n-th element of an ordered collection.
    Element(usize),
    /// A named field of a structured value.
    Field(Arc<str>),
    /// An inclusive range of characters of a string.
    Range {
        /// Index of the first character.
        start: usize,
        /// Index of the last character (inclusive).
        end: usize,
    },
    /// A named parameter or argument.
    Argument(Arc<str>),
    /// A path of at least two non-trivial, non-composed parts, in
    /// application order.
    Composed(Arc<[Part]>),
}

/// What a part can be checked against.
#[derive(Clone, Copy, Debug)]
pub enum Target<'a> {
    /// A concrete value.
    Value(&'a Value),
    /// A function's port signature.
    Ports {
        /// Input arity.
        inputs: usize,
        /// Output arity.
        outputs: usize,
    },
}

impl Part {
    /// Creates a field designator.
    #[must_use]
    pub fn field(name: impl Into<Arc<str>>) -> Self {
        Self::Field(name.into())
    }

    /// Creates an argument designator.
    #[must_use]
    pub fn argument(name: impl Into<Arc<str>>) -> Self {
        Self::Argument(name.into())
    }

    /// Creates an inclusive character range designator.
    #[must_use]
    pub const fn range(start: usize, end: usize) -> Self {
        Self::Range { start, end }
    }

    /// Composes parts into a path, in application order.
    ///
    /// Nested paths are flattened, `All` and `Nothing` elements are absorbed,
    /// and a single remaining element is returned unwrapped. An empty result
    /// is `Nothing` if a `Nothing` was absorbed, `All` otherwise. A path
    /// through an `Unknown` is `Unknown`.
    pub fn compose<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Part>,
    {
        let mut elements = Vec::new();
        let mut absorbed_nothing = false;
        for part in parts {
            match part {
                Self::All => {}
                Self::Nothing => absorbed_nothing = true,
                Self::Unknown => return Self::Unknown,
                Self::Composed(inner) => elements.extend(inner.iter().cloned()),
                other => elements.push(other),
            }
        }
        match elements.len() {
            0 if absorbed_nothing => Self::Nothing,
            0 => Self::All,
            1 => elements.remove(0),
            _ => Self::Composed(elements.into()),
        }
    }

    /// Returns the path that applies `self`, then `next` to the result.
    #[must_use]
    pub fn then(self, next: Part) -> Self {
        Self::compose([self, next])
    }

    /// Returns `self` taken of `inner`: `Element(1).of(Output(0))` reads
    /// "element 1 of output 0".
    #[must_use]
    pub fn of(self, inner: Part) -> Self {
        Self::compose([inner, self])
    }

    /// Returns the first designator of the path (itself when atomic).
    #[must_use]
    pub fn head(&self) -> &Part {
        match self {
            Self::Composed(parts) => parts.first().unwrap_or(&Self::All),
            other => other,
        }
    }

    /// Returns the rest of the path after the head (`All` when atomic).
    #[must_use]
    pub fn tail(&self) -> Part {
        match self {
            Self::Composed(parts) => Self::compose(parts.iter().skip(1).cloned()),
            _ => Self::All,
        }
    }

    /// Returns the atomic designators of this path in application order.
    #[must_use]
    pub fn elements(&self) -> &[Part] {
        match self {
            Self::Composed(parts) => parts,
            other => std::slice::from_ref(other),
        }
    }

    /// Returns true for parts that need no further explanation.
    #[must_use]
    pub const fn is_trivial(&self) -> bool {
        matches!(self, Self::All | Self::Nothing | Self::Unknown)
    }

    /// Returns true unless this is a composed path.
    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        !matches!(self, Self::Composed(_))
    }

    /// Returns the output index if the head designates an output.
    #[must_use]
    pub fn mentioned_output(&self) -> Option<usize> {
        match self.head() {
            Self::Output(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the input index if the head designates an input.
    #[must_use]
    pub fn mentioned_input(&self) -> Option<usize> {
        match self.head() {
            Self::Input(n) => Some(*n),
            _ => None,
        }
    }

    /// Replaces the first atomic element matching `matches` with `with`.
    ///
    /// A path without a matching element is returned unchanged. `with` may
    /// itself be a path; it is spliced in place.
    #[must_use]
    pub fn replace_first<F>(&self, matches: F, with: Part) -> Part
    where
        F: Fn(&Part) -> bool,
    {
        let elements = self.elements();
        match elements.iter().position(matches) {
            None => self.clone(),
            Some(i) => Self::compose(
                elements[..i]
                    .iter()
                    .cloned()
                    .chain(iter::once(with))
                    .chain(elements[i + 1..].iter().cloned()),
            ),
        }
    }

    /// Replaces the first `Output` designator with `with`.
    #[must_use]
    pub fn replace_output_with(&self, with: Part) -> Part {
        self.replace_first(|p| matches!(p, Self::Output(_)), with)
    }

    /// Replaces the first `Input` designator with `with`.
    #[must_use]
    pub fn replace_input_with(&self, with: Part) -> Part {
        self.replace_first(|p| matches!(p, Self::Input(_)), with)
    }

    /// Replaces the head of the path with `with`, keeping the tail.
    #[must_use]
    pub fn replace_head(&self, with: Part) -> Part {
        Self::compose(iter::once(with).chain(self.tail().elements().iter().cloned()))
    }

    /// Returns true if this part designates something in `target`.
    ///
    /// For port signatures only the head is checked. For values, the whole
    /// path must select something.
    #[must_use]
    pub fn applies_to(&self, target: Target<'_>) -> bool {
        match target {
            Target::Ports { inputs, outputs } => match self.head() {
                Self::All => true,
                Self::Input(n) => *n < inputs,
                Self::Output(n) => *n < outputs,
                _ => false,
            },
            Target::Value(value) => self.select(value).is_some(),
        }
    }

    /// Navigates `value` along this path and returns the designated piece.
    #[must_use]
    pub fn select(&self, value: &Value) -> Option<Value> {
        self.elements()
            .iter()
            .try_fold(value.clone(), |current, part| part.select_atomic(&current))
    }

    fn select_atomic(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Self::All, v) => Some(v.clone()),
            (Self::Element(n), Value::Vector(items)) => items.get(*n).cloned(),
            (Self::Field(name), Value::Record(fields)) => fields.get(name).cloned(),
            (Self::Range { start, end }, Value::String(s)) => {
                if start > end || *end >= s.chars().count() {
                    return None;
                }
                let slice: String = s.chars().skip(*start).take(end - start + 1).collect();
                Some(Value::from(slice))
            }
            _ => None,
        }
    }

    fn fmt_atomic(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "*"),
            Self::Nothing => write!(f, "nothing"),
            Self::Unknown => write!(f, "?"),
            Self::Input(n) => write!(f, "input {n}"),
            Self::Output(n) => write!(f, "output {n}"),
            Self::Element(n) => write!(f, "element {n}"),
            Self::Field(name) => write!(f, "field {name}"),
            Self::Range { start, end } => write!(f, "chars {start}-{end}"),
            Self::Argument(name) => write!(f, "argument {name}"),
            Self::Composed(_) => Ok(()),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.elements().iter().rev().enumerate() {
            if i > 0 {
                write!(f, " of ")?;
            }
            part.fmt_atomic(f)?;
        }
        Ok(())
    }
}
