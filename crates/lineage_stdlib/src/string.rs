//! String functions.
//!
//! Character ranges are counted in `char`s and are inclusive at both ends,
//! like [`Part::Range`].

use lineage_engine::{Atomic, Cause, Query};
use lineage_foundation::{Error, ErrorKind, Part, Result, Value};

/// A piece of a string as `(first char, char count, text)`.
type Piece<'s> = (usize, usize, &'s str);

fn pieces<'s>(text: &'s str, separator: &str) -> Vec<Piece<'s>> {
    if separator.is_empty() {
        return text
            .char_indices()
            .enumerate()
            .map(|(n, (at, c))| (n, 1, &text[at..at + c.len_utf8()]))
            .collect();
    }
    let step = separator.chars().count();
    let mut start = 0;
    text.split(separator)
        .map(|piece| {
            let len = piece.chars().count();
            let entry = (start, len, piece);
            start += len + step;
            entry
        })
        .collect()
}

/// `rest` of a substring that starts at char `start` and is `len` chars long,
/// as a part of the whole string.
fn within(start: usize, len: usize, rest: &Part) -> Part {
    match rest.head() {
        Part::Range { start: a, end: b } => {
            Part::range(start + a, start + b).then(rest.tail())
        }
        _ => Part::range(start, start + len - 1).then(rest.clone()),
    }
}

/// Splits a string on a separator.
///
/// Element n of the output is explained by the character range of the
/// input it was cut from. An empty separator splits into characters.
#[derive(Clone, Debug)]
pub struct Split {
    separator: String,
}

impl Split {
    /// Creates a split on `separator`.
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Atomic for Split {
    fn name(&self) -> &str {
        "split"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let text = inputs[0].require_str()?;
        let parts: Vec<Value> = pieces(text, &self.separator)
            .into_iter()
            .map(|(_, _, piece)| Value::from(piece))
            .collect();
        Ok(vec![Value::from(parts)])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        let Part::Element(n) = query.rest.head() else {
            return None;
        };
        let text = query.inputs[0].as_str()?;
        let pieces = pieces(text, &self.separator);
        Some(match pieces.get(*n) {
            None => Cause::Unknown,
            // An empty piece comes from no characters at all.
            Some((_, 0, _)) => Cause::all(vec![]),
            Some(&(start, len, _)) => {
                Cause::input_part(0, within(start, len, &query.rest.tail()))
            }
        })
    }
}

/// Concatenates two strings.
///
/// A character range of the output is explained by the matching ranges of
/// whichever inputs it overlaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct Concat;

impl Atomic for Concat {
    fn name(&self) -> &str {
        "concat"
    }

    fn arity(&self) -> (usize, usize) {
        (2, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let left = inputs[0].require_str()?;
        let right = inputs[1].require_str()?;
        Ok(vec![Value::from(format!("{left}{right}"))])
    }

    fn explain<'a>(&'a self, query: &Query<'_>) -> Option<Cause<'a>> {
        let &Part::Range { start, end } = query.rest.head() else {
            return None;
        };
        let split = query.inputs[0].as_str()?.chars().count();
        let rest = query.rest.tail();
        Some(if end < split {
            Cause::input_part(0, Part::range(start, end).then(rest))
        } else if start >= split {
            Cause::input_part(1, Part::range(start - split, end - split).then(rest))
        } else {
            Cause::all(vec![
                Cause::input_part(0, Part::range(start, split - 1)),
                Cause::input_part(1, Part::range(0, end - split)),
            ])
        })
    }
}

/// The number of characters of a string.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringLength;

impl Atomic for StringLength {
    fn name(&self) -> &str {
        "string-length"
    }

    fn arity(&self) -> (usize, usize) {
        (1, 1)
    }

    fn compute(&mut self, inputs: &[Value]) -> Result<Vec<Value>> {
        let count = inputs[0].require_str()?.chars().count();
        let count = i64::try_from(count)
            .map_err(|_| Error::new(ErrorKind::Internal(format!("length {count} exceeds i64"))))?;
        Ok(vec![Value::Int(count)])
    }
}
