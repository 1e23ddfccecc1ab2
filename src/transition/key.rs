//! Keys for looking up transitions in a [super::TransitionRegistry].

use super::{Transition, TransitionRegistry};
use crate::error::{Error, Result};
use crate::units::Energy;
use serde_json::Value;
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::sync::Arc;

/// Separator between the two labels of a directed lookup, `"initial:final"`.
pub const SEPARATOR: char = ':';

/// The ways a transition, or a selection of transitions, may be addressed.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionKey {
    /// Position in the registry.
    Index(usize),
    /// A sub-sequence of positions; bounds are clamped to the registry.
    Range {
        start: Option<usize>,
        end: Option<usize>,
    },
    /// First transition with an endpoint matching the label that is not the parent state.
    Label(String),
    /// First transition whose initial state matches the first label and final state the
    /// second.
    Directed(String, String),
    /// Several keys at once; ranges and nested lists contribute all the transitions they
    /// select.
    Keys(Vec<TransitionKey>),
    /// Transition with an endpoint nearest to this energy, in Hartree.
    Energy(f64),
    /// Transition with an endpoint nearest to this energy.
    Quantity(Energy),
}

impl TransitionKey {
    /// Parses a term string; a string containing [SEPARATOR] becomes a directed lookup.
    pub fn parse(text: &str) -> Result<TransitionKey> {
        match text.split_once(SEPARATOR) {
            None => Ok(TransitionKey::Label(text.to_string())),
            Some((_, tail)) if tail.contains(SEPARATOR) => Err(Error::TypeMismatch {
                found: format!("term string `{}` with more than one `{}`", text, SEPARATOR),
            }),
            Some((initial, last)) => Ok(TransitionKey::Directed(
                initial.to_string(),
                last.to_string(),
            )),
        }
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKey::Index(index) => write!(f, "{}", index),
            TransitionKey::Range { start, end } => {
                if let Some(start) = start {
                    write!(f, "{}", start)?;
                }
                write!(f, "..")?;
                if let Some(end) = end {
                    write!(f, "{}", end)?;
                }
                Ok(())
            }
            TransitionKey::Label(label) => write!(f, "{}", label),
            TransitionKey::Directed(initial, last) => write!(f, "{}{}{}", initial, SEPARATOR, last),
            TransitionKey::Keys(keys) => {
                write!(f, "[")?;
                for (n, key) in keys.iter().enumerate() {
                    if n > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", key)?;
                }
                write!(f, "]")
            }
            TransitionKey::Energy(energy) => write!(f, "{} Eh", energy),
            TransitionKey::Quantity(energy) => write!(f, "{}", energy),
        }
    }
}

impl From<usize> for TransitionKey {
    fn from(index: usize) -> Self {
        TransitionKey::Index(index)
    }
}

impl From<f64> for TransitionKey {
    fn from(energy: f64) -> Self {
        TransitionKey::Energy(energy)
    }
}

impl From<Energy> for TransitionKey {
    fn from(energy: Energy) -> Self {
        TransitionKey::Quantity(energy)
    }
}

impl From<Range<usize>> for TransitionKey {
    fn from(range: Range<usize>) -> Self {
        TransitionKey::Range {
            start: Some(range.start),
            end: Some(range.end),
        }
    }
}

impl From<RangeFrom<usize>> for TransitionKey {
    fn from(range: RangeFrom<usize>) -> Self {
        TransitionKey::Range {
            start: Some(range.start),
            end: None,
        }
    }
}

impl From<RangeTo<usize>> for TransitionKey {
    fn from(range: RangeTo<usize>) -> Self {
        TransitionKey::Range {
            start: None,
            end: Some(range.end),
        }
    }
}

impl From<RangeFull> for TransitionKey {
    fn from(_: RangeFull) -> Self {
        TransitionKey::Range {
            start: None,
            end: None,
        }
    }
}

impl<K: Into<TransitionKey>> From<Vec<K>> for TransitionKey {
    fn from(keys: Vec<K>) -> Self {
        TransitionKey::Keys(keys.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<&str> for TransitionKey {
    type Error = Error;
    fn try_from(text: &str) -> Result<Self> {
        TransitionKey::parse(text)
    }
}

impl TryFrom<&Value> for TransitionKey {
    type Error = Error;

    /// Integers become indices, other numbers energies in Hartree, strings term labels and
    /// arrays key lists.
    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Number(number) => match number.as_u64() {
                Some(index) => Ok(TransitionKey::Index(index as usize)),
                None => number
                    .as_f64()
                    .filter(|_| !number.is_i64())
                    .map(TransitionKey::Energy)
                    .ok_or_else(|| Error::TypeMismatch {
                        found: format!("negative index {}", number),
                    }),
            },
            Value::String(text) => TransitionKey::parse(text),
            Value::Array(items) => items
                .iter()
                .map(TransitionKey::try_from)
                .collect::<Result<Vec<_>>>()
                .map(TransitionKey::Keys),
            other => Err(Error::TypeMismatch {
                found: json_kind(other).to_string(),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Result of a registry lookup: a single transition or a new registry.
#[derive(Clone, Debug)]
pub enum Lookup {
    One(Arc<Transition>),
    Many(TransitionRegistry),
}

impl Lookup {
    /// The transition, if the key selected exactly one.
    pub fn one(self) -> Option<Arc<Transition>> {
        match self {
            Lookup::One(transition) => Some(transition),
            Lookup::Many(_) => None,
        }
    }

    /// The registry, if the key selected a range or list.
    pub fn many(self) -> Option<TransitionRegistry> {
        match self {
            Lookup::One(_) => None,
            Lookup::Many(registry) => Some(registry),
        }
    }
}
