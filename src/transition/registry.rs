//! An ordered collection of transitions with lookup by index, range, term label or energy.
//!
//! Registries never change in place. Every lookup that selects more than one transition,
//! and every filter, builds a new registry holding the same `Arc<Transition>`s and the same
//! parent, so a transition reached through any view is the very same object.

use super::key::{Lookup, TransitionKey};
use super::{Transition, TransitionRecord};
use crate::atom::Parent;
use crate::error::{Error, Result};
use crate::state::State;
use crate::summary::{clamp_range, write_summary};
use crate::units::{Energy, EnergyUnit};
use std::fmt;
use std::ops::{Add, Index};
use std::sync::Arc;
use tracing::trace;

#[derive(Clone, Debug, Default)]
pub struct TransitionRegistry {
    transitions: Vec<Arc<Transition>>,
    parent: Option<Parent>,
}

impl TransitionRegistry {
    pub fn new(transitions: Vec<Arc<Transition>>, parent: Option<Parent>) -> Self {
        TransitionRegistry {
            transitions,
            parent,
        }
    }

    /// The entity that owns this registry, if any.
    pub fn parent(&self) -> Option<&Parent> {
        self.parent.as_ref()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Transition>> {
        self.transitions.iter()
    }

    /// Looks up `key`. See [TransitionKey] for what each kind of key selects.
    pub fn get<K: Into<TransitionKey>>(&self, key: K) -> Result<Lookup> {
        self.lookup(&key.into())
    }

    /// Looks up `key`, returning a single transition or a new registry.
    pub fn lookup(&self, key: &TransitionKey) -> Result<Lookup> {
        trace!(%key, len = self.transitions.len(), "transition lookup");
        match key {
            TransitionKey::Index(index) => self.at(*index).map(|t| Lookup::One(t.clone())),
            TransitionKey::Range { start, end } => Ok(Lookup::Many(self.slice(*start, *end))),
            TransitionKey::Label(label) => self.find_label(label).map(Lookup::One),
            TransitionKey::Directed(initial, last) => {
                self.find_directed(initial, last).map(Lookup::One)
            }
            TransitionKey::Keys(keys) => self.select(keys).map(Lookup::Many),
            TransitionKey::Energy(energy) => self.nearest_energy(*energy).map(Lookup::One),
            TransitionKey::Quantity(energy) => self.nearest(*energy).map(Lookup::One),
        }
    }

    /// The transition at position `index`.
    pub fn at(&self, index: usize) -> Result<&Arc<Transition>> {
        self.transitions.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.transitions.len(),
        })
    }

    /// A new registry holding the transitions in `start..end`, clamped to the registry.
    pub fn slice(&self, start: Option<usize>, end: Option<usize>) -> TransitionRegistry {
        let range = clamp_range(start, end, self.transitions.len());
        self.derive(self.transitions[range].to_vec())
    }

    /// Finds a transition by term string: `"label"` or the directed form `"initial:final"`.
    pub fn find(&self, text: &str) -> Result<Arc<Transition>> {
        match TransitionKey::parse(text)? {
            TransitionKey::Directed(initial, last) => self.find_directed(&initial, &last),
            _ => self.find_label(text),
        }
    }

    /// First transition with an endpoint that matches `label` and is not the parent state.
    pub fn find_label(&self, label: &str) -> Result<Arc<Transition>> {
        self.transitions
            .iter()
            .find(|t| {
                (t.i().matches(label) && !self.is_parent(t.i()))
                    || (t.f().matches(label) && !self.is_parent(t.f()))
            })
            .cloned()
            .ok_or_else(|| Error::NotFound {
                key: label.to_string(),
            })
    }

    /// First transition from a state matching `initial` to a state matching `last`.
    pub fn find_directed(&self, initial: &str, last: &str) -> Result<Arc<Transition>> {
        self.transitions
            .iter()
            .find(|t| t.i().matches(initial) && t.f().matches(last))
            .cloned()
            .ok_or_else(|| Error::NotFound {
                key: format!("{}{}{}", initial, super::key::SEPARATOR, last),
            })
    }

    /// A new registry with the result of each key, in order. Ranges and nested lists
    /// contribute all the transitions they select.
    pub fn select(&self, keys: &[TransitionKey]) -> Result<TransitionRegistry> {
        let mut selected = Vec::with_capacity(keys.len());
        for key in keys {
            match self.lookup(key)? {
                Lookup::One(transition) => selected.push(transition),
                Lookup::Many(registry) => selected.extend(registry.transitions),
            }
        }
        Ok(self.derive(selected))
    }

    /// Transition with an endpoint closest to `energy`, given in Hartree.
    pub fn nearest_energy(&self, energy: f64) -> Result<Arc<Transition>> {
        self.nearest(Energy::hartree(energy))
    }

    /// Transition with an endpoint closest to `energy`. Ties go to the earlier transition.
    pub fn nearest(&self, energy: Energy) -> Result<Arc<Transition>> {
        let distance =
            |state: &State| (state.energy() - energy).abs().value_in(EnergyUnit::Hartree);
        self.transitions
            .iter()
            .map(|t| (t, distance(t.i()).min(distance(t.f()))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(t, _)| t.clone())
            .ok_or_else(|| Error::NotFound {
                key: energy.to_string(),
            })
    }

    /// Transitions whose initial (lower) state is `state`.
    pub fn up_from(&self, state: &Arc<State>) -> TransitionRegistry {
        self.filter(|t| Arc::ptr_eq(t.i(), state))
    }

    /// Transitions whose final (upper) state is `state`.
    pub fn down_from(&self, state: &Arc<State>) -> TransitionRegistry {
        self.filter(|t| Arc::ptr_eq(t.f(), state))
    }

    /// A new registry with the transitions for which `predicate` holds.
    pub fn filter<P>(&self, mut predicate: P) -> TransitionRegistry
    where
        P: FnMut(&Transition) -> bool,
    {
        self.derive(
            self.transitions
                .iter()
                .filter(|t| predicate(t))
                .cloned()
                .collect(),
        )
    }

    /// Joins two registries of the same parent, `self` first.
    pub fn concat(&self, other: &TransitionRegistry) -> Result<TransitionRegistry> {
        if self.parent != other.parent {
            return Err(Error::ParentMismatch {
                left: Parent::describe(self.parent()),
                right: Parent::describe(other.parent()),
            });
        }
        let mut transitions = self.transitions.clone();
        transitions.extend(other.transitions.iter().cloned());
        Ok(self.derive(transitions))
    }

    pub fn to_records(&self) -> Vec<TransitionRecord> {
        self.transitions.iter().map(|t| t.to_record()).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_records())?)
    }

    fn derive(&self, transitions: Vec<Arc<Transition>>) -> TransitionRegistry {
        TransitionRegistry::new(transitions, self.parent.clone())
    }

    fn is_parent(&self, state: &Arc<State>) -> bool {
        matches!(&self.parent, Some(Parent::State(parent)) if Arc::ptr_eq(parent, state))
    }
}

impl Index<usize> for TransitionRegistry {
    type Output = Arc<Transition>;
    fn index(&self, index: usize) -> &Arc<Transition> {
        &self.transitions[index]
    }
}

impl Add for TransitionRegistry {
    type Output = TransitionRegistry;

    /// # Panics
    ///
    /// If the registries have different parents. Use [TransitionRegistry::concat] to get an
    /// error instead.
    fn add(self, other: TransitionRegistry) -> TransitionRegistry {
        match self.concat(&other) {
            Ok(joined) => joined,
            Err(error) => panic!("{}", error),
        }
    }
}

impl<'a> Add<&'a TransitionRegistry> for &'a TransitionRegistry {
    type Output = TransitionRegistry;
    fn add(self, other: &'a TransitionRegistry) -> TransitionRegistry {
        match self.concat(other) {
            Ok(joined) => joined,
            Err(error) => panic!("{}", error),
        }
    }
}

impl<'a> IntoIterator for &'a TransitionRegistry {
    type Item = &'a Arc<Transition>;
    type IntoIter = std::slice::Iter<'a, Arc<Transition>>;
    fn into_iter(self) -> Self::IntoIter {
        self.transitions.iter()
    }
}

impl fmt::Display for TransitionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, "Transitions", &self.transitions)
    }
}
