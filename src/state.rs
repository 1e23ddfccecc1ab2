//! Atomic energy levels and ordered collections of them.

use crate::atom::Parent;
use crate::error::{Error, Result};
use crate::polarizability::Polarizability;
use crate::summary::{clamp_range, write_summary};
use crate::term::{CouplingScheme, Term};
use crate::units::{Energy, EnergyUnit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::sync::Arc;
use tracing::trace;

/// Description of a state, as given to the [crate::atom::AtomBuilder].
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct StateSpec {
    /// Electron configuration, eg `4d10.5s.5p`.
    pub configuration: String,
    /// Term symbol, eg `1P1*`.
    pub term: String,
    /// Total electronic angular momentum quantum number.
    pub j: f64,
    pub energy: Energy,
}

/// An energy level of an atom.
///
/// States are shared between the transitions that connect them through `Arc`, and
/// compared by identity.
#[derive(Clone, Debug)]
pub struct State {
    configuration: String,
    term: String,
    symbol: Term,
    j: f64,
    energy: Energy,
    index: Option<usize>,
    lifetime: f64,
    polarizability: Option<Arc<dyn Polarizability>>,
}

impl State {
    /// Creates a free-standing state with infinite lifetime and no polarizability model.
    pub fn new(configuration: &str, term: &str, j: f64, energy: Energy) -> Self {
        State {
            configuration: configuration.to_string(),
            term: term.to_string(),
            symbol: Term::parse(term),
            j,
            energy,
            index: None,
            lifetime: f64::INFINITY,
            polarizability: None,
        }
    }

    pub fn from_spec(spec: &StateSpec) -> Self {
        State::new(&spec.configuration, &spec.term, spec.j, spec.energy)
    }

    pub fn with_polarizability(mut self, model: Arc<dyn Polarizability>) -> Self {
        self.polarizability = Some(model);
        self
    }

    /// Sets the radiative lifetime, s.
    pub fn with_lifetime(mut self, lifetime: f64) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Quantum numbers parsed from the term symbol.
    pub fn term_symbol(&self) -> &Term {
        &self.symbol
    }

    pub fn coupling(&self) -> Option<CouplingScheme> {
        self.symbol.coupling
    }

    /// Total spin `S`, for LS and LK coupled terms.
    pub fn s(&self) -> Option<f64> {
        self.symbol.s
    }

    /// Orbital angular momentum `L`, for LS coupled terms.
    pub fn l(&self) -> Option<u32> {
        self.symbol.l
    }

    pub fn j1(&self) -> Option<f64> {
        self.symbol.j1
    }

    pub fn j2(&self) -> Option<f64> {
        self.symbol.j2
    }

    pub fn k(&self) -> Option<f64> {
        self.symbol.k
    }

    /// `-1` for odd parity (terms marked `*`), `+1` otherwise.
    pub fn parity(&self) -> Option<i8> {
        self.symbol.parity
    }

    /// Total angular momentum quantum number `J`.
    pub fn j(&self) -> f64 {
        self.j
    }

    pub fn energy(&self) -> Energy {
        self.energy
    }

    /// Position of the state in its atom's state list, `None` for free-standing states.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Radiative lifetime in s, infinite for states that cannot decay.
    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    /// Valence part of the configuration: the subshells after the last `.` of the core.
    pub fn valence(&self) -> &str {
        let first = self.configuration.split_whitespace().next().unwrap_or("");
        first.rsplit('.').next().unwrap_or("")
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.valence(), self.term)
    }

    /// Whether `label` identifies this state, ie whether it occurs in the state's name.
    pub fn matches(&self, label: &str) -> bool {
        self.name().contains(label)
    }

    pub fn polarizability_model(&self) -> Option<&Arc<dyn Polarizability>> {
        self.polarizability.as_ref()
    }

    /// Dynamic polarizability at `wavelength` (m), C m^2 / V.
    pub fn polarizability(&self, wavelength: f64, m_j: Option<f64>) -> Result<f64> {
        match &self.polarizability {
            Some(model) => Ok(model.polarizability(wavelength, m_j)),
            None => Err(Error::MissingPolarizability { state: self.name() }),
        }
    }

    pub fn to_record(&self) -> StateRecord {
        StateRecord {
            energy: self.energy.to_string(),
            configuration: self.configuration.clone(),
            term: self.term.clone(),
            j: format_half_integer(self.j),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({}: {:.4})", self.name(), self.energy)
    }
}

/// Writes `J` as an integer or a half-integer fraction.
fn format_half_integer(value: f64) -> String {
    let twice = (2.0 * value).round() as i64;
    if twice % 2 == 0 {
        format!("{}", twice / 2)
    } else {
        format!("{}/2", twice)
    }
}

/// Serialised form of a [State].
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct StateRecord {
    pub energy: String,
    pub configuration: String,
    pub term: String,
    #[serde(rename = "J")]
    pub j: String,
}

/// An ordered list of states belonging to an atom.
#[derive(Clone, Debug, Default)]
pub struct StateRegistry {
    states: Vec<Arc<State>>,
    parent: Option<Parent>,
}

impl StateRegistry {
    pub fn new(states: Vec<Arc<State>>, parent: Option<Parent>) -> Self {
        StateRegistry { states, parent }
    }

    pub fn parent(&self) -> Option<&Parent> {
        self.parent.as_ref()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<State>> {
        self.states.iter()
    }

    pub fn get(&self, index: usize) -> Result<&Arc<State>> {
        self.states.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.states.len(),
        })
    }

    /// A new registry holding the states in `start..end`, clamped to the registry.
    pub fn slice(&self, start: Option<usize>, end: Option<usize>) -> StateRegistry {
        let range = clamp_range(start, end, self.states.len());
        StateRegistry::new(self.states[range].to_vec(), self.parent.clone())
    }

    /// First state whose name contains `label`.
    pub fn find(&self, label: &str) -> Result<&Arc<State>> {
        trace!(label, "state lookup");
        self.states
            .iter()
            .find(|state| state.matches(label))
            .ok_or_else(|| Error::NotFound {
                key: label.to_string(),
            })
    }

    /// State closest in energy to `energy`, given in Hartree.
    pub fn nearest_energy(&self, energy: f64) -> Result<&Arc<State>> {
        self.nearest(Energy::hartree(energy))
    }

    /// State closest in energy to `energy`.
    pub fn nearest(&self, energy: Energy) -> Result<&Arc<State>> {
        self.states
            .iter()
            .map(|state| (state, (state.energy() - energy).abs().value_in(EnergyUnit::Hartree)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(state, _)| state)
            .ok_or_else(|| Error::NotFound {
                key: energy.to_string(),
            })
    }

    /// Joins two registries of the same parent, keeping the order of both.
    pub fn concat(&self, other: &StateRegistry) -> Result<StateRegistry> {
        if self.parent != other.parent {
            return Err(Error::ParentMismatch {
                left: Parent::describe(self.parent()),
                right: Parent::describe(other.parent()),
            });
        }
        let mut states = self.states.clone();
        states.extend(other.states.iter().cloned());
        Ok(StateRegistry::new(states, self.parent.clone()))
    }

    pub fn to_records(&self) -> Vec<StateRecord> {
        self.states.iter().map(|state| state.to_record()).collect()
    }
}

impl Add for StateRegistry {
    type Output = StateRegistry;

    /// # Panics
    ///
    /// If the registries have different parents. Use [StateRegistry::concat] to get an
    /// error instead.
    fn add(self, other: StateRegistry) -> StateRegistry {
        &self + &other
    }
}

impl<'a> Add<&'a StateRegistry> for &'a StateRegistry {
    type Output = StateRegistry;
    fn add(self, other: &'a StateRegistry) -> StateRegistry {
        match self.concat(other) {
            Ok(joined) => joined,
            Err(error) => panic!("{}", error),
        }
    }
}

impl fmt::Display for StateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, "States", &self.states)
    }
}

impl<'a> IntoIterator for &'a StateRegistry {
    type Item = &'a Arc<State>;
    type IntoIter = std::slice::Iter<'a, Arc<State>>;
    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    fn registry() -> StateRegistry {
        StateRegistry::new(
            vec![
                Arc::new(State::new("4d10.5s2", "1S0", 0.0, Energy::hartree(0.0))),
                Arc::new(State::new("4d10.5s.5p", "3P1", 1.0, Energy::hartree(0.066))),
                Arc::new(State::new("4d10.5s.5p", "1P1*", 1.0, Energy::hartree(0.099))),
            ],
            Some(Parent::Atom("Sr".into())),
        )
    }

    #[test]
    fn test_name_uses_valence() {
        let state = State::new("4d10.5s.5p", "1P1*", 1.0, Energy::zero());
        assert_eq!(state.valence(), "5p");
        assert_eq!(state.name(), "5p 1P1*");
        assert!(state.matches("1P1"));
        assert!(!state.matches("3P1"));
        let bare = State::new("5s2", "1S0", 0.0, Energy::zero());
        assert_eq!(bare.valence(), "5s2");
    }

    #[test]
    fn test_find_returns_first_match() {
        let states = registry();
        assert_eq!(states.find("5p").unwrap().term(), "3P1");
        assert!(matches!(states.find("3D2"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_nearest_energy() {
        let states = registry();
        assert_eq!(states.nearest_energy(0.09).unwrap().term(), "1P1*");
        assert_eq!(
            states.nearest(Energy::rydberg(0.13)).unwrap().term(),
            "3P1"
        );
    }

    #[test]
    fn test_index_and_slice() {
        let states = registry();
        assert!(matches!(
            states.get(3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        ));
        let head = states.slice(None, Some(2));
        assert_eq!(head.len(), 2);
        assert!(Arc::ptr_eq(head.get(1).unwrap(), states.get(1).unwrap()));
        assert_eq!(head.parent(), states.parent());
    }

    #[test]
    fn test_term_quantum_numbers() {
        let ls = State::new("4d10.5s.5p", "3P1*", 1.0, Energy::zero());
        assert_eq!(ls.coupling(), Some(CouplingScheme::LS));
        assert_eq!(ls.s(), Some(1.0));
        assert_eq!(ls.l(), Some(1));
        assert_eq!(ls.parity(), Some(-1));
        assert_eq!(ls.k(), None);

        let jj = State::new("4f13.6s.6p", "(7/2,3/2)2*", 2.0, Energy::zero());
        assert_eq!(jj.coupling(), Some(CouplingScheme::JJ));
        assert_eq!(jj.j1(), Some(3.5));
        assert_eq!(jj.j2(), Some(1.5));
        assert_eq!(jj.s(), None);

        let lk = State::new("4p5.5s2.4d", "2[3/2]1", 1.0, Energy::zero());
        assert_eq!(lk.coupling(), Some(CouplingScheme::LK));
        assert_eq!(lk.s(), Some(0.5));
        assert_eq!(lk.k(), Some(1.5));
        assert_eq!(lk.parity(), Some(1));

        let limit = State::new("5s", "Limit", 0.0, Energy::hartree(0.2));
        assert_eq!(limit.coupling(), None);
        assert_eq!(limit.parity(), None);
    }

    #[test]
    fn test_free_state_has_no_index() {
        let state = State::new("5s", "2S1/2", 0.5, Energy::zero());
        assert_eq!(state.index(), None);
        assert_eq!(state.with_index(2).index(), Some(2));
    }

    #[test]
    fn test_concat_keeps_order_and_parent() {
        let states = registry();
        let joined = states.slice(Some(2), None) + states.slice(None, Some(1));
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.get(0).unwrap().term(), "1P1*");
        assert!(Arc::ptr_eq(joined.get(1).unwrap(), states.get(0).unwrap()));
        assert_eq!(joined.parent(), states.parent());
        let borrowed = &states + &states;
        assert_eq!(borrowed.len(), 6);
    }

    #[test]
    fn test_concat_rejects_foreign_parent() {
        let states = registry();
        let other = StateRegistry::new(states.iter().cloned().collect(), None);
        assert!(matches!(
            states.concat(&other),
            Err(Error::ParentMismatch { .. })
        ));
    }

    #[test]
    #[should_panic]
    fn test_add_panics_on_foreign_parent() {
        let states = registry();
        let other = StateRegistry::new(Vec::new(), Some(Parent::Atom("Rb".into())));
        let _ = states + other;
    }

    #[test]
    fn test_polarizability_requires_model() {
        let state = State::new("5s2", "1S0", 0.0, Energy::zero());
        assert!(matches!(
            state.polarizability(1e-6, None),
            Err(Error::MissingPolarizability { .. })
        ));
    }

    #[test]
    fn test_record() {
        let record = State::new("5s", "2S1/2", 0.5, Energy::hartree(0.0)).to_record();
        assert_eq!(record.j, "1/2");
        assert_eq!(record.energy, "0 Eh");
        assert_eq!(format_half_integer(2.0), "2");
    }
}
