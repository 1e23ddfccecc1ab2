//! Atoms: the states of an atomic species and the transitions between them.

use crate::constant::HBAR;
use crate::error::{Error, Result};
use crate::polarizability::{Coupling, SumOverStates};
use crate::state::{State, StateRecord, StateRegistry, StateSpec};
use crate::transition::{dipole_squared, Transition, TransitionRecord, TransitionRegistry};
use crate::units::Energy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The entity a registry belongs to.
///
/// The parent of a registry is the implicit other side of single-label lookups, so a
/// state's own registry never answers a label lookup with the state itself.
#[derive(Clone, Debug)]
pub enum Parent {
    /// An atom, identified by name.
    Atom(Arc<str>),
    /// A state, identified by identity.
    State(Arc<State>),
}

impl PartialEq for Parent {
    fn eq(&self, other: &Parent) -> bool {
        match (self, other) {
            (Parent::Atom(a), Parent::Atom(b)) => a == b,
            (Parent::State(a), Parent::State(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parent::Atom(name) => write!(f, "atom {}", name),
            Parent::State(state) => write!(f, "state {}", state.name()),
        }
    }
}

impl Parent {
    /// Names an optional parent for error messages.
    pub(crate) fn describe(parent: Option<&Parent>) -> String {
        parent.map_or_else(|| "no parent".to_string(), |p| p.to_string())
    }
}

/// A transition between two states of an [AtomBuilder], given by state index.
#[derive(Deserialize, Serialize, Clone, Copy, Debug)]
pub struct TransitionSpec {
    /// Index of the lower state.
    pub i: usize,
    /// Index of the upper state.
    pub f: usize,
    /// Decay rate, s^-1.
    pub gamma: f64,
}

/// Collects states and transitions and links them into an [Atom].
#[derive(Clone, Debug, Default)]
pub struct AtomBuilder {
    name: String,
    states: Vec<StateSpec>,
    transitions: Vec<TransitionSpec>,
}

impl AtomBuilder {
    pub fn new(name: &str) -> Self {
        AtomBuilder {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a state, returning its index.
    pub fn add_state(&mut self, spec: StateSpec) -> usize {
        self.states.push(spec);
        self.states.len() - 1
    }

    pub fn add_transition(&mut self, spec: TransitionSpec) {
        self.transitions.push(spec);
    }

    pub fn state(mut self, configuration: &str, term: &str, j: f64, energy: Energy) -> Self {
        self.add_state(StateSpec {
            configuration: configuration.to_string(),
            term: term.to_string(),
            j,
            energy,
        });
        self
    }

    /// Adds a transition from the lower state `i` to the upper state `f` decaying at
    /// `gamma` (s^-1).
    pub fn transition(mut self, i: usize, f: usize, gamma: f64) -> Self {
        self.add_transition(TransitionSpec { i, f, gamma });
        self
    }

    /// Links the states and transitions.
    ///
    /// Lifetimes follow from the decay rates out of each state and every state receives a
    /// sum-over-states polarizability built from the transitions that touch it.
    pub fn build(self) -> Result<Atom> {
        let n = self.states.len();
        for spec in &self.transitions {
            for index in [spec.i, spec.f] {
                if index >= n {
                    return Err(Error::UnknownState { index });
                }
            }
        }

        let mut decay_rates = vec![0.0; n];
        let mut couplings = vec![Vec::new(); n];
        for spec in &self.transitions {
            decay_rates[spec.f] += spec.gamma;
            let omega = (self.states[spec.f].energy - self.states[spec.i].energy).joules() / HBAR;
            if omega == 0.0 {
                continue;
            }
            let d2 = dipole_squared(omega.abs(), self.states[spec.f].j, spec.gamma);
            couplings[spec.i].push(Coupling {
                angular_frequency: omega,
                dipole_squared: d2,
            });
            couplings[spec.f].push(Coupling {
                angular_frequency: -omega,
                dipole_squared: d2,
            });
        }

        let name: Arc<str> = self.name.as_str().into();
        let states: Vec<Arc<State>> = self
            .states
            .iter()
            .zip(decay_rates.into_iter().zip(couplings))
            .enumerate()
            .map(|(index, (spec, (rate, couplings)))| {
                let lifetime = if rate > 0.0 { 1.0 / rate } else { f64::INFINITY };
                Arc::new(
                    State::from_spec(spec)
                        .with_index(index)
                        .with_lifetime(lifetime)
                        .with_polarizability(Arc::new(SumOverStates::new(spec.j, couplings))),
                )
            })
            .collect();
        let transitions = self
            .transitions
            .iter()
            .map(|spec| {
                Arc::new(Transition::new(
                    states[spec.i].clone(),
                    states[spec.f].clone(),
                    spec.gamma,
                ))
            })
            .collect();

        debug!(
            atom = %name,
            states = states.len(),
            transitions = self.transitions.len(),
            "built atom"
        );
        Ok(Atom {
            states: StateRegistry::new(states, Some(Parent::Atom(name.clone()))),
            transitions: TransitionRegistry::new(transitions, Some(Parent::Atom(name.clone()))),
            name,
        })
    }
}

/// An atomic species: its levels and the transitions between them.
#[derive(Clone, Debug)]
pub struct Atom {
    name: Arc<str>,
    states: StateRegistry,
    transitions: TransitionRegistry,
}

impl Atom {
    pub fn builder(name: &str) -> AtomBuilder {
        AtomBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &StateRegistry {
        &self.states
    }

    pub fn transitions(&self) -> &TransitionRegistry {
        &self.transitions
    }

    /// First state whose name contains `label`.
    pub fn state(&self, label: &str) -> Result<&Arc<State>> {
        self.states.find(label)
    }

    /// Transitions decaying out of `state`, owned by the state.
    pub fn down(&self, state: &Arc<State>) -> TransitionRegistry {
        self.owned_by(state, self.transitions.down_from(state))
    }

    /// Transitions exciting `state`, owned by the state.
    pub fn up(&self, state: &Arc<State>) -> TransitionRegistry {
        self.owned_by(state, self.transitions.up_from(state))
    }

    /// All transitions touching `state`, decays first. Label lookups in the result name the
    /// other state of each transition.
    pub fn transitions_of(&self, state: &Arc<State>) -> TransitionRegistry {
        self.down(state) + self.up(state)
    }

    fn owned_by(&self, state: &Arc<State>, registry: TransitionRegistry) -> TransitionRegistry {
        TransitionRegistry::new(
            registry.iter().cloned().collect(),
            Some(Parent::State(state.clone())),
        )
    }

    pub fn to_record(&self) -> AtomRecord {
        AtomRecord {
            name: self.name.to_string(),
            states: self.states.to_records(),
            transitions: self.transitions.to_records(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    /// Rebuilds an atom from its serialised form.
    pub fn from_record(record: &AtomRecord) -> Result<Atom> {
        let mut builder = AtomBuilder::new(&record.name);
        for state in &record.states {
            builder.add_state(StateSpec {
                configuration: state.configuration.clone(),
                term: state.term.clone(),
                j: parse_half_integer(&state.j)?,
                energy: parse_energy(&state.energy)?,
            });
        }
        for transition in &record.transitions {
            let gamma = transition.parse_gamma().ok_or_else(|| Error::InvalidRecord {
                field: "Gamma".to_string(),
                value: transition.gamma.clone(),
            })?;
            builder.add_transition(TransitionSpec {
                i: record_index("i", transition.i)?,
                f: record_index("f", transition.f)?,
                gamma,
            });
        }
        builder.build()
    }

    pub fn from_json(text: &str) -> Result<Atom> {
        let record: AtomRecord = serde_json::from_str(text)?;
        Atom::from_record(&record)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom({}, {} states, {} transitions)",
            self.name,
            self.states.len(),
            self.transitions.len()
        )
    }
}

fn record_index(field: &str, index: Option<usize>) -> Result<usize> {
    index.ok_or_else(|| Error::InvalidRecord {
        field: field.to_string(),
        value: "null".to_string(),
    })
}

fn parse_energy(text: &str) -> Result<Energy> {
    TransitionRecord::parse_energy(text).ok_or_else(|| Error::InvalidRecord {
        field: "energy".to_string(),
        value: text.to_string(),
    })
}

fn parse_half_integer(text: &str) -> Result<f64> {
    let invalid = || Error::InvalidRecord {
        field: "J".to_string(),
        value: text.to_string(),
    };
    match text.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.trim().parse().map_err(|_| invalid())?;
            let denominator: f64 = denominator.trim().parse().map_err(|_| invalid())?;
            Ok(numerator / denominator)
        }
        None => text.trim().parse().map_err(|_| invalid()),
    }
}

/// Serialised form of an [Atom].
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct AtomRecord {
    pub name: String,
    pub states: Vec<StateRecord>,
    pub transitions: Vec<TransitionRecord>,
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::constant::ATOMIC_POLARIZABILITY;
    use assert_approx_eq::assert_approx_eq;

    /// Ground state, one intermediate and one upper state with a cascade and a direct decay.
    fn cascade() -> Atom {
        Atom::builder("Test")
            .state("1s2", "1S0", 0.0, Energy::hartree(0.0))
            .state("1s.2p", "3P1", 1.0, Energy::hartree(0.05))
            .state("1s.3s", "3S1", 1.0, Energy::hartree(0.1))
            .transition(0, 1, 1.0e5)
            .transition(1, 2, 3.0e6)
            .transition(0, 2, 1.0e6)
            .build()
            .unwrap()
    }

    #[test]
    fn test_lifetimes_and_branching_ratios() {
        let atom = cascade();
        let upper = atom.states().get(2).unwrap();
        assert_approx_eq!(upper.lifetime(), 1.0 / 4.0e6, 1e-15);
        assert!(atom.states().get(0).unwrap().lifetime().is_infinite());
        let total: f64 = atom.down(upper).iter().map(|t| t.branching_ratio()).sum();
        assert_approx_eq!(total, 1.0, 1e-12);
    }

    #[test]
    fn test_state_views_are_owned_by_state() {
        let atom = cascade();
        let middle = atom.state("3P1").unwrap().clone();
        let own = atom.transitions_of(&middle);
        assert_eq!(own.len(), 2);
        assert_eq!(own.parent(), Some(&Parent::State(middle.clone())));
        // "1" occurs in every state name; the parent is skipped, so the ground state answers.
        let decay = own.find("1").unwrap();
        assert!(Arc::ptr_eq(decay.i(), atom.states().get(0).unwrap()));
        // The atom's own registry answers with its first transition touching a matching state.
        assert!(Arc::ptr_eq(&atom.transitions().find("3P1").unwrap(), &atom.transitions()[0]));
    }

    #[test]
    fn test_unknown_state_index() {
        let result = Atom::builder("Bad")
            .state("1s2", "1S0", 0.0, Energy::zero())
            .transition(0, 1, 1.0)
            .build();
        assert!(matches!(result, Err(Error::UnknownState { index: 1 })));
    }

    #[test]
    fn test_ground_state_polarizability_is_positive_below_resonance() {
        let atom = cascade();
        let ground = atom.states().get(0).unwrap();
        let alpha = ground.polarizability(f64::INFINITY, None).unwrap();
        assert!(alpha > 0.0);
        assert!(alpha / ATOMIC_POLARIZABILITY > 1.0);
    }

    #[test]
    fn test_record_round_trip_preserves_lines() {
        let atom = cascade();
        let rebuilt = Atom::from_json(&atom.to_json().unwrap()).unwrap();
        assert_eq!(rebuilt.to_record(), atom.to_record());
        let original = &atom.transitions()[1];
        let copy = &rebuilt.transitions()[1];
        assert_approx_eq!(copy.wavelength(), original.wavelength(), 1e-18);
        assert_eq!(atom.to_record().transitions[2].i, Some(0));
        assert_eq!(atom.to_record().transitions[2].f, Some(2));
    }

    #[test]
    fn test_record_without_state_index_is_rejected() {
        let mut record = cascade().to_record();
        record.transitions[0].f = None;
        assert!(matches!(
            Atom::from_record(&record),
            Err(Error::InvalidRecord { ref field, .. }) if field == "f"
        ));
    }

    #[test]
    fn test_built_states_carry_their_index() {
        let atom = cascade();
        for (position, state) in atom.states().iter().enumerate() {
            assert_eq!(state.index(), Some(position));
        }
    }

    #[test]
    fn test_parse_half_integer() {
        assert_eq!(parse_half_integer("3/2").unwrap(), 1.5);
        assert_eq!(parse_half_integer("2").unwrap(), 2.0);
        assert!(matches!(
            parse_half_integer("x"),
            Err(Error::InvalidRecord { .. })
        ));
    }
}
