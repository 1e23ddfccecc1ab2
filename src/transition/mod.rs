//! Electric dipole transitions between two states, and the line quantities derived from them.
//!
//! All derived quantities are in SI units, following `constant.rs`.

use crate::constant::{C, EPSILON0, H, HBAR, PI};
use crate::error::{Error, Result};
use crate::maths::SecantOptions;
use crate::polarizability::Polarizability;
use crate::state::State;
use crate::units::{Energy, EnergyUnit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod key;
pub mod registry;

pub use key::{Lookup, TransitionKey};
pub use registry::TransitionRegistry;

/// A spontaneous-emission transition from the upper state `f` to the lower state `i`.
#[derive(Clone, Debug)]
pub struct Transition {
    i: Arc<State>,
    f: Arc<State>,
    energy_i: Energy,
    energy_f: Energy,
    gamma: f64,
}

impl Transition {
    /// Creates a transition between `i` and `f` with decay rate `gamma` (s^-1), taking the
    /// line energies from the states.
    pub fn new(i: Arc<State>, f: Arc<State>, gamma: f64) -> Self {
        let energy_i = i.energy();
        let energy_f = f.energy();
        Transition {
            i,
            f,
            energy_i,
            energy_f,
            gamma,
        }
    }

    /// The lower (initial) state.
    pub fn i(&self) -> &Arc<State> {
        &self.i
    }

    /// The upper (final) state.
    pub fn f(&self) -> &Arc<State> {
        &self.f
    }

    pub fn energy_i(&self) -> Energy {
        self.energy_i
    }

    pub fn energy_f(&self) -> Energy {
        self.energy_f
    }

    /// Spontaneous decay rate, in units of s^-1.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Natural linewidth, Hz
    pub fn linewidth(&self) -> f64 {
        self.gamma / (2.0 * PI)
    }

    /// Angular frequency of the transition, rad/s.
    pub fn angular_frequency(&self) -> f64 {
        (self.energy_f - self.energy_i).joules() / HBAR
    }

    /// Frequency of the transition, Hz.
    pub fn frequency(&self) -> f64 {
        self.angular_frequency() / (2.0 * PI)
    }

    /// Wavelength of the transition, m. Infinite for degenerate states.
    pub fn wavelength(&self) -> f64 {
        let frequency = self.frequency();
        if frequency == 0.0 {
            return f64::INFINITY;
        }
        C / frequency
    }

    /// Saturation intensity, in units of W/m^2.
    pub fn saturation_intensity(&self) -> f64 {
        PI * H * C * self.gamma / (3.0 * self.wavelength().powi(3))
    }

    /// Fraction of the decays of the upper state that go through this transition.
    pub fn branching_ratio(&self) -> f64 {
        self.gamma * self.f.lifetime()
    }

    /// Reduced dipole matrix element `<f||d||i>`, C m.
    pub fn reduced_dipole_matrix_element(&self) -> f64 {
        dipole_squared(self.angular_frequency(), self.f.j(), self.gamma).sqrt()
    }

    /// Reduced dipole matrix element `<i||d||f> = (-1)^(Jf - Ji) <f||d||i>`, C m.
    pub fn reduced_dipole_matrix_element_conjugate(&self) -> f64 {
        let phase = (self.f.j() - self.i.j()).round() as i32;
        (-1.0_f64).powi(phase) * self.reduced_dipole_matrix_element()
    }

    /// Resonant scattering cross-section, m^2.
    pub fn cross_section(&self) -> f64 {
        HBAR * self.angular_frequency() * self.gamma / (2.0 * self.saturation_intensity())
    }

    /// Precalculated prefactor used in the determination of rate coefficients.
    pub fn rate_prefactor(&self) -> f64 {
        self.gamma.powi(3) / (self.saturation_intensity() * 8.0)
    }

    /// Wavelength (m) near `estimate` at which both states have the same polarizability.
    ///
    /// The search is a best effort: the last secant iterate is returned even if the
    /// evaluation budget in `options` ran out.
    ///
    /// # Arguments
    ///
    /// `estimate`: starting guess for the magic wavelength, m.
    ///
    /// `m_j_i`, `m_j_f`: magnetic sublevels of the lower and upper states.
    pub fn magic_wavelength(
        &self,
        estimate: f64,
        m_j_i: Option<f64>,
        m_j_f: Option<f64>,
        options: &SecantOptions,
    ) -> Result<f64> {
        let alpha_i = polarizability_model(&self.i)?;
        let alpha_f = polarizability_model(&self.f)?;
        let difference = |wavelength: f64| {
            alpha_i.polarizability(wavelength, m_j_i) - alpha_f.polarizability(wavelength, m_j_f)
        };
        Ok(options.solve(difference, estimate, None).x)
    }

    pub fn to_record(&self) -> TransitionRecord {
        TransitionRecord {
            i: self.i.index(),
            f: self.f.index(),
            energy_i: self.energy_i.to_string(),
            energy_f: self.energy_f.to_string(),
            gamma: format!("{} 1/s", self.gamma),
        }
    }
}

fn polarizability_model(state: &State) -> Result<&Arc<dyn Polarizability>> {
    state
        .polarizability_model()
        .ok_or_else(|| Error::MissingPolarizability { state: state.name() })
}

/// Squared reduced dipole matrix element of a transition of angular frequency `omega`
/// decaying at rate `gamma` from an upper state of angular momentum `j_upper`.
pub fn dipole_squared(omega: f64, j_upper: f64, gamma: f64) -> f64 {
    3.0 * PI * EPSILON0 * HBAR * C.powi(3) / omega.powi(3) * (2.0 * j_upper + 1.0) * gamma
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transition({} <---> {}, λ={:.4} nm, Γ=2π×{:.4} MHz)",
            self.i.name(),
            self.f.name(),
            self.wavelength() * 1e9,
            self.linewidth() * 1e-6
        )
    }
}

/// Serialised form of a [Transition]: state indices plus formatted energies and rate.
///
/// The indices are `null` for states that do not belong to an atom.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct TransitionRecord {
    pub i: Option<usize>,
    pub f: Option<usize>,
    #[serde(rename = "Ei")]
    pub energy_i: String,
    #[serde(rename = "Ef")]
    pub energy_f: String,
    #[serde(rename = "Gamma")]
    pub gamma: String,
}

impl TransitionRecord {
    /// Parses a formatted energy such as `"0.5 Eh"` back into an [Energy].
    pub fn parse_energy(text: &str) -> Option<Energy> {
        let mut parts = text.split_whitespace();
        let value = parts.next()?.parse::<f64>().ok()?;
        let unit = match parts.next()? {
            "Eh" => EnergyUnit::Hartree,
            "Ry" => EnergyUnit::Rydberg,
            "eV" => EnergyUnit::ElectronVolt,
            "J" => EnergyUnit::Joule,
            "1/cm" => EnergyUnit::InverseCentimetre,
            _ => return None,
        };
        Some(Energy::new(value, unit))
    }

    /// Decay rate in s^-1.
    pub fn parse_gamma(&self) -> Option<f64> {
        self.gamma.split_whitespace().next()?.parse::<f64>().ok()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::constant::ATOMIC_DIPOLE;
    use assert_approx_eq::assert_approx_eq;

    /// Rubidium 87 D2 line, [Steck, 87 D2].
    fn rubidium_d2() -> Transition {
        let ground = Arc::new(State::new("5s", "2S1/2", 0.5, Energy::zero()));
        let excited = Arc::new(
            State::new("5p", "2P3/2*", 1.5, Energy::inverse_cm(12_816.549_389))
                .with_lifetime(1.0 / 3.8117e7),
        );
        Transition::new(ground, excited, 3.8117e7)
    }

    #[derive(Debug)]
    struct Linear {
        slope: f64,
        offset: f64,
    }
    impl Polarizability for Linear {
        fn polarizability(&self, wavelength: f64, _m_j: Option<f64>) -> f64 {
            self.slope * wavelength + self.offset
        }
    }

    #[test]
    fn test_wavelength_and_frequency() {
        let d2 = rubidium_d2();
        assert_approx_eq!(d2.wavelength(), 780.241e-9, 1e-12);
        assert_approx_eq!(d2.frequency() / 384.230_484e12, 1.0, 1e-6);
        assert_approx_eq!(d2.linewidth(), 6.0666e6, 1e3);
    }

    #[test]
    fn test_saturation_intensity() {
        // Cycling transition saturation intensity of the D2 line is 1.669 mW/cm^2.
        let d2 = rubidium_d2();
        assert_approx_eq!(d2.saturation_intensity(), 16.69, 0.01);
    }

    #[test]
    fn test_reduced_dipole_matrix_element() {
        // <J=1/2||er||J'=3/2> = 5.977 e a0
        let d2 = rubidium_d2();
        assert_approx_eq!(d2.reduced_dipole_matrix_element() / ATOMIC_DIPOLE, 5.977, 0.005);
        assert_approx_eq!(
            d2.reduced_dipole_matrix_element_conjugate(),
            -d2.reduced_dipole_matrix_element(),
            1e-40
        );
    }

    #[test]
    fn test_branching_ratio_of_closed_transition() {
        assert_approx_eq!(rubidium_d2().branching_ratio(), 1.0, 1e-12);
    }

    #[test]
    fn test_cross_section() {
        // For a two level atom sigma_0 = 3 lambda^2 / 2 pi.
        let d2 = rubidium_d2();
        let expected = 3.0 * d2.wavelength().powi(2) / (2.0 * PI);
        assert_approx_eq!(d2.cross_section() / expected, 1.0, 1e-9);
    }

    #[test]
    fn test_degenerate_states_have_infinite_wavelength() {
        let a = Arc::new(State::new("5s", "2S1/2", 0.5, Energy::zero()));
        let b = Arc::new(State::new("5s", "2S1/2", 0.5, Energy::zero()));
        assert!(Transition::new(a, b, 1.0).wavelength().is_infinite());
    }

    #[test]
    fn test_magic_wavelength() {
        let ground = Arc::new(
            State::new("5s", "2S1/2", 0.5, Energy::zero()).with_polarizability(Arc::new(Linear {
                slope: 2.0,
                offset: 0.0,
            })),
        );
        let excited = Arc::new(
            State::new("5p", "2P3/2*", 1.5, Energy::inverse_cm(12_816.5)).with_polarizability(
                Arc::new(Linear {
                    slope: 1.0,
                    offset: 500e-9,
                }),
            ),
        );
        let transition = Transition::new(ground, excited, 3.8e7);
        let magic = transition
            .magic_wavelength(800e-9, None, None, &SecantOptions::default())
            .unwrap();
        assert_approx_eq!(magic, 500e-9, 1e-15);
    }

    #[test]
    fn test_magic_wavelength_requires_models() {
        let result = rubidium_d2().magic_wavelength(800e-9, None, None, &SecantOptions::default());
        assert!(matches!(result, Err(Error::MissingPolarizability { .. })));
    }

    #[test]
    fn test_record() {
        let record = rubidium_d2().to_record();
        assert_eq!(record.energy_i, "0 Eh");
        assert_eq!(record.parse_gamma(), Some(3.8117e7));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("Ei").is_some());
        assert!(json.get("Gamma").is_some());
        // Free-standing states have no position in an atom.
        assert_eq!(record.i, None);
        assert_eq!(json.get("f"), Some(&serde_json::Value::Null));
        let energy = TransitionRecord::parse_energy(&record.energy_f).unwrap();
        assert_approx_eq!(energy.value, 12_816.549_389, 1e-9);
    }
}
