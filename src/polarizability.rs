//! Dynamic dipole polarizabilities of atomic states.

use crate::constant::{C, HBAR, PI};
use std::fmt;

/// The polarizability of a state as a function of the wavelength of the light field.
pub trait Polarizability: fmt::Debug + Send + Sync {
    /// Polarizability at `wavelength` (m), in SI units of C m^2 / V.
    ///
    /// `m_j` selects the magnetic sublevel for models that resolve tensor contributions.
    fn polarizability(&self, wavelength: f64, m_j: Option<f64>) -> f64;
}

/// Dipole coupling of a state to one other state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coupling {
    /// Angular frequency `(E_k - E_i) / hbar` of the partner state `k` relative to this
    /// state, rad/s.
    ///
    /// Negative when the partner lies below this state.
    pub angular_frequency: f64,
    /// Squared reduced dipole matrix element of the transition, (C m)^2.
    pub dipole_squared: f64,
}

/// Scalar polarizability from a sum over the dipole couplings of a state.
///
/// `alpha(w) = 2 / (3 hbar (2J + 1)) * sum_k w_k |<k||d||i>|^2 / (w_k^2 - w^2)`
///
/// Only the couplings that are known to the atom contribute, so the result is as complete as
/// the transition list it was built from. The scalar model is independent of `m_J`.
#[derive(Clone, Debug, Default)]
pub struct SumOverStates {
    pub j: f64,
    pub couplings: Vec<Coupling>,
}

impl SumOverStates {
    pub fn new(j: f64, couplings: Vec<Coupling>) -> Self {
        SumOverStates { j, couplings }
    }
}

impl Polarizability for SumOverStates {
    fn polarizability(&self, wavelength: f64, _m_j: Option<f64>) -> f64 {
        let omega = 2.0 * PI * C / wavelength;
        let prefactor = 2.0 / (3.0 * HBAR * (2.0 * self.j + 1.0));
        prefactor
            * self
                .couplings
                .iter()
                .map(|c| {
                    c.angular_frequency * c.dipole_squared
                        / (c.angular_frequency.powi(2) - omega.powi(2))
                })
                .sum::<f64>()
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_static_limit() {
        let model = SumOverStates::new(
            0.0,
            vec![Coupling {
                angular_frequency: 2.0e15,
                dipole_squared: 1.0e-57,
            }],
        );
        let expected = 2.0 / (3.0 * HBAR) * 1.0e-57 / 2.0e15;
        assert_approx_eq!(
            model.polarizability(f64::INFINITY, None) / expected,
            1.0,
            1e-12
        );
    }

    #[test]
    fn test_sign_change_across_resonance() {
        let omega0: f64 = 2.0e15;
        let resonance = 2.0 * PI * C / omega0;
        let model = SumOverStates::new(
            0.5,
            vec![Coupling {
                angular_frequency: omega0,
                dipole_squared: 1.0e-57,
            }],
        );
        // red detuned light gives a positive polarizability, blue detuned a negative one.
        assert!(model.polarizability(resonance * 1.01, None) > 0.0);
        assert!(model.polarizability(resonance * 0.99, None) < 0.0);
    }
}
