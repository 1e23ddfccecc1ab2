//! Energies that carry their unit.
//!
//! Every other derived quantity in the crate is a bare `f64` in SI units. Energies are
//! the exception because level data is tabulated in a zoo of spectroscopic units, and
//! because energy lookups must know whether a bare number means Hartree or something else.

use crate::constant::{ELECTRON_CHARGE, HARTREE, INVERSE_CM, RYDBERG};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// Units in which an [Energy] may be expressed.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyUnit {
    /// Atomic unit of energy, `E_h`.
    Hartree,
    Rydberg,
    ElectronVolt,
    Joule,
    /// Wavenumber, cm^-1.
    InverseCentimetre,
}

impl EnergyUnit {
    /// Size of one of this unit, in Joules.
    pub fn in_joules(&self) -> f64 {
        match self {
            EnergyUnit::Hartree => HARTREE,
            EnergyUnit::Rydberg => RYDBERG,
            EnergyUnit::ElectronVolt => ELECTRON_CHARGE,
            EnergyUnit::Joule => 1.0,
            EnergyUnit::InverseCentimetre => INVERSE_CM,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            EnergyUnit::Hartree => "Eh",
            EnergyUnit::Rydberg => "Ry",
            EnergyUnit::ElectronVolt => "eV",
            EnergyUnit::Joule => "J",
            EnergyUnit::InverseCentimetre => "1/cm",
        }
    }
}

/// An energy together with the unit it is expressed in.
///
/// Comparisons and arithmetic between energies of different units convert the right-hand
/// operand into the unit of the left-hand operand.
#[derive(Deserialize, Serialize, Clone, Copy, Debug)]
pub struct Energy {
    pub value: f64,
    pub unit: EnergyUnit,
}

impl Energy {
    pub fn new(value: f64, unit: EnergyUnit) -> Self {
        Energy { value, unit }
    }

    /// Creates an energy in atomic units, which is how bare numbers are interpreted by lookups.
    pub fn hartree(value: f64) -> Self {
        Energy::new(value, EnergyUnit::Hartree)
    }

    pub fn rydberg(value: f64) -> Self {
        Energy::new(value, EnergyUnit::Rydberg)
    }

    pub fn inverse_cm(value: f64) -> Self {
        Energy::new(value, EnergyUnit::InverseCentimetre)
    }

    pub fn zero() -> Self {
        Energy::hartree(0.0)
    }

    /// Express the energy in a different unit.
    pub fn to(&self, unit: EnergyUnit) -> Self {
        if unit == self.unit {
            return *self;
        }
        Energy::new(self.value * self.unit.in_joules() / unit.in_joules(), unit)
    }

    /// Value of the energy in the given unit.
    pub fn value_in(&self, unit: EnergyUnit) -> f64 {
        self.to(unit).value
    }

    /// Value of the energy in SI units of Joules.
    pub fn joules(&self) -> f64 {
        self.value * self.unit.in_joules()
    }

    pub fn abs(&self) -> Self {
        Energy::new(self.value.abs(), self.unit)
    }
}

impl Sub for Energy {
    type Output = Energy;
    fn sub(self, rhs: Energy) -> Energy {
        Energy::new(self.value - rhs.value_in(self.unit), self.unit)
    }
}

impl PartialEq for Energy {
    fn eq(&self, other: &Energy) -> bool {
        self.value == other.value_in(self.unit)
    }
}

impl PartialOrd for Energy {
    fn partial_cmp(&self, other: &Energy) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value_in(self.unit))
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*} {}", p, self.value, self.unit.symbol()),
            None => write!(f, "{} {}", self.value, self.unit.symbol()),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_rydberg_is_half_hartree() {
        let e = Energy::rydberg(1.0).to(EnergyUnit::Hartree);
        assert_approx_eq!(e.value, 0.5, 1e-12);
    }

    #[test]
    fn test_wavenumber_to_hartree() {
        // One Hartree is 219474.63 cm^-1.
        let e = Energy::inverse_cm(219_474.631_363);
        assert_approx_eq!(e.value_in(EnergyUnit::Hartree), 1.0, 1e-8);
    }

    #[test]
    fn test_mixed_unit_difference() {
        let a = Energy::hartree(1.0);
        let b = Energy::rydberg(1.0);
        let d = a - b;
        assert_eq!(d.unit, EnergyUnit::Hartree);
        assert_approx_eq!(d.value, 0.5, 1e-12);
        assert!(b < a);
        assert!((b - a).abs() == Energy::hartree(0.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Energy::hartree(0.25)), "0.25 Eh");
        assert_eq!(format!("{:.2}", Energy::inverse_cm(1.0)), "1.00 1/cm");
    }
}
