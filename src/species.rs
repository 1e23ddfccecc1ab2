//! Predefined species that can be used in atomspec.
//!
//! Level energies are NIST ASD values in cm^-1, decay rates are in s^-1.

use crate::atom::Atom;
use crate::constant::PI;
use crate::error::Result;
use crate::units::Energy;

/// 88Sr with the 461 nm broad and 689 nm narrow cooling lines.
pub fn strontium88() -> Result<Atom> {
    Atom::builder("88Sr")
        .state("4p6.5s2", "1S0", 0.0, Energy::inverse_cm(0.0))
        .state("4p6.5s.5p", "3P1*", 1.0, Energy::inverse_cm(14_504.334))
        .state("4p6.5s.5p", "1P1*", 1.0, Energy::inverse_cm(21_698.452))
        .transition(0, 1, 2.0 * PI * 7_400.0) // [Schreck2013]
        .transition(0, 2, 2.0 * PI * 32e6) // [Nosske2017]
        .build()
}

/// 87Rb with the D1 and D2 lines.
pub fn rubidium87() -> Result<Atom> {
    Atom::builder("87Rb")
        .state("[Kr].5s", "2S1/2", 0.5, Energy::inverse_cm(0.0))
        .state("[Kr].5p", "2P1/2*", 0.5, Energy::inverse_cm(12_578.950))
        .state("[Kr].5p", "2P3/2*", 1.5, Energy::inverse_cm(12_816.549_389))
        .transition(0, 1, 3.6129e7) // [Steck, 87 D1]
        .transition(0, 2, 3.8117e7) // [Steck, 87 D2]
        .build()
}
