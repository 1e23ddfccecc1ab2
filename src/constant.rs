/// Reduced plank constant in SI units
pub const HBAR: f64 = 1.054_571_817e-34;

/// Planck constant in SI units
pub const H: f64 = 2.0 * PI * HBAR;

/// Mathematica constant pi
pub const PI: f64 = std::f64::consts::PI;

/// Speed of light in SI units of m/s
pub const C: f64 = 299_792_458.0;

/// Vacuum permittivity in SI units of F/m
pub const EPSILON0: f64 = 8.854_187_812_8e-12;

/// Elementary charge in Coulombs
pub const ELECTRON_CHARGE: f64 = 1.602_176_634e-19;

/// The Hartree energy in Joules.
pub const HARTREE: f64 = 4.359_744_722_207_1e-18;

/// The Rydberg energy in Joules, half a Hartree.
pub const RYDBERG: f64 = HARTREE / 2.0;

/// One inverse centimetre of wavenumber expressed as an energy in Joules.
pub const INVERSE_CM: f64 = H * C * 100.0;

/// The Bohr radius in metres.
pub const BOHR_RADIUS: f64 = 5.291_772_109_03e-11;

/// Atomic unit of electric dipole moment, e*a0, in C m.
pub const ATOMIC_DIPOLE: f64 = ELECTRON_CHARGE * BOHR_RADIUS;

/// Atomic unit of polarizability in C m^2 / V.
pub const ATOMIC_POLARIZABILITY: f64 =
    4.0 * PI * EPSILON0 * BOHR_RADIUS * BOHR_RADIUS * BOHR_RADIUS;
