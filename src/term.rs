//! Term symbols of atomic states.
//!
//! Three coupling schemes are recognised, after NIST ASD notation:
//! * LS coupling, `2S+1 L J`, eg `3P1*`.
//! * JJ coupling, `(J1,J2) J`, eg `(3/2,1/2)2*`.
//! * LK coupling, `2S+1 [K] J`, eg `2[3/2]1`.
//!
//! A trailing `*` marks odd parity. The ionization limit is written `Limit`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Spectroscopic letters of the orbital angular momentum, indexed by `L`.
const ORBITAL_LETTERS: [char; 16] = [
    'S', 'P', 'D', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'O', 'Q', 'R', 'T', 'U',
];

/// Angular momentum coupling scheme of a term symbol.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CouplingScheme {
    LS,
    JJ,
    LK,
}

impl fmt::Display for CouplingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CouplingScheme::LS => "LS",
            CouplingScheme::JJ => "JJ",
            CouplingScheme::LK => "LK",
        };
        f.write_str(name)
    }
}

/// Quantum numbers read from a term symbol.
///
/// Fields that the coupling scheme does not define are `None`. Unrecognised terms keep
/// only their parity, and `Limit` has neither coupling nor parity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Term {
    pub coupling: Option<CouplingScheme>,
    /// Total spin `S`.
    pub s: Option<f64>,
    /// Orbital angular momentum `L`.
    pub l: Option<u32>,
    pub j1: Option<f64>,
    pub j2: Option<f64>,
    pub k: Option<f64>,
    /// `-1` for odd, `+1` for even parity.
    pub parity: Option<i8>,
}

/// Compiles `pattern` into `cell` on first use.
fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn ls_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&PATTERN, r"^(\d+)([A-Z])")
}

fn jj_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&PATTERN, r"^\((\d+/?\d*),(\d+/?\d*)\)")
}

fn lk_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&PATTERN, r"^(\d+)\[(\d+/?\d*)\]")
}

impl Term {
    /// Parses a term symbol such as `2P3/2*`.
    pub fn parse(symbol: &str) -> Self {
        if symbol == "Limit" {
            return Term::default();
        }
        let parity = Some(if symbol.contains('*') { -1 } else { 1 });
        Term::parse_ls(symbol)
            .or_else(|| Term::parse_jj(symbol))
            .or_else(|| Term::parse_lk(symbol))
            .map(|term| Term { parity, ..term })
            .unwrap_or(Term {
                parity,
                ..Term::default()
            })
    }

    fn parse_ls(symbol: &str) -> Option<Self> {
        let captures = ls_pattern()?.captures(symbol)?;
        let letter = captures[2].chars().next()?;
        let l = ORBITAL_LETTERS.iter().position(|&c| c == letter)?;
        Some(Term {
            coupling: Some(CouplingScheme::LS),
            s: Some(spin_from_multiplicity(&captures[1])?),
            l: Some(l as u32),
            ..Term::default()
        })
    }

    fn parse_jj(symbol: &str) -> Option<Self> {
        let captures = jj_pattern()?.captures(symbol)?;
        Some(Term {
            coupling: Some(CouplingScheme::JJ),
            j1: Some(parse_fraction(&captures[1])?),
            j2: Some(parse_fraction(&captures[2])?),
            ..Term::default()
        })
    }

    fn parse_lk(symbol: &str) -> Option<Self> {
        let captures = lk_pattern()?.captures(symbol)?;
        Some(Term {
            coupling: Some(CouplingScheme::LK),
            s: Some(spin_from_multiplicity(&captures[1])?),
            k: Some(parse_fraction(&captures[2])?),
            ..Term::default()
        })
    }

    /// Spectroscopic letter of `L`, if the term defines one.
    pub fn orbital_letter(&self) -> Option<char> {
        self.l.and_then(|l| ORBITAL_LETTERS.get(l as usize).copied())
    }
}

fn spin_from_multiplicity(text: &str) -> Option<f64> {
    let multiplicity: u32 = text.parse().ok()?;
    if multiplicity == 0 {
        return None;
    }
    Some((multiplicity - 1) as f64 / 2.0)
}

/// Parses `3/2` or `2` into a float.
fn parse_fraction(text: &str) -> Option<f64> {
    match text.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: f64 = numerator.parse().ok()?;
            let denominator: f64 = denominator.parse().ok()?;
            if denominator == 0.0 {
                None
            } else {
                Some(numerator / denominator)
            }
        }
        None => text.parse().ok(),
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_ls_term() {
        let term = Term::parse("2P3/2*");
        assert_eq!(term.coupling, Some(CouplingScheme::LS));
        assert_eq!(term.s, Some(0.5));
        assert_eq!(term.l, Some(1));
        assert_eq!(term.orbital_letter(), Some('P'));
        assert_eq!(term.parity, Some(-1));
        assert_eq!(term.j1, None);
        assert_eq!(term.k, None);
    }

    #[test]
    fn test_ls_triplet() {
        let term = Term::parse("3D2");
        assert_eq!(term.s, Some(1.0));
        assert_eq!(term.l, Some(2));
        assert_eq!(term.parity, Some(1));
    }

    #[test]
    fn test_jj_term() {
        let term = Term::parse("(3/2,1/2)2*");
        assert_eq!(term.coupling, Some(CouplingScheme::JJ));
        assert_eq!(term.j1, Some(1.5));
        assert_eq!(term.j2, Some(0.5));
        assert_eq!(term.s, None);
        assert_eq!(term.l, None);
        assert_eq!(term.parity, Some(-1));
    }

    #[test]
    fn test_lk_term() {
        let term = Term::parse("2[3/2]1");
        assert_eq!(term.coupling, Some(CouplingScheme::LK));
        assert_eq!(term.s, Some(0.5));
        assert_eq!(term.k, Some(1.5));
        assert_eq!(term.l, None);
        assert_eq!(term.parity, Some(1));
    }

    #[test]
    fn test_limit_has_no_quantum_numbers() {
        assert_eq!(Term::parse("Limit"), Term::default());
    }

    #[test]
    fn test_unknown_term_keeps_parity() {
        let term = Term::parse("x*");
        assert_eq!(term.coupling, None);
        assert_eq!(term.parity, Some(-1));
    }

    #[test]
    fn test_unknown_orbital_letter() {
        assert_eq!(Term::parse("2J1").coupling, None);
    }
}
