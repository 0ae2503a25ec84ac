//! Residue masses, chemical constants and charge-state conversions.
//!
//! Precursor masses are compared as singly protonated ions (Mh). The
//! conversions here are the only place the proton convention is applied.

use serde::{Deserialize, Serialize};

/// Monoisotopic masses of common groups, in daltons.
pub mod constants {
    /// Hydrogen (proton convention used for Mh).
    pub const H: f64 = 1.00782;
    /// Oxygen.
    pub const O: f64 = 15.9949141;
    /// Sodium.
    pub const NA: f64 = 22.98976928;
    /// Potassium.
    pub const K: f64 = 39.0983;
    /// Methylene.
    pub const CH2: f64 = 14.01565;
    /// Ammonia.
    pub const NH3: f64 = 17.02655;
    /// Water.
    pub const H2O: f64 = 18.01056;
    /// Carbon monoxide.
    pub const CO: f64 = 27.99492;
    /// Phosphoric acid.
    pub const H3PO4: f64 = 97.9769;
    /// Carbamidomethyl cysteine shift.
    pub const CARBAMIDOMETHYL: f64 = 57.0215;
}

/// Which residue mass table to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassType {
    /// Most abundant isotope masses.
    #[default]
    Monoisotopic,
    /// Isotope-weighted average masses.
    Average,
}

impl std::fmt::Display for MassType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MassType::Monoisotopic => write!(f, "monoisotopic"),
            MassType::Average => write!(f, "average"),
        }
    }
}

impl std::str::FromStr for MassType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monoisotopic" => Ok(MassType::Monoisotopic),
            "average" => Ok(MassType::Average),
            other => Err(other.to_string()),
        }
    }
}

const MONOISOTOPIC: &[(char, f64)] = &[
    ('G', 57.02146),
    ('A', 71.03711),
    ('S', 87.03203),
    ('P', 97.05276),
    ('V', 99.06841),
    ('T', 101.04768),
    ('C', 103.00918),
    ('L', 113.08406),
    ('I', 113.08406),
    ('N', 114.04293),
    ('D', 115.02694),
    ('Q', 128.05857),
    ('K', 128.09496),
    ('E', 129.04259),
    ('M', 131.04048),
    ('H', 137.05891),
    ('F', 147.06841),
    ('R', 156.10111),
    ('Y', 163.06333),
    ('W', 186.07931),
    // lower case: labelled or phosphorylated forms
    ('g', 57.02146),
    ('a', 71.03711),
    ('s', 167.002),
    ('p', 97.05276),
    ('v', 99.06841),
    ('t', 181.0177),
    ('c', 103.00918),
    ('l', 113.08406),
    ('i', 113.08406),
    ('n', 114.04293),
    ('d', 115.02694),
    ('q', 128.05857),
    ('k', 128.09496),
    ('e', 129.04259),
    ('m', 147.0305),
    ('h', 137.05891),
    ('f', 147.06841),
    ('r', 156.10111),
    ('y', 243.0333),
    ('w', 186.07931),
];

const AVERAGE: &[(char, f64)] = &[
    ('G', 57.05136),
    ('A', 71.07794),
    ('S', 87.07734),
    ('P', 97.11522),
    ('V', 99.1311),
    ('T', 101.10392),
    ('C', 103.14394),
    ('L', 113.15768),
    ('I', 113.15768),
    ('N', 114.10272),
    ('D', 115.08744),
    ('Q', 128.1293),
    ('K', 128.17236),
    ('E', 129.11402),
    ('M', 131.1971),
    ('H', 137.1394),
    ('F', 147.1739),
    ('R', 156.18584),
    ('Y', 163.1733),
    ('W', 186.20998),
];

/// Per-residue mass lookup for ASCII one-letter codes.
///
/// Residues without an entry weigh nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueMasses {
    masses: [f64; 128],
}

impl ResidueMasses {
    /// Empty table: every residue weighs zero.
    pub fn empty() -> Self {
        Self { masses: [0.0; 128] }
    }

    /// Standard amino acid masses of the given type.
    pub fn standard(mass_type: MassType) -> Self {
        let mut table = Self::empty();
        match mass_type {
            MassType::Monoisotopic => {
                for &(residue, mass) in MONOISOTOPIC {
                    table.set(residue, mass);
                }
            }
            MassType::Average => {
                for &(residue, mass) in AVERAGE {
                    table.set(residue, mass);
                    table.set(residue.to_ascii_lowercase(), mass);
                }
            }
        }
        table
    }

    /// Set the mass of one residue. Non-ASCII residues are ignored.
    pub fn set(&mut self, residue: char, mass: f64) {
        if residue.is_ascii() {
            self.masses[residue as usize] = mass;
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with_residue(mut self, residue: char, mass: f64) -> Self {
        self.set(residue, mass);
        self
    }

    /// Mass of a residue, zero when unknown.
    #[inline]
    pub fn get(&self, residue: char) -> f64 {
        if residue.is_ascii() {
            self.masses[residue as usize]
        } else {
            0.0
        }
    }

    /// Sum of residue masses.
    pub fn sum(&self, residues: impl IntoIterator<Item = char>) -> f64 {
        residues.into_iter().map(|r| self.get(r)).sum()
    }
}

impl Default for ResidueMasses {
    fn default() -> Self {
        Self::standard(MassType::Monoisotopic)
    }
}

/// Singly protonated mass from a neutral mass.
#[inline]
pub fn mh_from_m(m: f64) -> f64 {
    m + constants::H
}

/// Neutral mass from a singly protonated mass.
#[inline]
pub fn m_from_mh(mh: f64) -> f64 {
    mh - constants::H
}

/// m/z of a neutral mass carrying `charge` protons.
pub fn mz_from_m(m: f64, charge: u32) -> f64 {
    let z = f64::from(charge.max(1));
    (m + z * constants::H) / z
}

/// Neutral mass of an ion observed at `mz` with `charge` protons.
pub fn m_from_mz(mz: f64, charge: u32) -> f64 {
    let z = f64::from(charge.max(1));
    mz * z - z * constants::H
}
