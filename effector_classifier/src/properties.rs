//! Biochemical property tables for the 20 canonical amino acids.
//!
//! Each table is indexed by [`residue_index`]; all six share that single key set, so a
//! lookup either succeeds in every table or in none.

/// Number of per-residue properties, and therefore the width of a feature vector.
pub const PROPERTY_COUNT: usize = 6;

/// Property names in feature-vector order.
pub const PROPERTY_NAMES: [&str; PROPERTY_COUNT] = [
    "gravy",
    "hydrophobicity",
    "exposed",
    "disorder",
    "bulkiness",
    "interface",
];

/// Canonical one-letter codes in table order.
pub const AMINO_ACIDS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'Y',
];

// Kyte-Doolittle hydropathy
const GRAVY: [f64; 20] = [
    1.8, 2.5, -3.5, -3.5, 2.8, -0.4, -3.2, 4.5, -3.9, 3.8,
    1.9, -3.5, -1.6, -3.5, -4.5, -0.8, -0.7, 4.2, -0.9, -1.3,
];

// Eisenberg normalised consensus
const HYDROPHOBICITY: [f64; 20] = [
    0.62, 0.29, -0.90, -0.74, 1.19, 0.48, -0.40, 1.38, -1.50, 1.06,
    0.64, -0.78, 0.12, -0.85, -2.53, -0.18, -0.05, 1.08, 0.81, 0.26,
];

// Janin, % of residues found exposed
const EXPOSED: [f64; 20] = [
    15.0, 5.0, 50.0, 55.0, 10.0, 10.0, 34.0, 13.0, 85.0, 16.0,
    20.0, 49.0, 45.0, 56.0, 67.0, 32.0, 32.0, 14.0, 17.0, 41.0,
];

// TOP-IDP disorder propensity
const DISORDER: [f64; 20] = [
    0.06, 0.02, 0.192, 0.736, -0.697, 0.166, 0.303, -0.486, 0.586, -0.326,
    -0.397, 0.007, 0.987, 0.318, 0.180, 0.341, 0.059, -0.121, -0.884, -0.510,
];

// Zimmerman bulkiness
const BULKINESS: [f64; 20] = [
    11.50, 13.46, 11.68, 13.57, 19.80, 3.40, 13.69, 21.40, 15.71, 21.40,
    16.25, 12.82, 17.43, 14.45, 14.28, 9.47, 15.77, 21.57, 21.67, 18.03,
];

// Jones-Thornton interface propensity
const INTERFACE: [f64; 20] = [
    -0.17, 0.43, -0.38, -0.13, 0.82, -0.07, 0.41, 0.44, -0.36, 0.40,
    0.66, 0.12, -0.25, -0.11, 0.27, -0.33, -0.18, 0.27, 0.83, 0.66,
];

/// Maps a residue symbol to its table index, case-insensitively.
/// Ambiguity codes, gaps and stop symbols are not part of the table.
pub fn residue_index(residue: char) -> Option<usize> {
    match residue.to_ascii_uppercase() {
        'A' => Some(0),
        'C' => Some(1),
        'D' => Some(2),
        'E' => Some(3),
        'F' => Some(4),
        'G' => Some(5),
        'H' => Some(6),
        'I' => Some(7),
        'K' => Some(8),
        'L' => Some(9),
        'M' => Some(10),
        'N' => Some(11),
        'P' => Some(12),
        'Q' => Some(13),
        'R' => Some(14),
        'S' => Some(15),
        'T' => Some(16),
        'V' => Some(17),
        'W' => Some(18),
        'Y' => Some(19),
        _ => None,
    }
}

/// Returns the six properties of `residue` in feature-vector order, or `None` for
/// anything outside the canonical 20.
pub fn lookup(residue: char) -> Option<[f64; PROPERTY_COUNT]> {
    residue_index(residue).map(|i| {
        [
            GRAVY[i],
            HYDROPHOBICITY[i],
            EXPOSED[i],
            DISORDER[i],
            BULKINESS[i],
            INTERFACE[i],
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_code_is_covered_by_all_tables() {
        for &aa in AMINO_ACIDS.iter() {
            let props = lookup(aa).unwrap_or_else(|| panic!("missing {}", aa));
            assert!(props.iter().all(|v| v.is_finite()), "non-finite value for {}", aa);
            assert_eq!(residue_index(aa).map(|i| AMINO_ACIDS[i]), Some(aa));
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup('w'), lookup('W'));
        assert_eq!(lookup('a').unwrap()[0], 1.8);
    }

    #[test]
    fn non_canonical_symbols_are_not_found() {
        for sym in ['X', 'B', 'Z', 'J', 'U', 'O', '*', '-', '.', '1', ' '] {
            assert!(lookup(sym).is_none(), "{:?} should not be found", sym);
        }
    }
}
