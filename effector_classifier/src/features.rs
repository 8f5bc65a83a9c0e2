use tracing::debug;

use crate::errors::{EffectorError, Result};
use crate::properties::{lookup, PROPERTY_COUNT, PROPERTY_NAMES};

/// Only the first `MAX_RESIDUES` residues contribute to a feature vector.
pub const MAX_RESIDUES: usize = 900;

/// Mean biochemical properties of one sequence, in [`PROPERTY_NAMES`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; PROPERTY_COUNT]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; PROPERTY_COUNT] {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        PROPERTY_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.0[i])
    }
}

/// Residue counts behind a feature vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionDiagnostics {
    /// Residues inside the averaging window (the divisor)
    pub effective_length: usize,
    /// Residues inside the window missing from the property table
    pub unrecognized: usize,
    /// Residues past the window that were ignored
    pub truncated: usize,
}

/// Averages the six residue properties over the first [`MAX_RESIDUES`] residues.
///
/// Unrecognized residues add nothing to the sums but still count in the divisor, so they
/// pull every feature towards zero.
///
/// # Errors
///
/// * [`EffectorError::EmptySequence`] when the sequence has no residues
pub fn extract(sequence: &str) -> Result<FeatureVector> {
    extract_with_diagnostics(sequence).map(|(features, _)| features)
}

/// Same as [`extract`], also reporting how many residues were used, unknown or ignored.
pub fn extract_with_diagnostics(sequence: &str) -> Result<(FeatureVector, ExtractionDiagnostics)> {
    let total = sequence.chars().count();
    let length = total.min(MAX_RESIDUES);
    if length == 0 {
        return Err(EffectorError::empty_sequence(""));
    }

    let mut sums = [0.0_f64; PROPERTY_COUNT];
    let mut unrecognized = 0;

    for residue in sequence.chars().take(length) {
        match lookup(residue) {
            Some(props) => {
                for (sum, value) in sums.iter_mut().zip(props) {
                    *sum += value;
                }
            }
            None => unrecognized += 1,
        }
    }

    if unrecognized > 0 {
        debug!("{} of {} residues not in the property table", unrecognized, length);
    }

    let divisor = length as f64;
    let features = FeatureVector(sums.map(|s| s / divisor));
    let diagnostics = ExtractionDiagnostics {
        effective_length: length,
        unrecognized,
        truncated: total - length,
    };
    Ok((features, diagnostics))
}
