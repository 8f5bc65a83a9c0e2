use ndarray::Array2;
use tracing::{info, warn};

use crate::errors::{EffectorError, Result};
use crate::features::{extract_with_diagnostics, FeatureVector};
use crate::properties::PROPERTY_COUNT;

/// One protein as handed over by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub sequence: String,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }
}

/// Feature rows, row `i` belonging to `ids[i]`.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub ids: Vec<String>,
    pub rows: Array2<f64>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<FeatureVector> {
        if i >= self.len() {
            return None;
        }
        let mut values = [0.0; PROPERTY_COUNT];
        for (v, x) in values.iter_mut().zip(self.rows.row(i)) {
            *v = *x;
        }
        Some(FeatureVector(values))
    }
}

/// A record that could not be turned into features.
#[derive(Debug)]
pub struct RecordFailure {
    /// Position of the record in the caller's input
    pub index: usize,
    pub id: String,
    pub error: EffectorError,
}

#[derive(Debug)]
pub struct BatchFeatures {
    pub matrix: FeatureMatrix,
    pub failures: Vec<RecordFailure>,
    /// Unrecognized residues across all featurised records
    pub unrecognized_residues: usize,
}

/// Featurises every record in input order.
///
/// Records that fail are left out of the matrix and reported in `failures`; the rest of
/// the batch still goes through.
pub fn build(records: &[SequenceRecord]) -> Result<BatchFeatures> {
    let mut ids = Vec::with_capacity(records.len());
    let mut flat = Vec::with_capacity(records.len() * PROPERTY_COUNT);
    let mut failures = Vec::new();
    let mut unrecognized_residues = 0;

    for (index, record) in records.iter().enumerate() {
        match extract_with_diagnostics(&record.sequence) {
            Ok((features, diag)) => {
                ids.push(record.id.clone());
                flat.extend_from_slice(features.values());
                unrecognized_residues += diag.unrecognized;
            }
            Err(e) => {
                let error = match e {
                    EffectorError::EmptySequence { .. } => EffectorError::empty_sequence(&record.id),
                    other => other,
                };
                warn!("Skipping record {} ('{}'): {}", index, record.id, error);
                failures.push(RecordFailure {
                    index,
                    id: record.id.clone(),
                    error,
                });
            }
        }
    }

    let rows = Array2::from_shape_vec((ids.len(), PROPERTY_COUNT), flat)?;

    info!(
        "Built features for {} of {} records ({} failed, {} unrecognized residues)",
        ids.len(),
        records.len(),
        failures.len(),
        unrecognized_residues
    );

    Ok(BatchFeatures {
        matrix: FeatureMatrix { ids, rows },
        failures,
        unrecognized_residues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract;

    #[test]
    fn rows_stay_aligned_with_ids() {
        let records = vec![
            SequenceRecord::new("a", "MKV"),
            SequenceRecord::new("b", "WWWW"),
            SequenceRecord::new("c", "GGSX"),
            SequenceRecord::new("a", "DEKR"),
        ];
        let batch = build(&records).unwrap();
        assert!(batch.failures.is_empty());
        assert_eq!(batch.matrix.ids, vec!["a", "b", "c", "a"]);
        assert_eq!(batch.matrix.rows.dim(), (4, PROPERTY_COUNT));
        for (i, rec) in records.iter().enumerate() {
            assert_eq!(batch.matrix.row(i), Some(extract(&rec.sequence).unwrap()));
        }
        assert_eq!(batch.unrecognized_residues, 1);
    }

    #[test]
    fn empty_records_are_reported_not_dropped_silently() {
        let records = vec![
            SequenceRecord::new("P1", "AAAA"),
            SequenceRecord::new("P2", ""),
            SequenceRecord::new("P3", "WY"),
        ];
        let batch = build(&records).unwrap();
        assert_eq!(batch.matrix.ids, vec!["P1", "P3"]);
        assert_eq!(batch.matrix.row(1), Some(extract("WY").unwrap()));

        assert_eq!(batch.failures.len(), 1);
        let failure = &batch.failures[0];
        assert_eq!(failure.index, 1);
        assert_eq!(failure.id, "P2");
        assert!(matches!(&failure.error, EffectorError::EmptySequence { id } if id == "P2"));
    }

    #[test]
    fn no_records_is_an_empty_batch() {
        let batch = build(&[]).unwrap();
        assert!(batch.matrix.is_empty());
        assert_eq!(batch.matrix.rows.dim(), (0, PROPERTY_COUNT));
        assert!(batch.failures.is_empty());
    }
}
