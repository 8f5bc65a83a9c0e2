use std::sync::Arc;

use tracing::{info, warn};

use crate::batch::{build, RecordFailure, SequenceRecord};
use crate::classifier::{classify, EffectorClassifier};
use crate::errors::Result;
use crate::report::{format, PredictionRecord};

/// Predictions for one request, plus every record that could not be scored.
#[derive(Debug)]
pub struct PipelineReport {
    pub predictions: Vec<PredictionRecord>,
    pub failures: Vec<RecordFailure>,
    pub unrecognized_residues: usize,
}

impl PipelineReport {
    pub fn effector_count(&self) -> usize {
        self.predictions.iter().filter(|p| p.classification() == 1).count()
    }
}

/// Feature extraction and scoring around a model loaded once at startup.
#[derive(Clone)]
pub struct EffectorPipeline {
    model: Arc<dyn EffectorClassifier>,
}

impl EffectorPipeline {
    pub fn new(model: Arc<dyn EffectorClassifier>) -> Self {
        Self { model }
    }

    /// Scores `records` in input order.
    ///
    /// Records that cannot be featurised end up in `failures`; the others are still
    /// classified. Errors are returned only when the model itself misbehaves.
    pub fn run(&self, records: &[SequenceRecord]) -> Result<PipelineReport> {
        info!("Classifying {} sequences", records.len());
        let batch = build(records)?;

        let predictions = if batch.matrix.is_empty() {
            Vec::new()
        } else {
            let scored = classify(self.model.as_ref(), &batch.matrix)?;
            format(
                &batch.matrix.ids,
                &scored.labels.to_vec(),
                &scored.probabilities.to_vec(),
            )?
        };

        if !batch.failures.is_empty() {
            warn!("{} of {} records were not classified", batch.failures.len(), records.len());
        }

        let report = PipelineReport {
            predictions,
            failures: batch.failures,
            unrecognized_residues: batch.unrecognized_residues,
        };
        info!(
            "{} predicted effectors among {} classified sequences",
            report.effector_count(),
            report.predictions.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LogisticEffectorModel;
    use crate::errors::EffectorError;
    use crate::report::EffectorLabel;
    use ndarray::{Array1, Array2};

    struct AlwaysEffector;

    impl EffectorClassifier for AlwaysEffector {
        fn predict_probability(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
            Ok(Array1::from_elem(features.nrows(), 0.9))
        }
    }

    #[test]
    fn empty_record_fails_alone() {
        let pipeline = EffectorPipeline::new(Arc::new(AlwaysEffector));
        let records = vec![SequenceRecord::new("P1", "AAAA"), SequenceRecord::new("P2", "")];
        let report = pipeline.run(&records).unwrap();

        assert_eq!(report.predictions.len(), 1);
        let p1 = &report.predictions[0];
        assert_eq!(p1.protein_id, "P1");
        assert_eq!(p1.label, EffectorLabel::Effector);
        assert_eq!(p1.prediction(), "predicted effector");
        assert_eq!(p1.probability, 0.9);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].id, "P2");
        assert!(matches!(report.failures[0].error, EffectorError::EmptySequence { .. }));
    }

    #[test]
    fn no_records_means_no_predictions() {
        let pipeline = EffectorPipeline::new(Arc::new(AlwaysEffector));
        let report = pipeline.run(&[]).unwrap();
        assert!(report.predictions.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn logistic_model_end_to_end() {
        // Effector iff the sequence is hydrophilic on average
        let model = LogisticEffectorModel::new(
            [-4.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0; 6],
            [1.0; 6],
            0.0,
        );
        let pipeline = EffectorPipeline::new(Arc::new(model));
        let records = vec![
            SequenceRecord::new("hydrophobic", "IIVVLLFF"),
            SequenceRecord::new("hydrophilic", "KKDDEERR"),
            SequenceRecord::new("blank", ""),
            SequenceRecord::new("mixed", "kkddxx"),
        ];
        let report = pipeline.run(&records).unwrap();

        let ids: Vec<&str> = report.predictions.iter().map(|p| p.protein_id.as_str()).collect();
        assert_eq!(ids, vec!["hydrophobic", "hydrophilic", "mixed"]);
        let classes: Vec<u8> = report.predictions.iter().map(|p| p.classification()).collect();
        assert_eq!(classes, vec![0, 1, 1]);
        assert_eq!(report.effector_count(), 2);
        assert_eq!(report.unrecognized_residues, 2);
        assert_eq!(report.failures[0].index, 2);
        assert!(report
            .predictions
            .iter()
            .all(|p| (0.0..=1.0).contains(&p.probability)));
    }
}
