//! classifier.rs – narrow boundary around a pre-trained effector model, plus the
//! standardised logistic model format loaded at startup

use std::collections::HashMap;
use std::path::Path;

use linfa_logistic::FittedLogisticRegression;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::batch::FeatureMatrix;
use crate::errors::{EffectorError, Result};
use crate::properties::{PROPERTY_COUNT, PROPERTY_NAMES};

/// Probabilities at or above this value are labelled effector (1).
pub const DECISION_THRESHOLD: f64 = 0.5;

/// A trained binary classifier over six-wide feature rows.
///
/// Implementations are loaded once and shared read-only between requests.
pub trait EffectorClassifier: Send + Sync {
    /// Probability of the effector class for every row.
    fn predict_probability(&self, features: &Array2<f64>) -> Result<Array1<f64>>;

    /// 0 (non-effector) or 1 (effector) for every row.
    fn predict(&self, features: &Array2<f64>) -> Result<Array1<u8>> {
        let prob = self.predict_probability(features)?;
        Ok(prob.mapv(|p| u8::from(p >= DECISION_THRESHOLD)))
    }
}

/// Labels and probabilities, index-aligned with the scored matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub labels: Array1<u8>,
    pub probabilities: Array1<f64>,
}

/// Scores a feature matrix with `model`.
pub fn classify<M: EffectorClassifier + ?Sized>(model: &M, matrix: &FeatureMatrix) -> Result<Classification> {
    check_width(&matrix.rows)?;

    let labels = model.predict(&matrix.rows)?;
    let probabilities = model.predict_probability(&matrix.rows)?;

    if labels.len() != matrix.len() || probabilities.len() != matrix.len() {
        return Err(EffectorError::LengthMismatch {
            ids: matrix.len(),
            labels: labels.len(),
            probabilities: probabilities.len(),
        });
    }
    // NaN fails the range check too
    if let Some((row, &value)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        error!("Model returned probability {} for row {} ('{}')", value, row, matrix.ids[row]);
        return Err(EffectorError::InvalidProbability { row, value });
    }
    Ok(Classification { labels, probabilities })
}

fn check_width(features: &Array2<f64>) -> Result<()> {
    let width = features.len_of(Axis(1));
    if width != PROPERTY_COUNT {
        return Err(EffectorError::FeatureWidth {
            expected: PROPERTY_COUNT,
            actual: width,
        });
    }
    Ok(())
}

// ───────── logistic model ─────────

/// On-disk form of a logistic model, keyed by feature name.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogisticModelData {
    betas: HashMap<String, f64>,
    means: HashMap<String, f64>,
    stds: HashMap<String, f64>,
    intercept: f64,
}

/// Logistic regression over z-scored features.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticEffectorModel {
    betas: Array1<f64>,
    means: Array1<f64>,
    stds: Array1<f64>,
    intercept: f64,
}

impl LogisticEffectorModel {
    pub fn new(
        betas: [f64; PROPERTY_COUNT],
        means: [f64; PROPERTY_COUNT],
        stds: [f64; PROPERTY_COUNT],
        intercept: f64,
    ) -> Self {
        Self {
            betas: Array1::from(betas.to_vec()),
            means: Array1::from(means.to_vec()),
            stds: Array1::from(stds.map(|s| s.max(1e-9)).to_vec()),
            intercept,
        }
    }

    /// Wraps a model fitted with linfa on features standardised by `means` / `stds`.
    ///
    /// linfa scores whichever label it picked as positive; when that is 0 the weights and
    /// intercept are negated so the probability is always that of label 1.
    pub fn from_fitted(
        fitted: &FittedLogisticRegression<f64, u8>,
        means: [f64; PROPERTY_COUNT],
        stds: [f64; PROPERTY_COUNT],
    ) -> Result<Self> {
        let params = fitted.params();
        if params.len() != PROPERTY_COUNT {
            return Err(EffectorError::FeatureWidth {
                expected: PROPERTY_COUNT,
                actual: params.len(),
            });
        }
        let labels = fitted.labels();
        let sign = match (labels.pos.class, labels.neg.class) {
            (1, 0) => 1.0,
            (0, 1) => -1.0,
            (pos, neg) => {
                return Err(EffectorError::ModelUnavailable(format!(
                    "expected classes 0 and 1, model was fitted on {} and {}",
                    neg, pos
                )))
            }
        };
        let mut betas = [0.0; PROPERTY_COUNT];
        for (b, p) in betas.iter_mut().zip(params.iter()) {
            *b = sign * *p;
        }
        Ok(Self::new(betas, means, stds, sign * fitted.intercept()))
    }

    /// Reads a model written by [`LogisticEffectorModel::save`].
    ///
    /// Any failure is reported as [`EffectorError::ModelUnavailable`]; callers should not
    /// start serving without a model.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            error!("Failed to read model file {}: {}", path.display(), e);
            EffectorError::ModelUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let data: LogisticModelData = serde_json::from_str(&json).map_err(|e| {
            EffectorError::ModelUnavailable(format!("failed to parse {}: {}", path.display(), e))
        })?;
        let model = Self::from_data(&data)?;

        info!("Loaded logistic effector model from {}", path.display());
        for (j, name) in PROPERTY_NAMES.iter().enumerate() {
            info!(
                "{:<15} β = {:>10.6}  μ = {:>10.6},  σ = {:>10.6}",
                name, model.betas[j], model.means[j], model.stds[j]
            );
        }
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_data())?;
        std::fs::write(path, json)?;
        info!("Saved logistic effector model to {}", path.display());
        Ok(())
    }

    fn from_data(data: &LogisticModelData) -> Result<Self> {
        let pick = |table: &HashMap<String, f64>, what: &str| -> Result<[f64; PROPERTY_COUNT]> {
            let mut out = [0.0; PROPERTY_COUNT];
            for (slot, name) in out.iter_mut().zip(PROPERTY_NAMES) {
                *slot = *table.get(name).ok_or_else(|| {
                    EffectorError::ModelUnavailable(format!("model has no {} for feature '{}'", what, name))
                })?;
            }
            Ok(out)
        };
        Ok(Self::new(
            pick(&data.betas, "beta")?,
            pick(&data.means, "mean")?,
            pick(&data.stds, "std")?,
            data.intercept,
        ))
    }

    fn to_data(&self) -> LogisticModelData {
        let table = |values: &Array1<f64>| -> HashMap<String, f64> {
            PROPERTY_NAMES
                .iter()
                .zip(values.iter())
                .map(|(name, v)| (name.to_string(), *v))
                .collect()
        };
        LogisticModelData {
            betas: table(&self.betas),
            means: table(&self.means),
            stds: table(&self.stds),
            intercept: self.intercept,
        }
    }
}

impl EffectorClassifier for LogisticEffectorModel {
    fn predict_probability(&self, features: &Array2<f64>) -> Result<Array1<f64>> {
        check_width(features)?;
        let z = (features - &self.means) / &self.stds;
        let lin = z.dot(&self.betas) + self.intercept;
        Ok(lin.mapv(|v| 1.0 / (1.0 + (-v).exp())))
    }
}
