use std::fmt;
use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::errors::{EffectorError, Result};

/// Column headers of the results table.
pub const COLUMNS: [&str; 4] = ["Protein ID", "Probability", "Classification", "Prediction"];

/// Decimal places kept for reported probabilities.
pub const PROBABILITY_DECIMALS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectorLabel {
    NonEffector,
    Effector,
}

impl EffectorLabel {
    pub fn from_class(class: u8) -> Self {
        if class == 0 {
            EffectorLabel::NonEffector
        } else {
            EffectorLabel::Effector
        }
    }

    pub fn class(&self) -> u8 {
        match self {
            EffectorLabel::NonEffector => 0,
            EffectorLabel::Effector => 1,
        }
    }

    pub fn readable(&self) -> &'static str {
        match self {
            EffectorLabel::NonEffector => "predicted non-effector",
            EffectorLabel::Effector => "predicted effector",
        }
    }
}

impl fmt::Display for EffectorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.readable())
    }
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub protein_id: String,
    /// Effector-class probability, rounded to [`PROBABILITY_DECIMALS`]
    pub probability: f64,
    pub label: EffectorLabel,
}

impl PredictionRecord {
    pub fn classification(&self) -> u8 {
        self.label.class()
    }

    pub fn prediction(&self) -> &'static str {
        self.label.readable()
    }
}

/// Rounds half away from zero, the convention of `f64::round`.
pub fn round_probability(p: f64) -> f64 {
    let scale = 10f64.powi(PROBABILITY_DECIMALS);
    (p * scale).round() / scale
}

/// Joins identifiers, labels and probabilities into records, keeping input order.
pub fn format(ids: &[String], labels: &[u8], probabilities: &[f64]) -> Result<Vec<PredictionRecord>> {
    if ids.len() != labels.len() || ids.len() != probabilities.len() {
        return Err(EffectorError::LengthMismatch {
            ids: ids.len(),
            labels: labels.len(),
            probabilities: probabilities.len(),
        });
    }

    Ok(ids
        .iter()
        .zip(labels)
        .zip(probabilities)
        .map(|((id, &class), &p)| PredictionRecord {
            protein_id: id.clone(),
            probability: round_probability(p),
            label: EffectorLabel::from_class(class),
        })
        .collect())
}

/// Results table with the [`COLUMNS`] headers.
pub fn to_dataframe(records: &[PredictionRecord]) -> PolarsResult<DataFrame> {
    let ids: Vec<&str> = records.iter().map(|r| r.protein_id.as_str()).collect();
    let prob: Vec<f64> = records.iter().map(|r| r.probability).collect();
    let class: Vec<i32> = records.iter().map(|r| r.classification() as i32).collect();
    let meaning: Vec<&str> = records.iter().map(|r| r.prediction()).collect();

    let mut df = DataFrame::default();
    df.with_column(Series::new(PlSmallStr::from(COLUMNS[0]), ids))?;
    df.with_column(Series::new(PlSmallStr::from(COLUMNS[1]), prob))?;
    df.with_column(Series::new(PlSmallStr::from(COLUMNS[2]), class))?;
    df.with_column(Series::new(PlSmallStr::from(COLUMNS[3]), meaning))?;
    Ok(df)
}

/// Exports the results table as CSV.
pub fn write_csv(records: &[PredictionRecord], path: &Path) -> Result<()> {
    let mut df = to_dataframe(records)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)?;
    info!("Wrote {} predictions to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn labels_map_to_readable_text() {
        let out = format(&ids(&["a", "b"]), &[0, 1], &[0.2, 0.8]).unwrap();
        assert_eq!(out[0].prediction(), "predicted non-effector");
        assert_eq!(out[0].classification(), 0);
        assert_eq!(out[1].prediction(), "predicted effector");
        assert_eq!(out[1].label.to_string(), "predicted effector");
    }

    #[test]
    fn probabilities_round_to_three_places() {
        assert_eq!(round_probability(0.12345), 0.123);
        assert_eq!(round_probability(0.9), 0.9);
        assert_eq!(round_probability(0.99951), 1.0);
        assert_eq!(round_probability(0.0), 0.0);

        let out = format(&ids(&["x", "y"]), &[0, 0], &[0.12345, 0.12345]).unwrap();
        assert!(out.iter().all(|r| r.probability == 0.123));
    }

    #[test]
    fn order_and_duplicates_are_kept() {
        let out = format(&ids(&["z", "a", "z"]), &[1, 0, 1], &[0.7, 0.1, 0.6]).unwrap();
        let got: Vec<&str> = out.iter().map(|r| r.protein_id.as_str()).collect();
        assert_eq!(got, vec!["z", "a", "z"]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(matches!(
            format(&ids(&["a", "b"]), &[1], &[0.5, 0.5]),
            Err(EffectorError::LengthMismatch { ids: 2, labels: 1, probabilities: 2 })
        ));
    }

    #[test]
    fn table_has_expected_columns_and_csv_is_written() {
        let records = format(&ids(&["P1", "P3"]), &[1, 0], &[0.91234, 0.0456]).unwrap();
        let df = to_dataframe(&records).unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, COLUMNS.to_vec());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_csv(&records, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Protein ID,Probability,Classification,Prediction"));
        assert_eq!(lines.next(), Some("P1,0.912,1,predicted effector"));
        assert_eq!(lines.next(), Some("P3,0.046,0,predicted non-effector"));
    }

    #[test]
    fn empty_results_still_have_a_header() {
        let df = to_dataframe(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 4);
    }
}
