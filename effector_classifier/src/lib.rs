//! Effector protein prediction from averaged amino-acid properties.
//!
//! Sequences are reduced to six mean biochemical properties over their first 900
//! residues and scored by a pre-trained binary classifier.

pub mod batch;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod fasta;
pub mod features;
pub mod pipeline;
pub mod properties;
pub mod report;

pub use batch::{BatchFeatures, FeatureMatrix, RecordFailure, SequenceRecord};
pub use classifier::{classify, Classification, EffectorClassifier, LogisticEffectorModel};
pub use errors::{EffectorError, Result};
pub use features::{extract, FeatureVector};
pub use pipeline::{EffectorPipeline, PipelineReport};
pub use report::{EffectorLabel, PredictionRecord};
