use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{EffectorError, Result};

pub const MODEL_ENV: &str = "EFFECTOR_MODEL";
pub const OUTPUT_ENV: &str = "EFFECTOR_OUTPUT";

/// Directory relative paths are resolved against.
pub fn project_root() -> PathBuf {
    match env::var_os("PROJECT_ROOT") {
        Some(val) => PathBuf::from(val),
        None => {
            // Fall back to current directory if PROJECT_ROOT not set
            env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}

/// Startup settings. Precedence, lowest first: defaults, JSON file, environment, CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub model_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/effectoro_logistic.json"),
            output_path: PathBuf::from("./effector_predictions.csv"),
        }
    }
}

impl PipelineConfig {
    /// Reads `path` if given, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| env::var_os(key).map(PathBuf::from))
    }

    /// [`PipelineConfig::load`] with the environment lookup supplied by the caller.
    pub fn load_with<F: Fn(&str) -> Option<PathBuf>>(path: Option<&Path>, var: F) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                info!("Reading configuration from {}", p.display());
                let json = std::fs::read_to_string(p)
                    .map_err(|e| EffectorError::Config(format!("{}: {}", p.display(), e)))?;
                serde_json::from_str(&json)
                    .map_err(|e| EffectorError::Config(format!("{}: {}", p.display(), e)))?
            }
            None => PipelineConfig::default(),
        };
        config.apply_env(var);
        Ok(config)
    }

    fn apply_env<F: Fn(&str) -> Option<PathBuf>>(&mut self, var: F) {
        if let Some(model) = var(MODEL_ENV) {
            self.model_path = model;
        }
        if let Some(output) = var(OUTPUT_ENV) {
            self.output_path = output;
        }
    }

    /// Makes both paths absolute against `root`.
    pub fn resolved(mut self, root: &Path) -> Self {
        if self.model_path.is_relative() {
            self.model_path = root.join(&self.model_path);
        }
        if self.output_path.is_relative() {
            self.output_path = root.join(&self.output_path);
        }
        self
    }
}
