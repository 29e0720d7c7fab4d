//! Employee attrition prediction
//!
//! Collects employee attributes through a form, assembles them into the fixed
//! feature schema of a pre-trained SVC pipeline and reports whether the
//! employee is likely to leave.

pub mod features;
pub mod form;
pub mod model;
pub mod predict;
pub mod session;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single feature value: numeric or categorical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Number(_) => None,
            FeatureValue::Category(c) => Some(c),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Integral values print without a trailing ".0"
            FeatureValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Category(c) => write!(f, "{}", c),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(n: f64) -> Self {
        FeatureValue::Number(n)
    }
}

impl From<i64> for FeatureValue {
    fn from(n: i64) -> Self {
        FeatureValue::Number(n as f64)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Category(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Category(s)
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum AttritionError {
    #[error("Failed to load artifact {path}: {message}")]
    ArtifactLoad { path: String, message: String },

    #[error("Incompatible artifact format version {found} (expected {expected})")]
    IncompatibleArtifact { found: u32, expected: u32 },

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AttritionError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub model_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Emit ANSI colors for the status line and probability bar
    pub color: bool,
    /// Width of the probability bar in characters
    pub bar_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                model_path: "models/svc_pipeline_adasyn.json".to_string(),
            },
            display: DisplayConfig {
                color: true,
                bar_width: 40,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AttritionError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| AttritionError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AttritionError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
