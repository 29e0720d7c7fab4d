//! Serialized predictor artifact
//!
//! The offline pipeline exports the fitted preprocessing steps and the binary
//! SVC as a JSON document. Loading validates the structure once so inference
//! never sees an inconsistent model.

use serde::{Deserialize, Serialize};

use crate::{AttritionError, FeatureValue, Result};

/// Artifact format this build understands
pub const FORMAT_VERSION: u32 = 1;

/// Top-level artifact document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub format_version: u32,
    pub name: String,
    /// Class labels; probabilities are reported in this order
    pub classes: Vec<String>,
    /// Input columns in training order
    pub features: Vec<FeatureSpec>,
    pub svc: SvcParams,
}

/// One input column and its fitted preprocessing step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub transform: Transform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// (x - mean) / scale
    StandardScaler { mean: f64, scale: f64 },
    /// One indicator column per known category
    OneHot { categories: Vec<FeatureValue> },
    Passthrough,
}

impl Transform {
    /// Number of encoded columns this transform emits
    pub fn width(&self) -> usize {
        match self {
            Transform::StandardScaler { .. } | Transform::Passthrough => 1,
            Transform::OneHot { categories } => categories.len(),
        }
    }

    /// Append the encoding of `value` to `out`
    pub fn encode(&self, column: &str, value: &FeatureValue, out: &mut Vec<f32>) -> Result<()> {
        match self {
            Transform::StandardScaler { mean, scale } => {
                let x = numeric(column, value)?;
                out.push(((x - mean) / scale) as f32);
            }
            Transform::Passthrough => {
                out.push(numeric(column, value)? as f32);
            }
            Transform::OneHot { categories } => {
                let hit = categories.iter().position(|c| c == value).ok_or_else(|| {
                    AttritionError::Inference(format!(
                        "Found unknown category '{}' in column {} during transform",
                        value, column
                    ))
                })?;
                out.extend((0..categories.len()).map(|i| if i == hit { 1.0 } else { 0.0 }));
            }
        }
        Ok(())
    }
}

fn numeric(column: &str, value: &FeatureValue) -> Result<f64> {
    value.as_number().ok_or_else(|| {
        AttritionError::Inference(format!(
            "Column {} expects a number, got '{}'",
            column, value
        ))
    })
}

/// SVC kernel function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { gamma: f64, coef0: f64, degree: u32 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kernel::Linear => write!(f, "linear"),
            Kernel::Rbf { gamma } => write!(f, "rbf (gamma={})", gamma),
            Kernel::Poly {
                gamma,
                coef0,
                degree,
            } => write!(f, "poly (gamma={}, coef0={}, degree={})", gamma, coef0, degree),
            Kernel::Sigmoid { gamma, coef0 } => {
                write!(f, "sigmoid (gamma={}, coef0={})", gamma, coef0)
            }
        }
    }
}

/// Fitted binary SVC with Platt calibration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvcParams {
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    /// Dual coefficient (alpha_i * y_i) per support vector
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    pub prob_a: f64,
    pub prob_b: f64,
}

impl Artifact {
    /// Read, version-check and validate an artifact file
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AttritionError::ArtifactLoad {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let artifact = Self::from_json(&content).map_err(|e| match e {
            AttritionError::Json(e) => AttritionError::ArtifactLoad {
                path: path.to_string(),
                message: e.to_string(),
            },
            other => other,
        })?;
        log::info!(
            "Loaded artifact '{}' from {} ({} features, {} support vectors)",
            artifact.name,
            path,
            artifact.features.len(),
            artifact.svc.support_vectors.len()
        );
        Ok(artifact)
    }

    /// Parse and validate an artifact document
    pub fn from_json(content: &str) -> Result<Self> {
        // Check the version before the full schema so older layouts report cleanly
        #[derive(Deserialize)]
        struct Header {
            format_version: u32,
        }
        let header: Header = serde_json::from_str(content)?;
        if header.format_version != FORMAT_VERSION {
            return Err(AttritionError::IncompatibleArtifact {
                found: header.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let artifact: Artifact = serde_json::from_str(content)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Width of the encoded input vector
    pub fn encoded_width(&self) -> usize {
        self.features.iter().map(|f| f.transform.width()).sum()
    }

    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(AttritionError::InvalidArtifact(msg)) };

        if self.classes.len() != 2 {
            return invalid(format!(
                "expected a binary classifier, found {} classes",
                self.classes.len()
            ));
        }
        if self.classes[0] == self.classes[1] {
            return invalid("class labels must be distinct".to_string());
        }
        if self.features.is_empty() {
            return invalid("no input features".to_string());
        }

        for spec in &self.features {
            match &spec.transform {
                Transform::StandardScaler { scale, .. } if *scale == 0.0 || !scale.is_finite() => {
                    return invalid(format!("column {} has an unusable scale {}", spec.name, scale));
                }
                Transform::OneHot { categories } if categories.is_empty() => {
                    return invalid(format!("column {} has no categories", spec.name));
                }
                _ => {}
            }
        }

        let svc = &self.svc;
        if svc.support_vectors.is_empty() {
            return invalid("no support vectors".to_string());
        }
        if svc.dual_coef.len() != svc.support_vectors.len() {
            return invalid(format!(
                "{} dual coefficients for {} support vectors",
                svc.dual_coef.len(),
                svc.support_vectors.len()
            ));
        }
        let width = self.encoded_width();
        if let Some(row) = svc.support_vectors.iter().position(|sv| sv.len() != width) {
            return invalid(format!(
                "support vector {} has width {}, encoded input has width {}",
                row,
                svc.support_vectors[row].len(),
                width
            ));
        }
        Ok(())
    }
}
