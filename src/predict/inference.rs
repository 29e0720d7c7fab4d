//! Inference invocation
//!
//! Wraps the loaded classifier in an immutable service that turns one feature
//! record into one prediction result.

use serde::Serialize;

use crate::features::{assemble_with_defaults, FeatureRecord, UserInput};
use crate::model::Classifier;
use crate::{AttritionError, Result};

/// Label the artifact uses for an employee who leaves
pub const LEAVE_LABEL: &str = "Yes";
/// Label the artifact uses for an employee who stays
pub const STAY_LABEL: &str = "No";

/// Probability reported for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassProbability {
    pub label: String,
    pub probability: f64,
}

/// Predicted label plus the full class distribution, in artifact class order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: String,
    pub probabilities: Vec<ClassProbability>,
}

/// Whether the prediction is favourable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Stay,
    Leave,
}

impl PredictionResult {
    /// Probability of a class, looked up by label
    pub fn probability_of(&self, label: &str) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.probability)
    }

    /// Label with the highest probability
    pub fn most_probable(&self) -> Option<&str> {
        self.probabilities
            .iter()
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
            .map(|p| p.label.as_str())
    }

    pub fn outcome(&self) -> Outcome {
        if self.label == LEAVE_LABEL {
            Outcome::Leave
        } else {
            Outcome::Stay
        }
    }
}

/// The loaded predictor, created once at startup and shared by reference
#[derive(Debug)]
pub struct InferenceService<C: Classifier> {
    classifier: C,
}

impl<C: Classifier> InferenceService<C> {
    pub fn new(classifier: C) -> Self {
        InferenceService { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Classify one record and pair every class with its probability
    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult> {
        let label = self.classifier.predict(record)?;
        let proba = self.classifier.predict_proba(record)?;
        let classes = self.classifier.classes();

        if proba.len() != classes.len() {
            return Err(AttritionError::Inference(format!(
                "artifact reported {} probabilities for {} classes",
                proba.len(),
                classes.len()
            )));
        }

        let probabilities = classes
            .iter()
            .zip(proba)
            .map(|(label, probability)| ClassProbability {
                label: label.clone(),
                probability,
            })
            .collect();

        let result = PredictionResult {
            label,
            probabilities,
        };
        log::debug!("Prediction: {:?}", result);
        Ok(result)
    }

    /// Assemble a record from user input and classify it
    pub fn predict_input(&self, user: &UserInput) -> Result<(FeatureRecord, PredictionResult)> {
        let record = assemble_with_defaults(user);
        let result = self.predict(&record)?;
        Ok((record, result))
    }
}
