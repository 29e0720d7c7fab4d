//! Prediction and rendering
//!
//! Invoke the loaded artifact on an assembled record and format the result.

pub mod inference;
pub mod render;

pub use inference::{
    ClassProbability, InferenceService, Outcome, PredictionResult, LEAVE_LABEL, STAY_LABEL,
};
pub use render::{format_prediction, render, OutputFormat};
