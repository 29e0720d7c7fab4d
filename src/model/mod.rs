//! Predictor artifact
//!
//! The pre-trained pipeline is opaque to the rest of the crate: everything
//! downstream talks to it through [`Classifier`].

pub mod artifact;
pub mod svc;

pub use artifact::{Artifact, FeatureSpec, Kernel, SvcParams, Transform, FORMAT_VERSION};
pub use svc::SvcPipeline;

use crate::features::FeatureRecord;
use crate::Result;

/// A fitted classifier over feature records
pub trait Classifier: Send + Sync {
    /// Class labels, in the order `predict_proba` reports them
    fn classes(&self) -> &[String];

    /// Predicted class label
    fn predict(&self, record: &FeatureRecord) -> Result<String>;

    /// Probability per class, positionally aligned with `classes()`
    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>>;
}
