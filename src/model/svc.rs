//! SVC pipeline inference
//!
//! Encodes a feature record with the fitted column transforms, evaluates the
//! kernel against the support vectors and calibrates the decision value with
//! Platt scaling.

use burn::tensor::activation::tanh;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use super::artifact::{Artifact, FeatureSpec, Kernel};
use super::Classifier;
use crate::features::FeatureRecord;
use crate::{AttritionError, Result};

/// A loaded SVC pipeline, ready for inference
#[derive(Debug, Clone)]
pub struct SvcPipeline<B: Backend> {
    name: String,
    classes: Vec<String>,
    features: Vec<FeatureSpec>,
    kernel: Kernel,
    /// Row-major [n_support, width]
    support_vectors: Vec<f32>,
    n_support: usize,
    width: usize,
    dual_coef: Vec<f32>,
    intercept: f64,
    prob_a: f64,
    prob_b: f64,
    device: B::Device,
}

impl<B: Backend> SvcPipeline<B> {
    /// Build from a validated artifact
    pub fn from_artifact(artifact: Artifact, device: B::Device) -> Self {
        let width = artifact.encoded_width();
        let n_support = artifact.svc.support_vectors.len();
        let support_vectors = artifact
            .svc
            .support_vectors
            .iter()
            .flat_map(|row| row.iter().map(|&v| v as f32))
            .collect();
        let dual_coef = artifact.svc.dual_coef.iter().map(|&v| v as f32).collect();

        SvcPipeline {
            name: artifact.name,
            classes: artifact.classes,
            features: artifact.features,
            kernel: artifact.svc.kernel,
            support_vectors,
            n_support,
            width,
            dual_coef,
            intercept: artifact.svc.intercept,
            prob_a: artifact.svc.prob_a,
            prob_b: artifact.svc.prob_b,
            device,
        }
    }

    /// Load an artifact file and build the pipeline
    pub fn load(path: &str, device: B::Device) -> Result<Self> {
        let artifact = Artifact::load(path)?;
        Ok(Self::from_artifact(artifact, device))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn n_support(&self) -> usize {
        self.n_support
    }

    pub fn encoded_width(&self) -> usize {
        self.width
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.features.iter().map(|f| f.name.as_str())
    }

    /// Encode a record positionally against the trained columns
    pub fn encode(&self, record: &FeatureRecord) -> Result<Vec<f32>> {
        if record.len() != self.features.len() {
            return Err(AttritionError::Inference(format!(
                "record has {} columns, artifact was trained on {}",
                record.len(),
                self.features.len()
            )));
        }

        let mut encoded = Vec::with_capacity(self.width);
        for ((name, value), spec) in record.iter().zip(self.features.iter()) {
            if name != spec.name {
                log::warn!(
                    "Column '{}' is in the position of trained column '{}'",
                    name,
                    spec.name
                );
            }
            spec.transform.encode(&spec.name, value, &mut encoded)?;
        }
        Ok(encoded)
    }

    /// Signed distance from the separating surface; positive favours `classes[1]`
    pub fn decision_function(&self, record: &FeatureRecord) -> Result<f64> {
        let encoded = self.encode(record)?;

        let x = Tensor::<B, 1>::from_floats(encoded.as_slice(), &self.device)
            .reshape([1, self.width]);
        let sv = Tensor::<B, 1>::from_floats(self.support_vectors.as_slice(), &self.device)
            .reshape([self.n_support, self.width]);
        let coef = Tensor::<B, 1>::from_floats(self.dual_coef.as_slice(), &self.device)
            .reshape([1, self.n_support]);

        let kernel_values = self.kernel_values(sv, x);
        let decision = coef.matmul(kernel_values);

        let value = decision
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| AttritionError::Inference(format!("{:?}", e)))?;
        let value = value
            .first()
            .copied()
            .ok_or_else(|| AttritionError::Inference("empty decision output".to_string()))?;

        Ok(value as f64 + self.intercept)
    }

    /// K(sv_i, x) for every support vector, shape [n_support, 1]
    fn kernel_values(&self, sv: Tensor<B, 2>, x: Tensor<B, 2>) -> Tensor<B, 2> {
        match self.kernel {
            Kernel::Linear => sv.matmul(x.transpose()),
            Kernel::Rbf { gamma } => {
                let sq_dist = (sv - x).powf_scalar(2.0).sum_dim(1);
                sq_dist.mul_scalar(-gamma as f32).exp()
            }
            Kernel::Poly {
                gamma,
                coef0,
                degree,
            } => sv
                .matmul(x.transpose())
                .mul_scalar(gamma as f32)
                .add_scalar(coef0 as f32)
                .powf_scalar(degree as f32),
            Kernel::Sigmoid { gamma, coef0 } => tanh(
                sv.matmul(x.transpose())
                    .mul_scalar(gamma as f32)
                    .add_scalar(coef0 as f32),
            ),
        }
    }

    /// Platt-calibrated probability of `classes[1]`
    fn positive_probability(&self, decision: f64) -> f64 {
        let z = self.prob_a * decision + self.prob_b;
        // Split on sign so exp never overflows
        if z >= 0.0 {
            let e = (-z).exp();
            e / (1.0 + e)
        } else {
            1.0 / (1.0 + z.exp())
        }
    }
}

impl<B: Backend> Classifier for SvcPipeline<B> {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict(&self, record: &FeatureRecord) -> Result<String> {
        let decision = self.decision_function(record)?;
        let index = if decision > 0.0 { 1 } else { 0 };
        log::debug!("Decision value {:.4} -> {}", decision, self.classes[index]);
        Ok(self.classes[index].clone())
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>> {
        let decision = self.decision_function(record)?;
        let positive = self.positive_probability(decision);
        Ok(vec![1.0 - positive, positive])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{assemble, DefaultTable, UserInput};
    use crate::model::artifact::tests::tiny_artifact_json;
    use crate::FeatureValue;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    fn tiny_pipeline() -> SvcPipeline<TestBackend> {
        let artifact = Artifact::from_json(&tiny_artifact_json()).unwrap();
        SvcPipeline::from_artifact(artifact, Default::default())
    }

    fn tiny_record(age: f64, overtime: &str) -> FeatureRecord {
        let numeric = DefaultTable::new(vec![("Age", FeatureValue::Number(40.0))]);
        let categorical = DefaultTable::new(vec![("OverTime", FeatureValue::from("No"))]);
        let mut user = UserInput::new();
        user.set("Age", age);
        user.set("OverTime", overtime);
        assemble(&user, &numeric, &categorical)
    }

    #[test]
    fn test_linear_decision() {
        let pipeline = tiny_pipeline();
        // z = (30 - 40) / 10 = -1; f = 1 + 1.5 - 0.5
        let f = pipeline.decision_function(&tiny_record(30.0, "Yes")).unwrap();
        assert!((f - 2.0).abs() < 1e-5, "f = {}", f);

        let f = pipeline.decision_function(&tiny_record(50.0, "No")).unwrap();
        assert!((f + 2.0).abs() < 1e-5, "f = {}", f);
    }

    #[test]
    fn test_predict_and_proba() {
        let pipeline = tiny_pipeline();
        let record = tiny_record(30.0, "Yes");
        assert_eq!(pipeline.predict(&record).unwrap(), "Yes");

        let proba = pipeline.predict_proba(&record).unwrap();
        assert_eq!(proba.len(), 2);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-9);
        assert!(proba[1] > 0.98);

        let record = tiny_record(50.0, "No");
        assert_eq!(pipeline.predict(&record).unwrap(), "No");
        assert!(pipeline.predict_proba(&record).unwrap()[0] > 0.98);
    }

    #[test]
    fn test_rbf_kernel() {
        let json = tiny_artifact_json().replace(r#"{"type": "linear"}"#, r#"{"type": "rbf", "gamma": 0.5}"#);
        let artifact = Artifact::from_json(&json).unwrap();
        let pipeline = SvcPipeline::<TestBackend>::from_artifact(artifact, Default::default());

        // Encoded x = [-1, 0, 1]; ||sv - x||^2 = 0 + 0.25 + 0.25 = 0.5
        let f = pipeline.decision_function(&tiny_record(30.0, "Yes")).unwrap();
        let expected = (-0.25f64).exp() - 0.5;
        assert!((f - expected).abs() < 1e-5, "f = {}", f);
    }

    #[test]
    fn test_unknown_category_fails() {
        let pipeline = tiny_pipeline();
        let err = pipeline.predict(&tiny_record(30.0, "Sometimes")).unwrap_err();
        assert!(matches!(err, AttritionError::Inference(_)));
    }

    #[test]
    fn test_column_count_mismatch_fails() {
        let pipeline = tiny_pipeline();
        let record = FeatureRecord::from_columns(vec![("Age".to_string(), FeatureValue::Number(30.0))]);
        assert!(pipeline.predict_proba(&record).is_err());
    }

    #[test]
    fn test_misnamed_column_consumed_positionally() {
        let pipeline = tiny_pipeline();
        let record = FeatureRecord::from_columns(vec![
            ("Years".to_string(), FeatureValue::Number(30.0)),
            ("OverTime".to_string(), FeatureValue::from("Yes")),
        ]);
        let f = pipeline.decision_function(&record).unwrap();
        assert!((f - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_probability_extremes_stay_finite() {
        let pipeline = tiny_pipeline();
        for d in [-1e6, -50.0, 0.0, 50.0, 1e6] {
            let p = pipeline.positive_probability(d);
            assert!(p.is_finite() && (0.0..=1.0).contains(&p), "p({}) = {}", d, p);
        }
    }
}
