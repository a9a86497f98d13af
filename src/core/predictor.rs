use crate::core::loader::ModelHandle;
use crate::domain::model::{LegoInput, PredictionResponse};
use crate::utils::error::{PredictorError, Result};

pub struct PredictionService {
    model: ModelHandle,
}

impl PredictionService {
    pub fn new(model: ModelHandle) -> Self {
        Self { model }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    pub fn predict(&self, input: LegoInput) -> Result<PredictionResponse> {
        let model = self.model.get()?;

        let row = input.to_feature_row();
        let prediction = model.predict(&row)?;
        let probabilities = model.predict_proba(&row)?;

        let classes = model.classes();
        if probabilities.len() != classes.len() {
            return Err(PredictorError::inference(format!(
                "model returned {} probabilities for {} classes",
                probabilities.len(),
                classes.len()
            )));
        }

        tracing::debug!(
            "Predicted '{}' for parts_count={} theme={}",
            prediction,
            input.parts_count,
            input.theme
        );

        Ok(PredictionResponse {
            prediction,
            probabilities: classes.iter().cloned().zip(probabilities).collect(),
            input_data: input,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FeatureRow;
    use crate::domain::ports::Classifier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedClassifier {
        classes: Vec<String>,
        calls: AtomicUsize,
    }

    impl Classifier for FixedClassifier {
        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict(&self, _row: &FeatureRow) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.classes[0].clone())
        }

        fn predict_proba(&self, _row: &FeatureRow) -> Result<Vec<f64>> {
            Ok(vec![0.75, 0.25])
        }
    }

    fn input() -> LegoInput {
        LegoInput {
            parts_count: 500,
            theme: "space".to_string(),
        }
    }

    #[test]
    fn test_predict_without_model() {
        let service = PredictionService::new(ModelHandle::empty());
        let err = service.predict(input()).unwrap_err();

        assert!(matches!(err, PredictorError::ModelNotLoaded));
        assert_eq!(err.status_code(), 500);
        assert!(!service.model_loaded());
    }

    #[test]
    fn test_predict_builds_response() {
        let model = Arc::new(FixedClassifier {
            classes: vec!["large".to_string(), "small".to_string()],
            calls: AtomicUsize::new(0),
        });
        let service = PredictionService::new(ModelHandle::loaded(model.clone()));

        let response = service.predict(input()).unwrap();
        assert_eq!(response.prediction, "large");
        assert_eq!(response.probabilities["large"], 0.75);
        assert_eq!(response.probabilities["small"], 0.25);
        assert_eq!(response.input_data, input());
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }
}
