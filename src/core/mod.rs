pub mod artifact;
pub mod loader;
pub mod predictor;

pub use crate::domain::model::{FeatureRow, FeatureValue, LegoInput, PredictionResponse};
pub use crate::domain::ports::{ArtifactSource, Classifier, ConfigProvider};
pub use crate::utils::error::Result;
