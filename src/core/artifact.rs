use crate::domain::model::{FeatureRow, FeatureValue};
use crate::domain::ports::Classifier;
use crate::utils::error::{PredictorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// 模型檔 (models/model.json) 的序列化格式：
/// 逐欄編碼器 + 多類別邏輯斯迴歸
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub features: Vec<FeatureSpec>,
    pub classes: Vec<String>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    Numeric {
        name: String,
        #[serde(default)]
        mean: f64,
        #[serde(default = "default_scale")]
        scale: f64,
    },
    Categorical {
        name: String,
        categories: Vec<String>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

impl FeatureSpec {
    pub fn name(&self) -> &str {
        match self {
            FeatureSpec::Numeric { name, .. } | FeatureSpec::Categorical { name, .. } => name,
        }
    }

    fn width(&self) -> usize {
        match self {
            FeatureSpec::Numeric { .. } => 1,
            FeatureSpec::Categorical { categories, .. } => categories.len(),
        }
    }
}

impl ModelArtifact {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn encoded_width(&self) -> usize {
        self.features.iter().map(FeatureSpec::width).sum()
    }

    /// 檢查版本、類別與係數形狀是否一致
    pub fn validate(&self) -> Result<()> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(PredictorError::invalid_artifact(format!(
                "unsupported format_version {} (expected {})",
                self.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }

        if self.classes.len() < 2 {
            return Err(PredictorError::invalid_artifact(format!(
                "a classifier needs at least 2 classes, found {}",
                self.classes.len()
            )));
        }
        let mut seen = HashSet::new();
        for class in &self.classes {
            if !seen.insert(class.as_str()) {
                return Err(PredictorError::invalid_artifact(format!(
                    "duplicate class label '{}'",
                    class
                )));
            }
        }

        if self.features.is_empty() {
            return Err(PredictorError::invalid_artifact("features cannot be empty"));
        }
        for feature in &self.features {
            match feature {
                FeatureSpec::Numeric { name, mean, scale } => {
                    if !mean.is_finite() || !scale.is_finite() || *scale == 0.0 {
                        return Err(PredictorError::invalid_artifact(format!(
                            "numeric feature '{}' needs a finite mean and a finite non-zero scale",
                            name
                        )));
                    }
                }
                FeatureSpec::Categorical {
                    name, categories, ..
                } => {
                    if categories.is_empty() {
                        return Err(PredictorError::invalid_artifact(format!(
                            "categorical feature '{}' has no categories",
                            name
                        )));
                    }
                    let mut seen = HashSet::new();
                    for category in categories {
                        if !seen.insert(category.as_str()) {
                            return Err(PredictorError::invalid_artifact(format!(
                                "categorical feature '{}' lists '{}' twice",
                                name, category
                            )));
                        }
                    }
                }
            }
        }

        let binary = self.classes.len() == 2 && self.coefficients.len() == 1;
        if !binary && self.coefficients.len() != self.classes.len() {
            return Err(PredictorError::invalid_artifact(format!(
                "expected {} coefficient rows for {} classes, found {}",
                self.classes.len(),
                self.classes.len(),
                self.coefficients.len()
            )));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(PredictorError::invalid_artifact(format!(
                "expected {} intercepts, found {}",
                self.coefficients.len(),
                self.intercepts.len()
            )));
        }

        let width = self.encoded_width();
        for (idx, row) in self.coefficients.iter().enumerate() {
            if row.len() != width {
                return Err(PredictorError::invalid_artifact(format!(
                    "coefficient row {} has width {}, encoded features have width {}",
                    idx,
                    row.len(),
                    width
                )));
            }
        }

        Ok(())
    }
}

/// 由模型檔建立、可直接推論的線性分類器
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    artifact: ModelArtifact,
    category_index: Vec<Option<HashMap<String, usize>>>,
}

impl LinearClassifier {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;

        let category_index = artifact
            .features
            .iter()
            .map(|feature| match feature {
                FeatureSpec::Categorical { categories, .. } => Some(
                    categories
                        .iter()
                        .enumerate()
                        .map(|(idx, category)| (category.clone(), idx))
                        .collect(),
                ),
                FeatureSpec::Numeric { .. } => None,
            })
            .collect();

        Ok(Self {
            artifact,
            category_index,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_artifact(ModelArtifact::from_slice(bytes)?)
    }

    pub fn name(&self) -> Option<&str> {
        self.artifact.name.as_deref()
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.artifact.features.iter().map(FeatureSpec::name).collect()
    }

    fn encode(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let expected = self.artifact.features.len();
        if row.len() != expected {
            return Err(PredictorError::inference(format!(
                "X has {} features, but the model is expecting {} features as input",
                row.len(),
                expected
            )));
        }

        let mut encoded = Vec::with_capacity(self.artifact.encoded_width());
        for ((spec, value), index) in self
            .artifact
            .features
            .iter()
            .zip(&row.values)
            .zip(&self.category_index)
        {
            match (spec, value) {
                (FeatureSpec::Numeric { mean, scale, .. }, FeatureValue::Numeric(x)) => {
                    encoded.push((x - mean) / scale);
                }
                (
                    FeatureSpec::Categorical {
                        name,
                        categories,
                        handle_unknown,
                    },
                    FeatureValue::Categorical(category),
                ) => {
                    let start = encoded.len();
                    encoded.resize(start + categories.len(), 0.0);
                    match index.as_ref().and_then(|map| map.get(category)) {
                        Some(&hit) => encoded[start + hit] = 1.0,
                        None if *handle_unknown == HandleUnknown::Ignore => {}
                        None => {
                            return Err(PredictorError::inference(format!(
                                "Found unknown category '{}' in feature '{}'",
                                category, name
                            )));
                        }
                    }
                }
                (spec, value) => {
                    return Err(PredictorError::inference(format!(
                        "feature '{}' cannot encode a {} value",
                        spec.name(),
                        value.kind()
                    )));
                }
            }
        }

        Ok(encoded)
    }

    fn scores(&self, encoded: &[f64]) -> Result<Vec<f64>> {
        let scores: Vec<f64> = self
            .artifact
            .coefficients
            .iter()
            .zip(&self.artifact.intercepts)
            .map(|(weights, intercept)| {
                intercept + weights.iter().zip(encoded).map(|(w, x)| w * x).sum::<f64>()
            })
            .collect();

        if scores.iter().any(|s| !s.is_finite()) {
            return Err(PredictorError::inference(
                "model produced non-finite scores for the given input",
            ));
        }
        Ok(scores)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Classifier for LinearClassifier {
    fn classes(&self) -> &[String] {
        &self.artifact.classes
    }

    fn predict(&self, row: &FeatureRow) -> Result<String> {
        let proba = self.predict_proba(row)?;
        let mut best = 0;
        for (idx, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = idx;
            }
        }
        self.artifact.classes.get(best).cloned().ok_or_else(|| {
            PredictorError::inference(format!(
                "model returned {} probabilities for {} classes",
                proba.len(),
                self.artifact.classes.len()
            ))
        })
    }

    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let encoded = self.encode(row)?;
        let scores = self.scores(&encoded)?;

        if scores.len() == 1 && self.artifact.classes.len() == 2 {
            // 二元模型只存一列係數，對應第二個類別
            let positive = sigmoid(scores[0]);
            return Ok(vec![1.0 - positive, positive]);
        }
        Ok(softmax(&scores))
    }
}
