use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 預測請求：零件數與主題
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegoInput {
    pub parts_count: i64,
    pub theme: String,
}

impl LegoInput {
    /// 依宣告順序組成特徵列
    pub fn to_feature_row(&self) -> FeatureRow {
        FeatureRow {
            values: vec![
                FeatureValue::Numeric(self.parts_count as f64),
                FeatureValue::Categorical(self.theme.clone()),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Numeric(f64),
    Categorical(String),
}

impl FeatureValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FeatureValue::Numeric(_) => "numeric",
            FeatureValue::Categorical(_) => "categorical",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub values: Vec<FeatureValue>,
}

impl FeatureRow {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub probabilities: BTreeMap<String, f64>,
    pub input_data: LegoInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootMessage {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_row_order() {
        let input = LegoInput {
            parts_count: 500,
            theme: "space".to_string(),
        };
        let row = input.to_feature_row();

        assert_eq!(row.len(), 2);
        assert_eq!(row.values[0], FeatureValue::Numeric(500.0));
        assert_eq!(row.values[1], FeatureValue::Categorical("space".to_string()));
    }

    #[test]
    fn test_input_rejects_string_parts_count() {
        let parsed: Result<LegoInput, _> =
            serde_json::from_str(r#"{"parts_count": "500", "theme": "space"}"#);
        assert!(parsed.is_err());

        let parsed: Result<LegoInput, _> = serde_json::from_str(r#"{"theme": "space"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_input_ignores_extra_fields() {
        let parsed: LegoInput =
            serde_json::from_str(r#"{"parts_count": 12, "theme": "city", "year": 2020}"#).unwrap();
        assert_eq!(parsed.parts_count, 12);
        assert_eq!(parsed.theme, "city");
    }
}
