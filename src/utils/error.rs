use thiserror::Error;

/// 推論服務不可用時回給呼叫端的固定訊息
pub const MODEL_NOT_LOADED: &str = "Model not loaded";

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid model artifact: {message}")]
    InvalidArtifactError { message: String },

    #[error("{}", MODEL_NOT_LOADED)]
    ModelNotLoaded,

    #[error("{message}")]
    InferenceError { message: String },

    #[error("{message}")]
    ValidationError { status: u16, message: String },
}

impl PredictorError {
    pub fn inference(message: impl Into<String>) -> Self {
        Self::InferenceError {
            message: message.into(),
        }
    }

    pub fn invalid_artifact(message: impl Into<String>) -> Self {
        Self::InvalidArtifactError {
            message: message.into(),
        }
    }

    /// 對應的 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError { status, .. } => *status,
            Self::InferenceError { .. } => 400,
            Self::ModelNotLoaded => 500,
            _ => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PredictorError::ModelNotLoaded.status_code(), 500);
        assert_eq!(PredictorError::inference("boom").status_code(), 400);
        assert_eq!(
            PredictorError::ValidationError {
                status: 422,
                message: "missing field".to_string()
            }
            .status_code(),
            422
        );
        assert_eq!(PredictorError::invalid_artifact("bad").status_code(), 500);
    }

    #[test]
    fn test_messages_are_raw() {
        assert_eq!(PredictorError::ModelNotLoaded.to_string(), "Model not loaded");
        assert_eq!(
            PredictorError::inference("Found unknown category 'x'").to_string(),
            "Found unknown category 'x'"
        );
        assert!(PredictorError::inference("x").is_client_error());
        assert!(!PredictorError::ModelNotLoaded.is_client_error());
    }
}
