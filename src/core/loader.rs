use crate::core::artifact::LinearClassifier;
use crate::domain::ports::{ArtifactSource, Classifier};
use crate::utils::error::{PredictorError, Result};
use std::sync::Arc;

/// 啟動時建立一次，之後唯讀
#[derive(Clone, Default)]
pub struct ModelHandle {
    model: Option<Arc<dyn Classifier>>,
}

impl ModelHandle {
    pub fn loaded(model: Arc<dyn Classifier>) -> Self {
        Self { model: Some(model) }
    }

    pub fn empty() -> Self {
        Self { model: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn get(&self) -> Result<&dyn Classifier> {
        self.model.as_deref().ok_or(PredictorError::ModelNotLoaded)
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

pub struct ModelLoader<S: ArtifactSource> {
    source: S,
}

impl<S: ArtifactSource> ModelLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn load(&self, path: &str) -> Result<LinearClassifier> {
        let bytes = self.source.read_artifact(path).await?;
        LinearClassifier::from_slice(&bytes)
    }

    /// 讀取失敗不會中止服務；回傳空的 handle，之後的預測一律 500
    pub async fn load_or_degrade(&self, path: &str) -> ModelHandle {
        match self.load(path).await {
            Ok(model) => {
                tracing::info!(
                    "✅ Model '{}' loaded from {} ({} classes: {:?})",
                    model.name().unwrap_or("unnamed"),
                    path,
                    model.classes().len(),
                    model.classes()
                );
                ModelHandle::loaded(Arc::new(model))
            }
            Err(e) => {
                tracing::error!("❌ Failed to load model from {}: {}", path, e);
                tracing::warn!("⚠️ Serving without a model; /predict/ will return 500");
                ModelHandle::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalArtifactSource;

    #[tokio::test]
    async fn test_missing_file_degrades() {
        let dir = tempfile::TempDir::new().unwrap();
        let loader = ModelLoader::new(LocalArtifactSource::new(
            dir.path().to_string_lossy().to_string(),
        ));

        let handle = loader.load_or_degrade("models/model.json").await;
        assert!(!handle.is_loaded());
        assert!(matches!(
            handle.get().err(),
            Some(PredictorError::ModelNotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("model.json"), b"\x80\x04not json").unwrap();
        let loader = ModelLoader::new(LocalArtifactSource::new(
            dir.path().to_string_lossy().to_string(),
        ));

        assert!(matches!(
            loader.load("model.json").await,
            Err(PredictorError::SerializationError(_))
        ));
        assert!(!loader.load_or_degrade("model.json").await.is_loaded());
    }
}
