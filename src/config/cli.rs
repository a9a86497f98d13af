use crate::core::ArtifactSource;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalArtifactSource {
    base_path: String,
}

impl LocalArtifactSource {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Default for LocalArtifactSource {
    fn default() -> Self {
        Self::new(".".to_string())
    }
}

impl ArtifactSource for LocalArtifactSource {
    async fn read_artifact(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        tracing::debug!("Reading model artifact from {}", full_path.display());
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }
}
