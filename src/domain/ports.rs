use crate::domain::model::FeatureRow;
use crate::utils::error::Result;

/// 已訓練好的分類器；內部邏輯對服務而言是黑箱
pub trait Classifier: Send + Sync {
    fn classes(&self) -> &[String];
    fn predict(&self, row: &FeatureRow) -> Result<String>;
    /// 機率向量，順序與 `classes()` 對齊
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>>;
}

pub trait ArtifactSource: Send + Sync {
    fn read_artifact(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn model_path(&self) -> &str;

    fn bind_address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}
