use crate::app::docs::ApiInfo;
use crate::app::handlers;
use crate::config::cli::LocalArtifactSource;
use crate::config::ServerConfig;
use crate::core::loader::{ModelHandle, ModelLoader};
use crate::core::predictor::PredictionService;
use crate::core::ConfigProvider;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<PredictionService>,
    pub info: Arc<ApiInfo>,
}

impl AppState {
    pub fn new(model: ModelHandle, info: ApiInfo) -> Self {
        Self {
            predictor: Arc::new(PredictionService::new(model)),
            info: Arc::new(info),
        }
    }

    pub fn from_config(model: ModelHandle, config: &ServerConfig) -> Self {
        Self::new(
            model,
            ApiInfo {
                title: config.title.clone(),
                description: config.description.clone(),
            },
        )
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/predict/", post(handlers::predict))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .route("/docs", get(handlers::docs_page))
        .route("/openapi.json", get(handlers::openapi))
        .with_state(state)
}

pub struct PredictorServer {
    config: ServerConfig,
}

impl PredictorServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// 啟動階段：讀一次模型檔；失敗時仍繼續以無模型狀態服務
    pub async fn initialize(&self) -> AppState {
        let loader = ModelLoader::new(LocalArtifactSource::default());
        let model = loader.load_or_degrade(self.config.model_path()).await;
        AppState::from_config(model, &self.config)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = self.initialize().await;

        let addr = self.config.bind_address();
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

        serve(listener, state, shutdown_signal()).await
    }
}

pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
