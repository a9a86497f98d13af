pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{create_router, AppState, PredictorServer};
pub use config::{cli::LocalArtifactSource, ServerConfig};
pub use core::{artifact::LinearClassifier, loader::ModelHandle, predictor::PredictionService};
pub use utils::error::{PredictorError, Result};
