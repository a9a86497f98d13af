pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL_PATH: &str = "models/model.json";
pub const DEFAULT_TITLE: &str = "LEGO Predictor API";
pub const DEFAULT_DESCRIPTION: &str = "API for predicting the category of LEGO sets";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub const VALUES: [&'static str; 2] = ["compact", "json"];
}

impl FromStr for LogFormat {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(PredictorError::InvalidConfigValueError {
                field: "logging.format".to_string(),
                value: other.to_string(),
                reason: format!("Valid formats: {}", Self::VALUES.join(", ")),
            }),
        }
    }
}

/// 服務最終生效的設定 (預設值 < TOML 檔 < 命令列)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: String,
    pub title: String,
    pub description: String,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: DEFAULT_MODEL_PATH.to_string(),
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            log_format: LogFormat::Compact,
        }
    }
}

impl ConfigProvider for ServerConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn model_path(&self) -> &str {
        &self.model_path
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_range("server.port", self.port, 1, u16::MAX)?;
        validation::validate_path("model.path", &self.model_path)?;
        validation::validate_non_empty_string("server.title", &self.title)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "lego-predictor")]
#[command(about = "HTTP service predicting LEGO set categories from a trained model")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to bind (overrides config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the model artifact (overrides config file)
    #[arg(long)]
    pub model_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併預設值、設定檔與命令列參數
    pub fn resolve(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file_config = toml_config::TomlConfig::from_file(path)?;
                file_config.validate()?;
                file_config.into_server_config()?
            }
            None => ServerConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model_path) = &self.model_path {
            config.model_path = model_path.clone();
        }
        if self.json_logs {
            config.log_format = LogFormat::Json;
        }

        config.validate()?;
        Ok(config)
    }
}
