use crate::config::{LogFormat, ServerConfig};
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 設定檔內容，所有欄位皆可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub model: Option<ModelSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PredictorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PredictorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_PATH})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PredictorError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 把檔案中有給的值覆蓋到 `config`
    pub fn apply_to(&self, config: &mut ServerConfig) -> Result<()> {
        if let Some(server) = &self.server {
            if let Some(host) = &server.host {
                config.host = host.clone();
            }
            if let Some(port) = server.port {
                config.port = port;
            }
            if let Some(title) = &server.title {
                config.title = title.clone();
            }
            if let Some(description) = &server.description {
                config.description = description.clone();
            }
        }

        if let Some(path) = self.model.as_ref().and_then(|m| m.path.as_ref()) {
            config.model_path = path.clone();
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            config.log_format = format.parse::<LogFormat>()?;
        }

        Ok(())
    }

    pub fn into_server_config(self) -> Result<ServerConfig> {
        let mut config = ServerConfig::default();
        self.apply_to(&mut config)?;
        Ok(config)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(server) = &self.server {
            if let Some(host) = &server.host {
                validation::validate_non_empty_string("server.host", host)?;
            }
            if let Some(port) = server.port {
                validation::validate_range("server.port", port, 1, u16::MAX)?;
            }
        }

        if let Some(path) = self.model.as_ref().and_then(|m| m.path.as_ref()) {
            validation::validate_path("model.path", path)?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            format.parse::<LogFormat>()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "0.0.0.0"
port = 8080
title = "Test Predictor"

[model]
path = "models/test.json"

[logging]
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());

        let server = config.into_server_config().unwrap();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
        assert_eq!(server.title, "Test Predictor");
        assert_eq!(server.description, crate::config::DEFAULT_DESCRIPTION);
        assert_eq!(server.model_path, "models/test.json");
        assert_eq!(server.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_toml_keeps_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.into_server_config().unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LEGO_TEST_MODEL_PATH", "/srv/models/lego.json");

        let toml_content = r#"
[model]
path = "${LEGO_TEST_MODEL_PATH}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.model.unwrap().path.unwrap(),
            "/srv/models/lego.json"
        );

        std::env::remove_var("LEGO_TEST_MODEL_PATH");
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let toml_content = r#"
[model]
path = "${LEGO_TEST_UNSET_VARIABLE}"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.model.unwrap().path.unwrap(),
            "${LEGO_TEST_UNSET_VARIABLE}"
        );
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[logging]
format = "xml"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[server]
port = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let result = TomlConfig::from_toml_str("[server\nport = ");
        assert!(matches!(
            result,
            Err(PredictorError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 8123\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.server.unwrap().port, Some(8123));
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let config =
            TomlConfig::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/lego-predictor.toml"))
                .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.into_server_config().unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            TomlConfig::from_file("/nonexistent/lego-predictor.toml"),
            Err(PredictorError::IoError(_))
        ));
    }
}
