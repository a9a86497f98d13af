use clap::Parser;
use lego_predictor::utils::logger;
use lego_predictor::{CliConfig, PredictorServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 設定錯誤是致命的；模型錯誤不是
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            if let Some(path) = &cli.config {
                eprintln!("💡 Check that '{}' exists and is valid TOML", path);
            }
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(cli.verbose, config.log_format);

    tracing::info!("Starting lego-predictor v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Resolved config: {:?}", config);

    let server = PredictorServer::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("❌ Server failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
