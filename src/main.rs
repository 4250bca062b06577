//! Invoice dashboard server

use invoice_actions::config::AppConfig;
use invoice_actions::core::ActionResult;
use invoice_actions::server::ServerBuilder;
use invoice_actions::telemetry;

/// Optional path to a YAML configuration file
const CONFIG_ENV: &str = "INVOICE_ACTIONS_CONFIG";

/// File named by [`CONFIG_ENV`] if set, defaults otherwise, then env overrides
fn load_config() -> ActionResult<AppConfig> {
    let config = match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            tracing::info!("loading configuration from {}", path);
            AppConfig::from_yaml_file(path.trim())?
        }
        _ => AppConfig::default(),
    };
    Ok(config.apply_env()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let config = load_config()?;

    ServerBuilder::new()
        .with_config(config)
        .with_configured_store()
        .await?
        .serve()
        .await
}
