use anyhow::Result;
use userdesk_core::{Config, ConfigError};

#[tokio::main]
async fn main() -> Result<()> {
    userdesk_core::init()?;

    let config = match Config::load_validated() {
        Ok((config, _)) => config,
        Err(e) => {
            if let Some(config_err) = e.downcast_ref::<ConfigError>() {
                tracing::error!("{}", config_err.user_message());
            }
            return Err(e);
        }
    };
    tracing::info!("Userdesk starting, config at {}", Config::config_path().display());

    if let Err(e) = userdesk_server::serve(config).await {
        tracing::error!("{}", e.user_message());
        return Err(e.into());
    }

    Ok(())
}
