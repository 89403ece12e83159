//! Delete every user on a running server.

use anyhow::Result;
use clap::Parser;
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "clear-users", about = "Delete all users through the API")]
struct Cli {
    /// Server to clear.
    #[arg(long, default_value = "http://localhost:3001")]
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct DeletedBody {
    #[serde(default)]
    deleted: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    userdesk_core::init()?;
    let cli = Cli::parse();

    let url = format!("{}/api/users", cli.base_url.trim_end_matches('/'));
    let response = match reqwest::Client::new().delete(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Failed to delete users: {}", e);
            return Ok(());
        }
    };

    let status = response.status();
    if status.is_success() {
        let deleted = response
            .json::<DeletedBody>()
            .await
            .map(|body| body.deleted)
            .unwrap_or_default();
        tracing::info!("Deleted {} users", deleted);
    } else {
        let reason = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        tracing::error!("Failed to delete users: {}", reason);
    }

    Ok(())
}
