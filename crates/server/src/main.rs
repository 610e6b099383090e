//! Custom Embedding Server binary
//!
//! Reads `.env`, loads [`ServerConfig`] and serves the embedding skill endpoint.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
