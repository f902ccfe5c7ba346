//! Detail Library Server binary.
//!
//! Reads `.env` (if present), then `server.*` and `DETAIL_SERVER__*`
//! configuration, and serves until SIGTERM or Ctrl+C.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
