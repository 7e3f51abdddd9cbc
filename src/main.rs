//! minircd entry point.

use minircd::config::Config;
use minircd::dispatch::Dispatcher;
use minircd::network::Gateway;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(listen = %config.server.listen, "Starting minircd");

    let (dispatcher, events) = Dispatcher::new(config.heartbeat.clone());
    tokio::spawn(dispatcher.run());

    let gateway = Gateway::bind(config.server.listen, events).await?;
    info!(addr = %gateway.local_addr(), "Listener bound");

    gateway.run().await
}
