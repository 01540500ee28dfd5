use anyhow::Result;
use std::path::Path;
use tokio::sync::watch;

mod config;
mod desktop;
mod watchdog;

use desktop::XdotoolClient;
use watchdog::Watchdog;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = config::load_or_init(Path::new(config::CONFIG_FILE))?;
    config.validate()?;

    // Ctrl-C flips the shutdown channel; the loop exits during its next sleep
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let client = XdotoolClient::new();
    let watchdog = Watchdog::new(config, client.clone(), client);
    watchdog.run(shutdown_rx).await
}
