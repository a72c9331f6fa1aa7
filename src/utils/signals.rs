//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

use crate::error::Error;

/// Wait for a shutdown signal (SIGTERM, SIGINT) and return its number
pub async fn shutdown_signal() -> Result<i32, Error> {
    let mut signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])
    .map_err(Error::Signal)?;

    let signal = signals.next().await.unwrap_or(signal_hook::consts::SIGTERM);
    info!("Received signal: {}", signal);
    signals.handle().close();
    Ok(signal)
}
