//! panel: a thin always-on-top status strip that fades behind fullscreen
//! windows.
//!
//! Run with:  `RUST_LOG=debug panel`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("panel v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = panel_wayland::run() {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
