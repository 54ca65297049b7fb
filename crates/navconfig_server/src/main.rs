use anyhow::{Context, Result};
use log::info;
use navconfig_core::init_logging;
use navconfig_server::{build_router, AppState, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    let log_dir = settings.log_dir()?;
    init_logging(&settings.logging.level, &log_dir.to_string_lossy())
        .context("failed to initialize logging")?;

    let state = AppState::open(&settings.database.path)
        .with_context(|| format!("failed to open database `{}`", settings.database.path))?;
    let app = build_router(state);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("event=server_start module=server status=ok addr={addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with error")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=shutdown_signal module=server status=error error={err}");
    }
}
