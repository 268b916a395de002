// Auto-draft server entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config (copying defaults on first run)
// 3. Load sample rankings
// 4. Create mpsc channels
// 5. Spawn WebSocket server task
// 6. Spawn app logic task
// 7. Wait for Ctrl+C or the app loop to end
// 8. Cleanup on exit

use autodraft_app::app;
use autodraft_app::config;
use autodraft_app::ws_server;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Auto-draft server starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: port {}, {} default trials (max {}), {} picks per run",
        config.ws_port,
        config.simulation.default_trials,
        config.simulation.max_trials,
        config.simulation.max_simulated_picks
    );

    // 3. Load sample rankings
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let sample_players = app::load_sample_players(&config, &cwd);

    // 4. Create mpsc channels
    let (ws_tx, ws_rx) = mpsc::channel(256);
    let (out_tx, out_rx) = mpsc::channel(256);

    let ws_port = config.ws_port;
    let app_state = app::AppState::new(config, sample_players);

    // 5. Spawn WebSocket server task
    let ws_handle = tokio::spawn(async move {
        if let Err(e) = ws_server::run(ws_port, ws_tx, out_rx).await {
            error!("WebSocket server error on port {}: {}", ws_port, e);
        }
    });

    // 6. Spawn app logic task
    let mut app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(ws_rx, out_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    info!("Ready. WebSocket server listening on 127.0.0.1:{}", ws_port);

    // 7. Wait for Ctrl+C, or for the app loop to end on its own
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
            info!("Shutdown requested");
        }
        _ = &mut app_handle => {
            info!("Application loop exited");
        }
    }

    // 8. Cleanup
    ws_handle.abort();
    app_handle.abort();

    info!("Auto-draft server shut down cleanly");
    Ok(())
}

/// Initialize tracing to stderr, filtered by `RUST_LOG` when set.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("autodraft_app=info,autodraft_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
