// Standings viewer entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the upstream client from credentials
// 4. Bind and spawn the proxy server task
// 5. Create mpsc channels
// 6. Spawn the coordinator task
// 7. Run the TUI event loop (blocking until the user quits)
// 8. Cleanup on exit

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

use standwatch::app;
use standwatch::config;
use standwatch::gateway::GatewayClient;
use standwatch::proxy;
use standwatch::tui;
use standwatch::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not the terminal)
    init_tracing()?;
    info!("standwatch starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: proxy port {}, upstream {}",
        config.server.port, config.upstream.base_url
    );

    // 3. Build the upstream client
    let upstream = UpstreamClient::from_config(&config);
    match &upstream {
        UpstreamClient::Active(_) => info!("Upstream client initialized (API key configured)"),
        UpstreamClient::Disabled => info!(
            "Upstream client disabled (no API key in config/credentials.toml); \
             fetches will report a configuration error"
        ),
    }

    // 4. Bind the proxy listener up front so a busy port fails fast, then
    //    spawn the server task.
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.server.port))
        .await
        .with_context(|| format!("failed to bind proxy on port {}", config.server.port))?;
    let proxy_addr = listener.local_addr()?;

    let proxy_state = proxy::ProxyState {
        upstream: Arc::new(upstream),
    };
    let proxy_handle = tokio::spawn(async move {
        if let Err(e) = proxy::serve(listener, proxy_state).await {
            error!("Proxy server error: {e}");
        }
    });

    // 5. Create mpsc channels
    let (fetch_tx, fetch_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 6. Spawn the coordinator task, fetching through the local proxy
    let gateway = Arc::new(GatewayClient::new(format!("http://{proxy_addr}")));
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(gateway, fetch_tx, fetch_rx, cmd_rx, ui_tx).await {
            error!("Coordinator error: {e}");
        }
    });

    info!("Application ready. Proxy listening on {proxy_addr}");

    // 7. Run the TUI event loop (blocking until the user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {e}");
    }

    // 8. Cleanup: wait for the coordinator to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    // Abort the proxy server (it serves forever)
    proxy_handle.abort();

    info!("standwatch shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by
/// the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("standwatch.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("standwatch=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
