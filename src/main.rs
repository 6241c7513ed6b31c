//! hoa-letters server binary

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;

use hoa_letters::{Config, create_app, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // reqwest clients use rustls; pick the ring backend before any of them is built
    let _ = rustls::crypto::ring::default_provider().install_default();

    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Ignoring unreadable .env file: {e}"),
    }

    // Fails on a missing signing secret before anything is bound.
    let config = Config::load()
        .context("Invalid configuration (is ENTITLEMENTS_SECRET set?)")?;
    init_tracing(&config.logging)?;

    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("server.host {:?} is not an IP address", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_timeout_seconds);

    tracing::info!(
        %addr,
        docs = config.server.enable_docs,
        paywall_enforced = config.entitlements.paywall_enforced,
        "Starting HOA letters server"
    );

    let app = create_app(config).context("Failed to assemble application")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(
        listener,
        app.router
            .into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown(app.shutdown_token, grace))
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM, stop background sweeps, then allow `grace` for in-flight work
async fn wait_for_shutdown(background: CancellationToken, grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal_name = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal = signal_name, grace_seconds = grace.as_secs(), "Shutting down");

    background.cancel();
    tokio::time::sleep(grace).await;
}
