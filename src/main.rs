use std::sync::Arc;

use anyhow::Context as _;
use kube::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tenant_db_provisioner::config::Config;
use tenant_db_provisioner::health::HealthState;
use tenant_db_provisioner::provisioner::Context;
use tenant_db_provisioner::server::{router, AppState};
use tenant_db_provisioner::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("tenant_db_provisioner=info,kube=warn")
        }))
        .init();

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    let config = Config::from_env();
    let health = HealthState::default();

    let client = Client::try_default()
        .await
        .context("building kubernetes client")?;
    client
        .apiserver_version()
        .await
        .context("reaching the kubernetes api server")?;

    let ctx = Context::discover(client, config.cluster_entry_host.clone()).await;
    if !ctx.routing_available() {
        warn!("routing API unavailable at startup, provisioning requests will be refused");
    }

    let store = match Store::connect(&config.store).await {
        Ok(store) => Some(Arc::new(store)),
        Err(err) => {
            warn!(error = %err, "control database unavailable, account endpoints disabled");
            None
        }
    };

    health.set_ready(true);

    let state = AppState {
        ctx: Arc::new(ctx),
        store,
        health,
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
