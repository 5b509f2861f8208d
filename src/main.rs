/*!
 * Sidecar Gateway - Main Entry Point
 *
 * Single process, two listeners:
 * - public reverse proxy routing `/mc-sidecar/`-prefixed paths to the file service and
 *   everything else to the upstream gateway
 * - internal sidecar service exposing the sandboxed file endpoints
 */

use tokio::net::TcpListener;
use tracing::{info, warn};

use sidecar_gateway::{
    init_tracing, proxy_app, sidecar_app, GatewayConfig, ProxyRoute, RootRegistry, RouteTable,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = GatewayConfig::from_env();
    info!(
        proxy_port = config.proxy_port,
        gateway_port = config.gateway_port,
        sidecar_port = config.sidecar_port,
        "sidecar gateway starting"
    );

    let registry = RootRegistry::from_candidates(&config.root_candidates);
    if registry.is_empty() {
        warn!("no file roots available; file endpoints will report no_roots_configured");
    }

    let table = RouteTable::new(vec![
        ProxyRoute {
            prefix: "/mc-sidecar".to_string(),
            strip_prefix: true,
            upstream_host: "127.0.0.1".to_string(),
            upstream_port: config.sidecar_port,
        },
        ProxyRoute {
            prefix: String::new(),
            strip_prefix: false,
            upstream_host: "127.0.0.1".to_string(),
            upstream_port: config.gateway_port,
        },
    ]);

    let sidecar = sidecar_app(registry, config.allow_hidden);
    let proxy = proxy_app(table);

    let sidecar_listener = TcpListener::bind(("0.0.0.0", config.sidecar_port)).await?;
    let proxy_listener = TcpListener::bind(("0.0.0.0", config.proxy_port)).await?;
    info!(port = config.sidecar_port, "sidecar listening");
    info!(port = config.proxy_port, "proxy listening");

    let sidecar_task = tokio::spawn(async move { axum::serve(sidecar_listener, sidecar).await });
    let proxy_task = tokio::spawn(async move { axum::serve(proxy_listener, proxy).await });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    sidecar_task.abort();
    proxy_task.abort();

    Ok(())
}
