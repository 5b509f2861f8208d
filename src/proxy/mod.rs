/*!
 * Proxy Module
 * Prefix-routed reverse proxy with streaming passthrough
 */

pub mod routes;
pub mod server;

pub use routes::{ProxyRoute, RouteTable};
pub use server::proxy_app;
