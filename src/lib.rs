/*!
 * Sidecar Gateway Library
 * Reverse-proxy request router plus a sandboxed file-browsing service
 */

pub mod api;
pub mod core;
pub mod files;
pub mod proxy;

// Re-exports
pub use crate::core::config::{GatewayConfig, RootCandidate};
pub use crate::core::errors::{GatewayError, GatewayResult};
pub use crate::core::tracer::init_tracing;
pub use api::sidecar_app;
pub use files::{FileRoot, ResolveOptions, RootRegistry};
pub use proxy::{proxy_app, ProxyRoute, RouteTable};
