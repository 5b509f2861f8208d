/*!
 * Core Module
 * Configuration, errors, and tracing shared across the gateway
 */

pub mod config;
pub mod errors;
pub mod tracer;

pub use config::{GatewayConfig, RootCandidate};
pub use errors::{GatewayError, GatewayResult};
pub use tracer::init_tracing;
