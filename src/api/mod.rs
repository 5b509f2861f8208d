/*!
 * API Module
 * Sidecar HTTP surface and boundary error mapping
 */

pub mod errors;
pub mod server;
pub mod types;

pub use server::sidecar_app;
