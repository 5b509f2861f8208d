/*!
 * Gateway Configuration
 * Environment-driven settings built once at startup and passed by reference
 */

use std::env;
use std::path::PathBuf;

/// Default public port for the reverse proxy
pub const DEFAULT_PROXY_PORT: u16 = 18789;
/// Default internal port of the upstream gateway service
pub const DEFAULT_GATEWAY_PORT: u16 = 18788;
/// Default internal port of the sidecar file service
pub const DEFAULT_SIDECAR_PORT: u16 = 18791;

/// A configured root candidate, validated by the registry at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootCandidate {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
}

/// Immutable process configuration
///
/// Read from the environment exactly once in `main`; nothing mutates it
/// afterwards.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Public port the proxy listens on
    pub proxy_port: u16,
    /// Upstream gateway service port (default route)
    pub gateway_port: u16,
    /// Sidecar file service port
    pub sidecar_port: u16,
    /// Root candidates for the file registry
    pub root_candidates: Vec<RootCandidate>,
    /// Expose dot-prefixed files and directories
    pub allow_hidden: bool,
}

impl GatewayConfig {
    /// Build configuration from environment variables
    ///
    /// - `GATEWAY_PROXY_PORT`, `OPENCLAW_INTERNAL_GATEWAY_PORT`,
    ///   `MC_SIDECAR_PORT` - listener and upstream ports
    /// - `MC_FILE_ROOTS` - comma-separated `id=path` candidates
    /// - `MC_ALLOW_HIDDEN` - `1`/`true` to expose dotfiles
    pub fn from_env() -> Self {
        Self {
            proxy_port: env_port("GATEWAY_PROXY_PORT", DEFAULT_PROXY_PORT),
            gateway_port: env_port("OPENCLAW_INTERNAL_GATEWAY_PORT", DEFAULT_GATEWAY_PORT),
            sidecar_port: env_port("MC_SIDECAR_PORT", DEFAULT_SIDECAR_PORT),
            root_candidates: env::var("MC_FILE_ROOTS")
                .map(|v| parse_root_candidates(&v))
                .unwrap_or_else(|_| default_root_candidates()),
            allow_hidden: env_flag("MC_ALLOW_HIDDEN"),
        }
    }
}

/// Parse `id=path,id=path` into candidates; malformed entries are skipped
pub fn parse_root_candidates(raw: &str) -> Vec<RootCandidate> {
    raw.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            let (id, path) = entry.split_once('=')?;
            let id = id.trim();
            let path = path.trim();
            if id.is_empty() || path.is_empty() {
                return None;
            }
            Some(RootCandidate {
                id: id.to_string(),
                name: id.to_string(),
                path: PathBuf::from(path),
            })
        })
        .collect()
}

fn default_root_candidates() -> Vec<RootCandidate> {
    parse_root_candidates("workspace=/data/openclaw-workspace,state=/data/.openclaw")
}

fn env_port(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
