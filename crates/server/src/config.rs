//! Server configuration loaded from the environment.
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use battle_runtime::RuntimeConfig;

use crate::gemini::GeminiConfig;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory for `server.log`; stderr only when unset.
    pub log_dir: Option<PathBuf>,
    /// Model-backed decisions are available only when this is set.
    pub gemini: Option<GeminiConfig>,
    pub runtime: RuntimeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 2500)),
            log_dir: None,
            gemini: None,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BIND_ADDR` - Listen address (default: 127.0.0.1:2500)
    /// - `LOG_DIR` - Directory for the log file (default: none)
    /// - `GEMINI_API_KEY` - Enables model decisions (default: none)
    /// - `GEMINI_MODEL` - Model name (default: gemini-1.5-flash)
    /// - `GEMINI_API_BASE` - API base URL (default: https://generativelanguage.googleapis.com)
    ///
    /// Runtime variables are documented on [`RuntimeConfig::from_env`].
    pub fn from_env() -> Self {
        let mut config = Self {
            runtime: RuntimeConfig::from_env(),
            ..Self::default()
        };

        if let Some(addr) = read_env::<SocketAddr>("BIND_ADDR") {
            config.bind_addr = addr;
        }
        config.log_dir = env::var("LOG_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        if let Some(api_key) = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
        {
            let mut gemini = GeminiConfig::new(api_key);
            if let Ok(model) = env::var("GEMINI_MODEL") {
                gemini.model = model;
            }
            if let Ok(base) = env::var("GEMINI_API_BASE") {
                gemini.api_base = base.trim_end_matches('/').to_owned();
            }
            config.gemini = Some(gemini);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
