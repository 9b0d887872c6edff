use crate::proxy::ProxyConfig;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Write logs to `<data dir>/logs` in addition to the console
    #[serde(default = "default_log_to_file")]
    pub log_to_file: bool,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

fn default_log_to_file() -> bool {
    true
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            log_to_file: default_log_to_file(),
            proxy: ProxyConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
