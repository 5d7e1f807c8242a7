//! Configuration management for picochain

use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Peers registered at startup, in any form `nodes/register` accepts.
    #[serde(default)]
    pub bootstrap_peers: Vec<String>,
    /// Per-request timeout for peer chain fetches during consensus.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            api_port: default_api_port(),
            bootstrap_peers: Vec::new(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_api_port() -> u16 {
    5000
}

fn default_fetch_timeout_secs() -> u64 {
    5
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        // Sane defaults when config.toml is absent
        Config {
            network: NetworkConfig::default(),
        }
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.network.fetch_timeout_secs == 0 {
        return Err("network.fetch_timeout_secs must be greater than zero".into());
    }

    Ok(config)
}
