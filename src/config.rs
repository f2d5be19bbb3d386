use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::constants::{
    DEFAULT_CLEANUP_SLOTS, DEFAULT_FILE_BUF_SIZE, DEFAULT_FTP_PORT, DEFAULT_MAX_CUSTOM_COMMANDS,
    DEFAULT_MAX_DEVICES,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_port: u16,
    /// Address advertised in PASV replies. When unset, the local address of
    /// the control socket is used.
    pub pasv_address: Option<Ipv4Addr>,
    /// Directory that native device paths are resolved against.
    pub base_dir: String,
    pub file_buf_size: Option<usize>, // Optional to allow default value
    pub max_devices: usize,
    pub max_custom_commands: usize,
    pub cleanup_slots: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_FTP_PORT,
            pasv_address: None,
            base_dir: String::from("."),
            file_buf_size: Some(DEFAULT_FILE_BUF_SIZE),
            max_devices: DEFAULT_MAX_DEVICES,
            max_custom_commands: DEFAULT_MAX_CUSTOM_COMMANDS,
            cleanup_slots: DEFAULT_CLEANUP_SLOTS,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))?;

        // Set defaults if not specified
        if config.server.file_buf_size.is_none() {
            config.server.file_buf_size = Some(DEFAULT_FILE_BUF_SIZE);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: Config = toml::from_str("[server]\nlisten_port = 2121\n").unwrap();
        assert_eq!(config.server.listen_port, 2121);
        assert_eq!(config.server.base_dir, ".");
        assert_eq!(config.server.file_buf_size, Some(DEFAULT_FILE_BUF_SIZE));
        assert_eq!(config.server.cleanup_slots, DEFAULT_CLEANUP_SLOTS);
    }

    #[test]
    fn pasv_address_parses() {
        let config: Config = toml::from_str("[server]\npasv_address = \"10.0.0.1\"\n").unwrap();
        assert_eq!(
            config.server.pasv_address,
            Some("10.0.0.1".parse::<Ipv4Addr>().unwrap())
        );
    }
}
