//! Gateway configuration.
//!
//! Supports loading configuration from:
//! 1. Config file (TOML or JSON, via `SKALD_GATEWAY_CONFIG`)
//! 2. Environment variables
//!
//! Environment variables take precedence over config file values.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Skald backend configuration
    pub backend: BackendConfig,
    /// Built SPA asset configuration
    pub assets: AssetsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server port (default: 3000)
    pub port: u16,
    /// Bind address (default: "0.0.0.0")
    pub bind: String,
}

/// Backend origin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend base URL (default: "http://localhost:8000")
    pub base_url: String,
    /// Upstream read timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

/// Static asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding the built SPA (default: "dist")
    pub dir: String,
    /// Entry document served for non-asset paths (default: "index.html")
    pub index: String,
}

// Default implementations

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            bind: "0.0.0.0".to_string(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: "dist".to_string(),
            index: "index.html".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from file and environment variables.
    /// Environment variables override file values.
    pub fn load() -> anyhow::Result<Self> {
        // Start with defaults
        let mut config = Self::default();

        // Try to load from config file if specified
        if let Ok(config_path) = std::env::var("SKALD_GATEWAY_CONFIG") {
            config = Self::from_file(&config_path)?;
            tracing::info!("Loaded configuration from: {}", config_path);
        }

        // Override with environment variables
        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a file (supports TOML and JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config: GatewayConfig = match extension {
            "toml" => toml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                // Try to detect format
                if content.trim().starts_with('{') {
                    serde_json::from_str(&content)?
                } else {
                    toml::from_str(&content)?
                }
            }
        };

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Server config
        if let Ok(val) = std::env::var("SKALD_GATEWAY_PORT").or_else(|_| std::env::var("PORT")) {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SKALD_GATEWAY_BIND") {
            self.server.bind = val;
        }

        // Backend config
        if let Ok(val) = std::env::var("SKALD_API_URL") {
            self.backend.base_url = val;
        }
        if let Ok(val) = std::env::var("SKALD_BACKEND_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.backend.timeout_secs = secs;
            }
        }

        // Asset config
        if let Ok(val) = std::env::var("SKALD_ASSETS_DIR") {
            self.assets.dir = val;
        }
        if let Ok(val) = std::env::var("SKALD_ASSETS_INDEX") {
            self.assets.index = val;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.assets.dir, "dist");
        assert_eq!(config.assets.index, "index.html");
    }

    #[test]
    fn test_toml_parsing() {
        let toml_content = r#"
[server]
port = 8080
bind = "127.0.0.1"

[backend]
base_url = "http://api:8000"

[assets]
dir = "build"
"#;
        let config: GatewayConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.base_url, "http://api:8000");
        assert_eq!(config.assets.dir, "build");
        // Defaults should still be applied for missing fields
        assert_eq!(config.backend.timeout_secs, 120);
        assert_eq!(config.assets.index, "index.html");
    }

    #[test]
    fn test_json_parsing() {
        let json_content = r#"{"server": {"port": 9000}}"#;
        let config: GatewayConfig = serde_json::from_str(json_content).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "0.0.0.0");
    }
}
