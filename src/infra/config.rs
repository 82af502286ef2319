use serde::Deserialize;
use thiserror::Error;

use crate::tools::generate_code::DEFAULT_PROMPT;

pub const DEFAULT_PORT: u16 = 6060;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid MODE: {0}. Must be 'server' or 'stdio'")]
    InvalidMode(String),
    #[error("PORT cannot be 0")]
    ZeroPort,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub host: String,
    pub port: u16,
    pub default_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: "server".into(),
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            default_prompt: DEFAULT_PROMPT.into(),
        }
    }
}

impl Config {
    /// Defaults, then the TOML file named by `MCP_CONFIG` (if any), then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var("MCP_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    /// Like `load`, but a broken config file is logged and skipped.
    pub fn from_env() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring config file");
            let mut cfg = Self::default();
            cfg.apply_env();
            cfg
        })
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_owned(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env(&mut self) {
        if let Ok(mode) = std::env::var("MODE") {
            self.mode = mode;
        }
        if let Ok(host) = std::env::var("HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|s| s.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Ok(prompt) = std::env::var("DEFAULT_PROMPT") {
            if !prompt.is_empty() {
                self.default_prompt = prompt;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.mode.as_str(), "server" | "stdio") {
            return Err(ConfigError::InvalidMode(self.mode.clone()));
        }
        if self.mode == "server" && self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }
        Ok(())
    }

    pub fn is_stdio(&self) -> bool {
        self.mode == "stdio"
    }
}
