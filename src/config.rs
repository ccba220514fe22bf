//! Transcoding configuration

use crate::media_type::MediaType;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// YAML could not be read
    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Default media type is not `type/subtype`
    #[error("Invalid default media type: {0}")]
    InvalidMediaType(String),

    /// Scheme is neither http nor https
    #[error("Invalid scheme: {0}")]
    InvalidScheme(String),

    /// Body limit of zero
    #[error("Body limit must be greater than zero")]
    InvalidBodyLimit,

    /// Configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Transcoding configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Server preference for responses when a handler names none; also the media type
    /// assumed for request bodies without a `Content-Type`
    pub default_media_type: Option<String>,
    /// Maximum request body size in bytes
    pub body_limit: usize,
    /// Scheme used when building base URIs
    pub scheme: String,
    /// Use `X-Forwarded-Proto` as the scheme when present
    pub trust_forwarded_proto: bool,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            default_media_type: None,
            body_limit: 2 * 1024 * 1024,
            scheme: "http".to_string(),
            trust_forwarded_proto: false,
        }
    }
}

impl TranscodeConfig {
    /// Read and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(raw) = &self.default_media_type {
            if !MediaType::new(raw).is_valid() {
                return Err(ConfigError::InvalidMediaType(raw.clone()));
            }
        }
        if !matches!(self.scheme.as_str(), "http" | "https") {
            return Err(ConfigError::InvalidScheme(self.scheme.clone()));
        }
        if self.body_limit == 0 {
            return Err(ConfigError::InvalidBodyLimit);
        }
        Ok(())
    }

    /// Normalized default media type
    pub fn default_media_type(&self) -> Option<MediaType> {
        self.default_media_type.as_deref().map(MediaType::new)
    }
}

/// Demo server configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Listen port
    pub port: u16,
    pub transcode: TranscodeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8080,
            transcode: TranscodeConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.transcode.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// `address:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
