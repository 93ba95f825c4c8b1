//! Configuration system
//!
//! Swap chain creation parameters can be kept in TOML or RON files and loaded
//! through the [`Config`] trait.

pub use serde::{Deserialize, Serialize};

use crate::format::{AlphaMode, PixelFormat};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of range
    #[error("Invalid value for {field}: {value}")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Value found in the configuration
        value: i32,
    },
}

/// # Swap Chain Configuration
///
/// Creation parameters for a swap chain. Missing fields fall back to the
/// defaults: an 800x600 premultiplied BGRA chain with two buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapChainConfig {
    /// Buffer width in pixels
    pub width: i32,
    /// Buffer height in pixels
    pub height: i32,
    /// Pixel format of every buffer
    pub pixel_format: PixelFormat,
    /// Number of buffers in rotation
    pub buffer_count: i32,
    /// Alpha treatment of the buffers
    pub alpha_mode: AlphaMode,
}

impl SwapChainConfig {
    /// Check the geometry rules applied at swap chain creation
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("buffer_count", self.buffer_count),
        ] {
            if value <= 0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }
}

impl Default for SwapChainConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            pixel_format: PixelFormat::B8G8R8A8UIntNormalized,
            buffer_count: 2,
            alpha_mode: AlphaMode::Premultiplied,
        }
    }
}

impl Config for SwapChainConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SwapChainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_values() {
        let config = SwapChainConfig { height: 0, ..SwapChainConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "height", value: 0 })
        ));

        let config = SwapChainConfig { buffer_count: -3, ..SwapChainConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "buffer_count", value: -3 })
        ));
    }

    #[test]
    fn test_toml_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("swap_chain.toml");
        let path = path.to_str().unwrap();

        let config = SwapChainConfig {
            width: 1920,
            height: 1080,
            pixel_format: PixelFormat::R16G16B16A16Float,
            buffer_count: 3,
            alpha_mode: AlphaMode::Ignore,
        };
        config.save_to_file(path).unwrap();

        assert_eq!(SwapChainConfig::load_from_file(path).unwrap(), config);
    }

    #[test]
    fn test_ron_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("swap_chain.ron");
        let path = path.to_str().unwrap();

        let config = SwapChainConfig { alpha_mode: AlphaMode::Straight, ..Default::default() };
        config.save_to_file(path).unwrap();

        assert_eq!(SwapChainConfig::load_from_file(path).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SwapChainConfig = toml::from_str("width = 640\nbuffer_count = 3\n").unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 600);
        assert_eq!(config.buffer_count, 3);
        assert_eq!(config.pixel_format, PixelFormat::B8G8R8A8UIntNormalized);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("swap_chain.json");
        let result = SwapChainConfig::default().save_to_file(path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
