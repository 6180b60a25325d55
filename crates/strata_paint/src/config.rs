//! Surface configuration
//!
//! The host states how its native surface is laid out instead of the drawing
//! context guessing from the hosting situation (view, bitmap, flipped
//! container...). Configuration can be built in code or read from TOML:
//!
//! ```toml
//! origin = "bottom-left"
//! pixel_offset = "none"
//! scale_factor = 2.0
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the native surface puts its coordinate origin
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// Y grows downward, as callers expect; no flip needed
    #[default]
    TopLeft,
    /// Y grows upward; the initial transform flips it over the surface height
    BottomLeft,
}

/// How the native pixel grid relates to logical coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PixelOffsetMode {
    /// Integer coordinates fall on pixel edges: strokes move half a pixel to
    /// land on pixel centers, fills stay put
    #[default]
    None,
    /// The grid is already shifted by half a pixel; nothing is offset
    Half,
}

/// Configuration for one native drawing surface
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SurfaceConfig {
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub pixel_offset: PixelOffsetMode,
    /// Device pixels per logical unit
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

fn default_scale_factor() -> f64 {
    1.0
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            origin: Origin::default(),
            pixel_offset: PixelOffsetMode::default(),
            scale_factor: default_scale_factor(),
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid surface config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("scale_factor must be finite and positive, got {0}")]
    InvalidScale(f64),
}

impl SurfaceConfig {
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_pixel_offset(mut self, mode: PixelOffsetMode) -> Self {
        self.pixel_offset = mode;
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SurfaceConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale_factor));
        }
        Ok(())
    }
}
