//! Configuration management for tfkit.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::colormaps::presets::{self, DEFAULT_PRESET};
use crate::colormaps::vsup::{DEFAULT_CACHE_SIZE, MAX_DEPTH, MIN_DEPTH};
use crate::error::{Result, TfError};

/// Command-line arguments for tfkit
#[derive(Parser, Debug)]
#[command(name = "tfkit")]
#[command(
    author,
    version,
    about = "Render a colormap and opacity map to a lookup-texture PNG",
    long_about = None
)]
pub struct Args {
    /// Path of the PNG to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Named preset to render as a linear colormap
    #[arg(short, long, conflicts_with = "colormap")]
    pub preset: Option<String>,

    /// Colormap record (JSON) to render instead of a preset
    #[arg(long)]
    pub colormap: Option<PathBuf>,

    /// Opacity map record (JSON) for the alpha channel
    #[arg(long)]
    pub opacity: Option<PathBuf>,

    /// Texture width in pixels
    #[arg(short = 'W', long, env = "TFKIT_WIDTH")]
    pub width: Option<u32>,

    /// Texture height in pixels
    #[arg(short = 'H', long, env = "TFKIT_HEIGHT")]
    pub height: Option<u32>,

    /// Write the red channel as gray, keeping alpha
    #[arg(long)]
    pub grayscale: bool,

    /// Path to JSON configuration file
    #[arg(short, long, env = "TFKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TFKIT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Where the mapping to render comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ColormapSource {
    Preset(String),
    File(PathBuf),
}

/// What the command-line tool was asked to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub colormap: ColormapSource,
    pub opacity: Option<PathBuf>,
    pub grayscale: bool,
    pub output: PathBuf,
}

/// Texture sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureConfig {
    /// Default texture width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Default texture height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

/// Colormap defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColormapConfig {
    /// Preset used when nothing else is named
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Capacity of the VSUP colour memo
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    /// VSUP depth used when a scenario config leaves it out
    #[serde(default = "default_vsup_depth")]
    pub vsup_depth: u32,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Texture configuration
    #[serde(default)]
    pub texture: TextureConfig,

    /// Colormap configuration
    #[serde(default)]
    pub colormap: ColormapConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, RenderJob)> {
        Self::from_args(Args::parse())
    }

    /// Resolve parsed arguments against the config file and defaults
    pub fn from_args(args: Args) -> Result<(Self, RenderJob)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(width) = args.width {
            config.texture.width = width;
        }
        if let Some(height) = args.height {
            config.texture.height = height;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }

        let colormap = match (args.colormap, args.preset) {
            (Some(path), _) => ColormapSource::File(path),
            (None, Some(name)) => ColormapSource::Preset(name),
            (None, None) => ColormapSource::Preset(config.colormap.default_preset.clone()),
        };

        let job = RenderJob {
            colormap,
            opacity: args.opacity,
            grayscale: args.grayscale,
            output: args.output,
        };

        Ok((config, job))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.texture = other.texture;
        self.colormap = other.colormap;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.texture.width == 0 || self.texture.height == 0 {
            return Err(TfError::Config {
                message: format!(
                    "Texture size must be positive, got {}x{}",
                    self.texture.width, self.texture.height
                ),
            });
        }

        if presets::find(&self.colormap.default_preset).is_none() {
            return Err(TfError::Config {
                message: format!(
                    "Unknown default preset: {}. Must be one of: {}",
                    self.colormap.default_preset,
                    presets::available_presets().join(", ")
                ),
            });
        }

        if !(MIN_DEPTH..=MAX_DEPTH).contains(&self.colormap.vsup_depth) {
            return Err(TfError::Config {
                message: format!(
                    "Invalid VSUP depth: {}. Must be between {} and {}",
                    self.colormap.vsup_depth, MIN_DEPTH, MAX_DEPTH
                ),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(TfError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            texture: TextureConfig::default(),
            colormap: ColormapConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for ColormapConfig {
    fn default() -> Self {
        Self {
            default_preset: default_preset(),
            cache_size: default_cache_size(),
            vsup_depth: default_vsup_depth(),
        }
    }
}

// Default value functions for serde
fn default_width() -> u32 {
    crate::texture::DEFAULT_WIDTH
}

fn default_height() -> u32 {
    crate::texture::DEFAULT_HEIGHT
}

fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}

fn default_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

fn default_vsup_depth() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["tfkit", "--output", "out.png"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.texture.width, 256);
        assert_eq!(config.texture.height, 1);
        assert_eq!(config.colormap.default_preset, "Cool to Warm");
        assert_eq!(config.colormap.cache_size, 1000);
        assert_eq!(config.colormap.vsup_depth, 5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"texture": {"height": 64}}"#).unwrap();
        assert_eq!(config.texture.width, 256);
        assert_eq!(config.texture.height, 64);
        assert_eq!(config.colormap, ColormapConfig::default());
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        let mut config2 = Config::default();

        config2.texture.width = 512;
        config2.colormap.vsup_depth = 3;

        config1.merge(config2);

        assert_eq!(config1.texture.width, 512);
        assert_eq!(config1.colormap.vsup_depth, 3);
    }

    #[test]
    fn test_args_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"texture": {{"width": 64, "height": 8}}, "colormap": {{"default_preset": "Jet"}}}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let (config, job) = Config::from_args(args(&["--config", path, "--width", "32"])).unwrap();
        assert_eq!(config.texture.width, 32);
        assert_eq!(config.texture.height, 8);
        assert_eq!(job.colormap, ColormapSource::Preset("Jet".to_string()));
        assert_eq!(job.output, PathBuf::from("out.png"));
    }

    #[test]
    fn test_colormap_source() {
        let (_, job) = Config::from_args(args(&["--preset", "Greens"])).unwrap();
        assert_eq!(job.colormap, ColormapSource::Preset("Greens".to_string()));

        let (_, job) = Config::from_args(args(&["--colormap", "cm.json", "--grayscale"])).unwrap();
        assert_eq!(job.colormap, ColormapSource::File(PathBuf::from("cm.json")));
        assert!(job.grayscale);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::from_args(args(&["--config", "/nonexistent/tfkit.json"]));
        assert!(matches!(result, Err(TfError::Io(_))));
    }

    #[test]
    fn test_config_validation() {
        // Valid config should pass
        let config = Config::default();
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.texture.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.colormap.default_preset = "Rainbow Desaturated".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.colormap.vsup_depth = 11;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }
}
