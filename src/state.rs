//! Application state management for tfkit.
//!
//! A [`Session`] owns the one texture registry of a running application
//! together with the configuration that supplies its defaults.

use serde_json::Value;
use tracing::{info, warn};

use crate::colormaps::{Colormap, LinearColormap, OpacityMap};
use crate::config::Config;
use crate::error::{Result, TfError};
use crate::reactive::Observable;
use crate::texture::{SharedColormap, SharedOpacityMap, Texture, TextureCache};

/// The registry and configuration shared by everything that draws.
#[derive(Debug, Default)]
pub struct Session {
    /// Configuration
    pub config: Config,
    /// Registered mappings and their textures
    pub textures: TextureCache,
}

impl Session {
    /// Create a new Session
    pub fn new(config: Config) -> Self {
        Self {
            config,
            textures: TextureCache::new(),
        }
    }

    /// A linear colormap on the configured default preset.
    pub fn default_colormap(&self) -> Colormap {
        Colormap::Linear(LinearColormap::new(&self.config.colormap.default_preset))
    }

    /// Build a colormap from a scenario's `colormap_config` block, applying
    /// the configured VSUP depth and cache size.
    pub fn colormap_from_config(&self, colormap_config: &Value) -> Option<Colormap> {
        let mut colormap = Colormap::from_config(colormap_config, self.config.colormap.vsup_depth)?;
        if let Some(vsup) = colormap.as_vsup_mut() {
            vsup.set_cache_size(self.config.colormap.cache_size);
        }
        Some(colormap)
    }

    /// Wrap `colormap` for sharing and register it under `name`.
    pub fn register_colormap(&mut self, name: &str, colormap: Colormap) -> SharedColormap {
        let shared = Observable::new(colormap);
        self.textures.register_colormap(name, shared.clone());
        shared
    }

    /// Wrap `opacity_map` for sharing and register it under `name`.
    pub fn register_opacity_map(
        &mut self,
        name: &str,
        opacity_map: OpacityMap,
    ) -> SharedOpacityMap {
        let shared = Observable::new(opacity_map);
        self.textures.register_opacity_map(name, shared.clone());
        shared
    }

    /// Texture at the configured default size.
    pub fn texture(&mut self, colormap: &str, opacity: Option<&str>) -> Option<Texture> {
        let (width, height) = (self.config.texture.width, self.config.texture.height);
        self.textures.get_texture(colormap, opacity, width, height)
    }

    /// Like [`Session::texture`], but an unregistered colormap is an error.
    pub fn texture_checked(&mut self, colormap: &str, opacity: Option<&str>) -> Result<Texture> {
        if let Some(name) = opacity {
            if self.textures.opacity_map(name).is_none() {
                warn!(opacity = name, "Rendering without a registered opacity map");
            }
        }
        self.texture(colormap, opacity)
            .ok_or_else(|| TfError::NotRegistered {
                kind: "colormap",
                name: colormap.to_string(),
            })
    }

    /// Drop every texture and registration, e.g. when a scenario closes.
    pub fn reset(&mut self) {
        self.textures.clear();
        info!("Session reset");
    }
}
