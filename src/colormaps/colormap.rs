//! The colormap capability consumed by texture sampling, and the tagged
//! union over every concrete colormap.

use serde_json::Value;
use tracing::warn;

use super::color::Rgb;
use super::linear::{ColorRamp, LinearColormap};
use super::presets::DEFAULT_PRESET;
use super::record;
use super::vsup::VsupColormap;
use crate::error::Result;

/// Anything that can fill a colour texture.
pub trait TextureColormap: Send + Sync {
    /// Colour at value `x` and uncertainty `y`, both in [0, 1].
    fn color_for_texture(&self, x: f64, y: f64) -> Rgb;

    /// The record `type` tag.
    fn kind(&self) -> &'static str;

    /// Persisted record form.
    fn to_value(&self) -> Value;

    /// Bumped by every mutation that changes the mapping.
    fn revision(&self) -> u64;
}

impl TextureColormap for LinearColormap {
    fn color_for_texture(&self, x: f64, y: f64) -> Rgb {
        LinearColormap::color_for_texture(self, x, y)
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn to_value(&self) -> Value {
        LinearColormap::to_value(self)
    }

    fn revision(&self) -> u64 {
        LinearColormap::revision(self)
    }
}

impl TextureColormap for VsupColormap {
    fn color_for_texture(&self, x: f64, y: f64) -> Rgb {
        VsupColormap::color_for_texture(self, x, y)
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn to_value(&self) -> Value {
        VsupColormap::to_value(self)
    }

    fn revision(&self) -> u64 {
        VsupColormap::revision(self)
    }
}

/// Either kind of colormap, as registered with a texture cache.
#[derive(Debug)]
pub enum Colormap {
    Linear(LinearColormap),
    Vsup(VsupColormap),
}

/// Forward a call to whichever variant is present.
macro_rules! dispatch {
    ($self:expr, $cm:ident => $body:expr) => {
        match $self {
            Colormap::Linear($cm) => $body,
            Colormap::Vsup($cm) => $body,
        }
    };
}

impl Colormap {
    pub fn ramp(&self) -> &ColorRamp {
        dispatch!(self, cm => cm.ramp())
    }

    pub fn get_color(&self, value: f64) -> Rgb {
        dispatch!(self, cm => cm.get_color(value))
    }

    pub fn get_colors(&self, values: &[f64]) -> Vec<Rgb> {
        dispatch!(self, cm => cm.get_colors(values))
    }

    pub fn set_preset(&mut self, preset_name: &str) {
        dispatch!(self, cm => cm.set_preset(preset_name))
    }

    pub fn add_control_point(&mut self, position: f64, color: Option<[f64; 3]>) -> Option<usize> {
        dispatch!(self, cm => cm.add_control_point(position, color))
    }

    pub fn remove_control_point(&mut self, index: usize) -> bool {
        dispatch!(self, cm => cm.remove_control_point(index))
    }

    pub fn set_control_points(&mut self, positions: Vec<f64>, colors: Vec<[f64; 3]>) -> bool {
        dispatch!(self, cm => cm.set_control_points(positions, colors))
    }

    pub fn invert(&mut self) {
        dispatch!(self, cm => cm.invert())
    }

    pub fn as_vsup(&self) -> Option<&VsupColormap> {
        match self {
            Colormap::Vsup(vsup) => Some(vsup),
            Colormap::Linear(_) => None,
        }
    }

    pub fn as_vsup_mut(&mut self) -> Option<&mut VsupColormap> {
        match self {
            Colormap::Vsup(vsup) => Some(vsup),
            Colormap::Linear(_) => None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_default()
    }

    /// Rebuild from a persisted record, choosing the variant by its `type` tag.
    /// Records without a tag are read as linear colormaps.
    pub fn from_value(record: &Value) -> Self {
        match record::string_field(record, "type") {
            Some(VsupColormap::KIND) => Colormap::Vsup(VsupColormap::from_value(record)),
            Some(LinearColormap::KIND) | None => {
                Colormap::Linear(LinearColormap::from_value(record))
            }
            Some(other) => {
                warn!(kind = other, "Unknown colormap type, reading as linear");
                Colormap::Linear(LinearColormap::from_value(record))
            }
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let record: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&record))
    }

    /// Build a fresh colormap from a scenario's `colormap_config` block.
    ///
    /// Unlike [`Colormap::from_value`] this starts from the named preset and
    /// only honours the style fields; the VSUP depth defaults to `default_depth`.
    pub fn from_config(config: &Value, default_depth: u32) -> Option<Self> {
        let kind = record::string_field(config, "type").unwrap_or(LinearColormap::KIND);
        let preset_name = record::string_field(config, "preset_name").unwrap_or(DEFAULT_PRESET);

        match kind {
            LinearColormap::KIND => Some(Colormap::Linear(LinearColormap::new(preset_name))),
            VsupColormap::KIND => {
                let depth = record::number_field(config, "depth")
                    .filter(|depth| *depth != 0.0)
                    .map(|depth| depth.floor() as i64)
                    .unwrap_or(default_depth as i64);
                let continuous = record::bool_field(config, "continuous").unwrap_or(false);
                let flip_y = record::bool_field(config, "flip_y").unwrap_or(false);
                let mut vsup = VsupColormap::new(depth, continuous, flip_y, preset_name);
                if let Some(fading_color) = config.get("fading_color") {
                    vsup.set_fading_color_value(fading_color);
                }
                Some(Colormap::Vsup(vsup))
            }
            other => {
                warn!(kind = other, "Unknown colormap type");
                None
            }
        }
    }
}

impl TextureColormap for Colormap {
    fn color_for_texture(&self, x: f64, y: f64) -> Rgb {
        dispatch!(self, cm => cm.color_for_texture(x, y))
    }

    fn kind(&self) -> &'static str {
        match self {
            Colormap::Linear(_) => LinearColormap::KIND,
            Colormap::Vsup(_) => VsupColormap::KIND,
        }
    }

    fn to_value(&self) -> Value {
        dispatch!(self, cm => cm.to_value())
    }

    fn revision(&self) -> u64 {
        dispatch!(self, cm => cm.revision())
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Colormap::Linear(LinearColormap::default())
    }
}

impl From<LinearColormap> for Colormap {
    fn from(colormap: LinearColormap) -> Self {
        Colormap::Linear(colormap)
    }
}

impl From<VsupColormap> for Colormap {
    fn from(colormap: VsupColormap) -> Self {
        Colormap::Vsup(colormap)
    }
}
