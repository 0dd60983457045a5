//! Piecewise-linear colour ramps loaded from named presets.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::color::{interpolate_rgb, to_rgb8, to_unit, Rgb};
use super::control_points::ControlPoints;
use super::presets::{self, Preset, DEFAULT_PRESET};
use super::record;
use crate::error::Result;

/// Resolve a preset name, falling back to the default with a warning.
fn resolve_preset(name: &str) -> &'static Preset {
    presets::find(name).unwrap_or_else(|| {
        warn!(
            preset_name = name,
            default = DEFAULT_PRESET,
            "Invalid preset_name, defaulting"
        );
        presets::default_preset()
    })
}

fn preset_points(preset: &Preset) -> ControlPoints<[f64; 3]> {
    // Preset tables are checked by the preset module's tests.
    ControlPoints::from_trusted(preset.control_points, preset.color_points)
}

/// Value → colour mapping shared by the linear and VSUP colormaps.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    preset_name: String,
    points: ControlPoints<[f64; 3]>,
}

/// The ramp fields of a persisted colormap record.
#[derive(Debug, Serialize)]
pub struct RampRecord<'a> {
    pub preset_name: &'a str,
    pub color_control_points: &'a [f64],
    pub color_points: &'a [[f64; 3]],
}

impl ColorRamp {
    /// Load a copy of the named preset.
    pub fn new(preset_name: &str) -> Self {
        let preset = resolve_preset(preset_name);
        Self {
            preset_name: preset.name.to_string(),
            points: preset_points(preset),
        }
    }

    pub fn preset_name(&self) -> &str {
        &self.preset_name
    }

    pub fn control_points(&self) -> &[f64] {
        self.points.positions()
    }

    pub fn color_points(&self) -> &[[f64; 3]] {
        self.points.values()
    }

    pub fn points(&self) -> &ControlPoints<[f64; 3]> {
        &self.points
    }

    /// Colour at `value`. Knot colours are quantized to bytes before blending.
    pub fn color_at(&self, value: f64) -> Rgb {
        let bracket = self.points.bracket(value);
        let colors = self.points.values();
        let left = to_rgb8(colors[bracket.left]);
        let right = to_rgb8(colors[bracket.right]);
        interpolate_rgb(left, right, bracket.ratio)
    }

    /// Replace every knot with the named preset.
    pub fn set_preset(&mut self, preset_name: &str) {
        let preset = resolve_preset(preset_name);
        self.preset_name = preset.name.to_string();
        self.points = preset_points(preset);
        debug!(preset_name = preset.name, "Preset loaded");
    }

    /// Insert a knot, sampling the current ramp when no colour is given.
    pub fn add_control_point(&mut self, position: f64, color: Option<[f64; 3]>) -> Option<usize> {
        let index = self.points.insertion_index(position)?;
        let color = color.unwrap_or_else(|| to_unit(self.color_at(position)));
        self.points.insert_at(index, position, color);
        Some(index)
    }

    pub fn remove_control_point(&mut self, index: usize) -> bool {
        self.points.remove(index)
    }

    /// Replace all knots at once; refused when they do not form a valid ramp.
    pub fn set_control_points(&mut self, positions: Vec<f64>, colors: Vec<[f64; 3]>) -> bool {
        match ControlPoints::new(positions, colors) {
            Ok(points) => {
                self.points = points;
                true
            }
            Err(reason) => {
                warn!(reason = %reason, "Rejected color control points");
                false
            }
        }
    }

    /// Reverse the colour order at fixed positions.
    pub fn invert(&mut self) {
        self.points.reverse_values();
    }

    pub fn record(&self) -> RampRecord<'_> {
        RampRecord {
            preset_name: &self.preset_name,
            color_control_points: self.points.positions(),
            color_points: self.points.values(),
        }
    }

    /// Rebuild from a persisted record, defaulting field by field.
    pub fn from_record(record: &Value) -> Self {
        let preset = match record::string_field(record, "preset_name") {
            Some(name) => resolve_preset(name),
            None => {
                warn!(
                    default = DEFAULT_PRESET,
                    "Missing or invalid 'preset_name' in colormap object"
                );
                presets::default_preset()
            }
        };

        let positions = record::number_array_field(record, "color_control_points")
            .unwrap_or_else(|| {
                warn!("Missing or invalid 'color_control_points' in colormap object, using preset");
                preset.control_points.to_vec()
            });
        let colors = record::triple_array_field(record, "color_points").unwrap_or_else(|| {
            warn!("Missing or invalid 'color_points' in colormap object, using preset");
            preset.color_points.to_vec()
        });

        let points = ControlPoints::new(positions, colors).unwrap_or_else(|reason| {
            warn!(reason = %reason, "Inconsistent control points in colormap object, using preset");
            preset_points(preset)
        });

        Self {
            preset_name: preset.name.to_string(),
            points,
        }
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::new(DEFAULT_PRESET)
    }
}

#[derive(Serialize)]
struct LinearRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    ramp: RampRecord<'a>,
}

/// A colormap with a single value axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearColormap {
    ramp: ColorRamp,
    revision: u64,
}

impl LinearColormap {
    pub const KIND: &'static str = "linear";

    pub fn new(preset_name: &str) -> Self {
        Self {
            ramp: ColorRamp::new(preset_name),
            revision: 0,
        }
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    /// Bumped by every mutation that changes the mapping.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get_color(&self, value: f64) -> Rgb {
        self.ramp.color_at(value)
    }

    pub fn get_colors(&self, values: &[f64]) -> Vec<Rgb> {
        values.iter().map(|&v| self.get_color(v)).collect()
    }

    /// Texture sampling hook; the uncertainty axis is ignored.
    pub fn color_for_texture(&self, x: f64, _y: f64) -> Rgb {
        self.get_color(x)
    }

    pub fn set_preset(&mut self, preset_name: &str) {
        self.ramp.set_preset(preset_name);
        self.revision += 1;
    }

    pub fn add_control_point(&mut self, position: f64, color: Option<[f64; 3]>) -> Option<usize> {
        let index = self.ramp.add_control_point(position, color)?;
        self.revision += 1;
        Some(index)
    }

    pub fn remove_control_point(&mut self, index: usize) -> bool {
        let removed = self.ramp.remove_control_point(index);
        if removed {
            self.revision += 1;
        }
        removed
    }

    pub fn set_control_points(&mut self, positions: Vec<f64>, colors: Vec<[f64; 3]>) -> bool {
        let accepted = self.ramp.set_control_points(positions, colors);
        if accepted {
            self.revision += 1;
        }
        accepted
    }

    pub fn invert(&mut self) {
        self.ramp.invert();
        self.revision += 1;
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(LinearRecord {
            kind: Self::KIND,
            ramp: self.ramp.record(),
        })
        .unwrap_or(Value::Null)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_default()
    }

    /// Rebuild from a persisted record. Never fails; bad fields fall back to the preset.
    pub fn from_value(record: &Value) -> Self {
        if let Some(kind) = record::string_field(record, "type") {
            if kind != Self::KIND {
                warn!(kind = kind, expected = Self::KIND, "Invalid colormap type");
            }
        }
        Self {
            ramp: ColorRamp::from_record(record),
            revision: 0,
        }
    }

    /// Parse JSON text; only unparsable text is an error.
    pub fn from_json(text: &str) -> Result<Self> {
        let record: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&record))
    }
}
