//! Value-suppressing uncertainty palettes.
//!
//! A VSUP maps a (value, uncertainty) pair to a colour. Certain values get the
//! full ramp colour; as uncertainty grows the colour fades towards a neutral
//! `fading_color`, and in discrete mode the value axis is also coarsened so
//! that uncertain data can only be told apart in a few broad bins.
//!
//! The discrete palette is a complete binary tree flattened breadth-first.
//! Level `d` holds `2^d` colours sampled evenly along the ramp and faded by
//! `1 - d / (depth - 1)`; the root is the fading colour itself.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::color::{format_rgb, interpolate_lab, Rgb, DEFAULT_FADING_COLOR};
use super::linear::{ColorRamp, RampRecord};
use super::presets::DEFAULT_PRESET;
use super::record;
use crate::error::Result;

pub const MIN_DEPTH: u32 = 1;
pub const MAX_DEPTH: u32 = 10;
pub const DEFAULT_DEPTH: u32 = 4;
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Clamp a requested tree depth into [`MIN_DEPTH`, `MAX_DEPTH`].
pub fn clamp_depth(depth: i64) -> u32 {
    if depth < MIN_DEPTH as i64 || depth > MAX_DEPTH as i64 {
        warn!(
            depth = depth,
            min = MIN_DEPTH,
            max = MAX_DEPTH,
            "Depth out of range, clamping"
        );
    }
    depth.clamp(MIN_DEPTH as i64, MAX_DEPTH as i64) as u32
}

/// Memoised continuous-mode lookups, keyed by thousandths of each axis.
#[derive(Debug)]
struct ColorCache {
    entries: HashMap<(u32, u32, bool), Rgb>,
    capacity: usize,
}

impl ColorCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
        }
    }

    fn key(uncertainty: f64, value: f64, continuous: bool) -> (u32, u32, bool) {
        (
            (uncertainty * 1000.0).round() as u32,
            (value * 1000.0).round() as u32,
            continuous,
        )
    }

    fn get(&self, key: &(u32, u32, bool)) -> Option<Rgb> {
        self.entries.get(key).copied()
    }

    /// Stores nothing once full; entries only go away on `clear`.
    fn insert(&mut self, key: (u32, u32, bool), color: Rgb) {
        if self.entries.len() < self.capacity {
            self.entries.insert(key, color);
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        if self.entries.len() > capacity {
            self.entries.clear();
        }
    }
}

#[derive(Serialize)]
struct VsupRecord<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    ramp: RampRecord<'a>,
    depth: u32,
    flip_y: bool,
    fading_color: String,
    continuous: bool,
}

/// A two-axis colormap over value × uncertainty.
#[derive(Debug)]
pub struct VsupColormap {
    ramp: ColorRamp,
    depth: u32,
    continuous: bool,
    flip_y: bool,
    fading_color: Rgb,
    nodes: Vec<Rgb>,
    cache: Mutex<ColorCache>,
    revision: u64,
}

impl VsupColormap {
    pub const KIND: &'static str = "vsup";

    pub fn new(depth: i64, continuous: bool, flip_y: bool, preset_name: &str) -> Self {
        let mut vsup = Self {
            ramp: ColorRamp::new(preset_name),
            depth: clamp_depth(depth),
            continuous,
            flip_y,
            fading_color: DEFAULT_FADING_COLOR,
            nodes: Vec::new(),
            cache: Mutex::new(ColorCache::new(DEFAULT_CACHE_SIZE)),
            revision: 0,
        };
        vsup.build_tree();
        vsup
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn continuous(&self) -> bool {
        self.continuous
    }

    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    pub fn fading_color(&self) -> Rgb {
        self.fading_color
    }

    /// The flattened palette tree, `2^depth - 1` colours long.
    pub fn nodes(&self) -> &[Rgb] {
        &self.nodes
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn build_tree(&mut self) {
        let depth = self.depth;
        let mut nodes = vec![self.fading_color; (1usize << depth) - 1];
        for level in 1..depth {
            let width = 1usize << level;
            let fade = 1.0 - level as f64 / (depth - 1) as f64;
            for i in 0..width {
                let ratio = i as f64 / (width - 1) as f64;
                let color = self.ramp.color_at(ratio);
                nodes[width - 1 + i] = interpolate_lab(color, self.fading_color, fade);
            }
        }
        self.nodes = nodes;
    }

    /// Rebuild derived state after a change and bump the revision.
    fn changed(&mut self) {
        self.build_tree();
        self.cache.lock().clear();
        self.revision += 1;
        debug!(
            depth = self.depth,
            continuous = self.continuous,
            revision = self.revision,
            "VSUP palette rebuilt"
        );
    }

    /// Ramp colour at `value`, ignoring uncertainty.
    pub fn get_color(&self, value: f64) -> Rgb {
        self.ramp.color_at(value)
    }

    pub fn get_colors(&self, values: &[f64]) -> Vec<Rgb> {
        values.iter().map(|&v| self.get_color(v)).collect()
    }

    /// Colour for value `x` and uncertainty `y`, both in [0, 1].
    pub fn color_for_texture(&self, x: f64, y: f64) -> Rgb {
        let mut uncertainty = clamp_unit(y);
        if self.flip_y {
            uncertainty = 1.0 - uncertainty;
        }
        let value = clamp_unit(x);

        if self.continuous || self.depth == 1 {
            let key = ColorCache::key(uncertainty, value, self.continuous);
            if let Some(color) = self.cache.lock().get(&key) {
                return color;
            }
            let color =
                interpolate_lab(self.get_color(value), self.fading_color, 1.0 - uncertainty);
            self.cache.lock().insert(key, color);
            return color;
        }

        let level = ((self.depth as f64 * uncertainty).floor() as u32).min(self.depth - 1);
        if level == 0 {
            return self.nodes[0];
        }
        let width = 1usize << level;
        let value_index = ((value * width as f64).floor() as usize).min(width - 1);
        self.nodes[width + value_index - 1]
    }

    pub fn set_depth(&mut self, depth: i64) {
        let depth = clamp_depth(depth);
        if depth != self.depth {
            self.depth = depth;
            self.changed();
        }
    }

    pub fn set_continuous(&mut self, continuous: bool) {
        if continuous != self.continuous {
            self.continuous = continuous;
            self.changed();
        }
    }

    pub fn set_flip_y(&mut self, flip_y: bool) {
        if flip_y != self.flip_y {
            self.flip_y = flip_y;
            self.cache.lock().clear();
            self.revision += 1;
        }
    }

    pub fn set_fading_color(&mut self, color: Rgb) {
        self.fading_color = color;
        self.changed();
    }

    /// Set the fading colour from a CSS string, an `[r, g, b]` array or an `{r, g, b}` object.
    pub fn set_fading_color_value(&mut self, color: &Value) -> bool {
        match record::color_value(color) {
            Some(color) => {
                self.set_fading_color(color);
                true
            }
            None => {
                warn!(color = %color, "Invalid color format for fading color");
                false
            }
        }
    }

    pub fn set_cache_size(&mut self, size: usize) {
        self.cache.lock().set_capacity(size);
    }

    pub fn set_preset(&mut self, preset_name: &str) {
        self.ramp.set_preset(preset_name);
        self.changed();
    }

    pub fn add_control_point(&mut self, position: f64, color: Option<[f64; 3]>) -> Option<usize> {
        let index = self.ramp.add_control_point(position, color)?;
        self.changed();
        Some(index)
    }

    pub fn remove_control_point(&mut self, index: usize) -> bool {
        let removed = self.ramp.remove_control_point(index);
        if removed {
            self.changed();
        }
        removed
    }

    pub fn set_control_points(&mut self, positions: Vec<f64>, colors: Vec<[f64; 3]>) -> bool {
        let accepted = self.ramp.set_control_points(positions, colors);
        if accepted {
            self.changed();
        }
        accepted
    }

    pub fn invert(&mut self) {
        self.ramp.invert();
        self.changed();
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(VsupRecord {
            kind: Self::KIND,
            ramp: self.ramp.record(),
            depth: self.depth,
            flip_y: self.flip_y,
            fading_color: format_rgb(self.fading_color),
            continuous: self.continuous,
        })
        .unwrap_or(Value::Null)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_default()
    }

    /// Rebuild from a persisted record. Never fails; bad fields fall back to defaults.
    pub fn from_value(record: &Value) -> Self {
        if let Some(kind) = record::string_field(record, "type") {
            if kind != Self::KIND {
                warn!(kind = kind, expected = Self::KIND, "Invalid colormap type");
            }
        }

        let depth = record::number_field(record, "depth")
            .map(|depth| depth.floor() as i64)
            .unwrap_or_else(|| {
                warn!(
                    default = DEFAULT_DEPTH,
                    "Missing or invalid 'depth' in colormap object"
                );
                DEFAULT_DEPTH as i64
            });
        let flip_y = record::bool_field(record, "flip_y").unwrap_or_else(|| {
            warn!("Missing or invalid 'flip_y' in colormap object, defaulting to false");
            false
        });
        let continuous = record::bool_field(record, "continuous").unwrap_or_else(|| {
            warn!("Missing or invalid 'continuous' in colormap object, defaulting to false");
            false
        });
        let fading_color = match record.get("fading_color") {
            Some(value) => record::color_value(value).unwrap_or_else(|| {
                warn!(
                    fading_color = %value,
                    "Invalid format for 'fading_color' in colormap object, using default"
                );
                DEFAULT_FADING_COLOR
            }),
            None => {
                warn!("Missing 'fading_color' in colormap object, using default");
                DEFAULT_FADING_COLOR
            }
        };

        let mut vsup = Self {
            ramp: ColorRamp::from_record(record),
            depth: clamp_depth(depth),
            continuous,
            flip_y,
            fading_color,
            nodes: Vec::new(),
            cache: Mutex::new(ColorCache::new(DEFAULT_CACHE_SIZE)),
            revision: 0,
        };
        vsup.build_tree();
        vsup
    }

    /// Parse JSON text; only unparsable text is an error.
    pub fn from_json(text: &str) -> Result<Self> {
        let record: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&record))
    }
}

impl Default for VsupColormap {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH as i64, false, false, DEFAULT_PRESET)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tree_size_for_every_depth() {
        let mut vsup = VsupColormap::default();
        for depth in 1..=10 {
            vsup.set_depth(depth);
            assert_eq!(vsup.nodes().len(), (1 << depth) - 1);
            assert_eq!(vsup.nodes()[0], vsup.fading_color());
        }
    }

    #[test]
    fn test_depth_clamped() {
        let mut vsup = VsupColormap::new(0, false, false, "Cool to Warm");
        assert_eq!(vsup.depth(), 1);
        vsup.set_depth(42);
        assert_eq!(vsup.depth(), 10);
        vsup.set_depth(-3);
        assert_eq!(vsup.depth(), 1);
    }

    #[test]
    fn test_deepest_level_is_unfaded() {
        let vsup = VsupColormap::new(3, false, false, "Cool to Warm");
        // Level 2 spans nodes 3..7 with fade 0.
        for i in 0..4 {
            let ratio = i as f64 / 3.0;
            assert_eq!(vsup.nodes()[3 + i], vsup.get_color(ratio));
        }
    }

    #[test]
    fn test_depth_two_lookup() {
        let vsup = VsupColormap::new(2, false, false, "Cool to Warm");
        assert_eq!(vsup.color_for_texture(0.9, 0.9), vsup.nodes()[2]);
        assert_eq!(vsup.nodes()[2], vsup.get_color(1.0));
        assert_eq!(vsup.color_for_texture(0.1, 0.9), vsup.get_color(0.0));
        assert_eq!(vsup.color_for_texture(0.9, 0.1), DEFAULT_FADING_COLOR);
    }

    #[test]
    fn test_flip_y() {
        let mut vsup = VsupColormap::new(2, false, false, "Cool to Warm");
        let certain = vsup.color_for_texture(0.9, 0.9);
        vsup.set_flip_y(true);
        assert_eq!(vsup.color_for_texture(0.9, 0.1), certain);
    }

    #[test]
    fn test_depth_one_is_continuous() {
        let vsup = VsupColormap::new(1, false, false, "Cool to Warm");
        assert_eq!(vsup.color_for_texture(0.0, 1.0), vsup.get_color(0.0));
        assert_eq!(vsup.color_for_texture(0.0, 0.0), DEFAULT_FADING_COLOR);
        let half = vsup.color_for_texture(0.0, 0.5);
        assert_eq!(
            half,
            interpolate_lab(vsup.get_color(0.0), DEFAULT_FADING_COLOR, 0.5)
        );
    }

    #[test]
    fn test_continuous_cache_cleared_on_edit() {
        let mut vsup = VsupColormap::new(4, true, false, "X Ray");
        let before = vsup.color_for_texture(0.0, 1.0);
        assert_eq!(before, [255, 255, 255]);
        vsup.invert();
        assert_eq!(vsup.color_for_texture(0.0, 1.0), [0, 0, 0]);
    }

    #[test]
    fn test_ramp_edit_rebuilds_tree() {
        let mut vsup = VsupColormap::new(2, false, false, "X Ray");
        let before = vsup.nodes().to_vec();
        vsup.invert();
        assert_ne!(vsup.nodes(), &before[..]);
        assert_eq!(vsup.nodes()[1], [0, 0, 0]);
    }

    #[test]
    fn test_fading_color_forms() {
        let mut vsup = VsupColormap::default();
        assert!(vsup.set_fading_color_value(&json!("rgb(10, 20, 30)")));
        assert_eq!(vsup.fading_color(), [10, 20, 30]);
        assert_eq!(vsup.nodes()[0], [10, 20, 30]);
        assert!(vsup.set_fading_color_value(&json!([1, 2, 3])));
        assert!(vsup.set_fading_color_value(&json!({"r": 4, "g": 5, "b": 6})));
        assert!(!vsup.set_fading_color_value(&json!(true)));
        assert_eq!(vsup.fading_color(), [4, 5, 6]);
    }

    #[test]
    fn test_record_round_trip() {
        let mut vsup = VsupColormap::new(5, true, true, "Greens");
        vsup.set_fading_color([200, 100, 50]);
        vsup.add_control_point(0.3, None);
        let value = vsup.to_value();
        assert_eq!(value["type"], "vsup");
        assert_eq!(value["fading_color"], "rgb(200, 100, 50)");

        let back = VsupColormap::from_value(&value);
        assert_eq!(back.ramp(), vsup.ramp());
        assert_eq!(back.depth(), 5);
        assert!(back.continuous());
        assert!(back.flip_y());
        assert_eq!(back.fading_color(), [200, 100, 50]);
        assert_eq!(back.nodes(), vsup.nodes());
    }

    #[test]
    fn test_from_value_defaults() {
        let vsup = VsupColormap::from_value(&json!({"type": "vsup", "depth": 99}));
        assert_eq!(vsup.depth(), 10);
        assert!(!vsup.flip_y());
        assert!(!vsup.continuous());
        assert_eq!(vsup.fading_color(), DEFAULT_FADING_COLOR);
        assert_eq!(vsup.ramp().preset_name(), DEFAULT_PRESET);
    }

    #[test]
    fn test_cache_capacity() {
        let mut vsup = VsupColormap::new(4, true, false, "Cool to Warm");
        vsup.set_cache_size(2);
        for i in 0..10 {
            vsup.color_for_texture(i as f64 / 10.0, 0.5);
        }
        assert_eq!(vsup.cache.lock().entries.len(), 2);
        vsup.set_cache_size(1);
        assert!(vsup.cache.lock().entries.is_empty());
    }
}
