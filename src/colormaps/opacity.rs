//! Opacity transfer functions.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::control_points::ControlPoints;
use super::record;
use crate::error::Result;

/// Piecewise-linear opacity over a normalized value axis.
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityMap {
    points: ControlPoints<f64>,
    revision: u64,
}

#[derive(Serialize)]
struct OpacityRecord<'a> {
    opacity_control_points: &'a [f64],
    opacity_values: &'a [f64],
}

fn clamp_opacity(opacity: f64) -> f64 {
    if !(0.0..=1.0).contains(&opacity) {
        warn!(opacity = opacity, "Opacity must lie in [0, 1], clamping");
    }
    if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

impl OpacityMap {
    /// Build from knots, falling back to a fully opaque map when they are invalid.
    pub fn new(control_points: Vec<f64>, values: Vec<f64>) -> Self {
        let values = values.into_iter().map(clamp_opacity).collect();
        let points = ControlPoints::new(control_points, values).unwrap_or_else(|reason| {
            warn!(reason = %reason, "Invalid opacity control points, using [0, 1] -> [1, 1]");
            Self::opaque_points()
        });
        Self {
            points,
            revision: 0,
        }
    }

    /// Opacity rising linearly from 0 to 1.
    pub fn ramp() -> Self {
        Self::new(vec![0.0, 1.0], vec![0.0, 1.0])
    }

    fn opaque_points() -> ControlPoints<f64> {
        ControlPoints::from_trusted(&[0.0, 1.0], &[1.0, 1.0])
    }

    pub fn control_points(&self) -> &[f64] {
        self.points.positions()
    }

    pub fn values(&self) -> &[f64] {
        self.points.values()
    }

    pub fn points(&self) -> &ControlPoints<f64> {
        &self.points
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Opacity at `value`, clamped to [0, 1].
    pub fn opacity_at(&self, value: f64) -> f64 {
        self.points.interpolate(value)
    }

    /// Insert a knot; the opacity defaults to the current curve at `position`.
    pub fn add_control_point(&mut self, position: f64, opacity: Option<f64>) -> Option<usize> {
        let index = self.points.insertion_index(position)?;
        let opacity = match opacity {
            Some(opacity) => clamp_opacity(opacity),
            None => self.opacity_at(position),
        };
        self.points.insert_at(index, position, opacity);
        self.revision += 1;
        Some(index)
    }

    pub fn remove_control_point(&mut self, index: usize) -> bool {
        let removed = self.points.remove(index);
        if removed {
            self.revision += 1;
        }
        removed
    }

    /// Move an existing knot up or down.
    pub fn set_opacity(&mut self, index: usize, opacity: f64) -> bool {
        let updated = self.points.set_value(index, clamp_opacity(opacity));
        if updated {
            self.revision += 1;
        }
        updated
    }

    /// Index of the knot nearest `position` within `tolerance`.
    pub fn find_nearest(&self, position: f64, tolerance: f64) -> Option<usize> {
        self.points.find_nearest(position, tolerance)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(OpacityRecord {
            opacity_control_points: self.points.positions(),
            opacity_values: self.points.values(),
        })
        .unwrap_or(Value::Null)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_default()
    }

    /// Rebuild from a persisted record; missing arrays default to `[0, 1]` and `[1, 1]`.
    pub fn from_value(record: &Value) -> Self {
        let control_points = record::number_array_field(record, "opacity_control_points")
            .unwrap_or_else(|| vec![0.0, 1.0]);
        let values =
            record::number_array_field(record, "opacity_values").unwrap_or_else(|| vec![1.0, 1.0]);
        Self::new(control_points, values)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let record: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&record))
    }
}

impl Default for OpacityMap {
    fn default() -> Self {
        Self {
            points: Self::opaque_points(),
            revision: 0,
        }
    }
}
