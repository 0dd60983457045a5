//! Ordered (position, value) knots shared by colour ramps and opacity maps.
//!
//! Positions are strictly increasing, start at 0 and end at 1, and there are
//! always at least two knots. The two endpoints can never be removed. Every
//! mutator checks its input, logs a warning and leaves the list untouched when
//! the input would break those rules.

use tracing::warn;

/// Values that can be blended between two knots.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, other: Self, t: f64) -> Self {
        self + t * (other - self)
    }
}

/// The pair of knots surrounding a sample position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub left: usize,
    pub right: usize,
    /// Fraction of the way from `left` to `right`, 0 when they coincide.
    pub ratio: f64,
}

/// Index-aligned knot positions and values.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoints<V> {
    positions: Vec<f64>,
    values: Vec<V>,
}

impl<V: Copy> ControlPoints<V> {
    /// Build a knot list, or explain why the input cannot be one.
    pub fn new(positions: Vec<f64>, values: Vec<V>) -> Result<Self, String> {
        Self::check(&positions, values.len())?;
        Ok(Self { positions, values })
    }

    /// Copy tables that are known to be valid, such as the built-in presets.
    pub(crate) fn from_trusted(positions: &[f64], values: &[V]) -> Self {
        debug_assert!(Self::check(positions, values.len()).is_ok());
        Self {
            positions: positions.to_vec(),
            values: values.to_vec(),
        }
    }

    fn check(positions: &[f64], value_count: usize) -> Result<(), String> {
        if positions.len() != value_count {
            return Err(format!(
                "{} positions but {} values",
                positions.len(),
                value_count
            ));
        }
        if positions.len() < 2 {
            return Err(format!("need at least 2 knots, got {}", positions.len()));
        }
        if positions[0] != 0.0 || positions[positions.len() - 1] != 1.0 {
            return Err("first knot must sit at 0 and last knot at 1".to_string());
        }
        if !positions.windows(2).all(|w| w[0] < w[1]) {
            return Err("positions must be strictly increasing".to_string());
        }
        Ok(())
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Find the knots surrounding `value`, clamped to [0, 1].
    pub fn bracket(&self, value: f64) -> Bracket {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };
        let last = self.positions.len() - 1;
        let left = self
            .positions
            .partition_point(|&p| p <= value)
            .saturating_sub(1)
            .min(last);
        let right = (left + 1).min(last);
        let ratio = if left == right {
            0.0
        } else {
            (value - self.positions[left]) / (self.positions[right] - self.positions[left])
        };
        Bracket { left, right, ratio }
    }

    /// Where a knot at `position` would be inserted, or `None` (with a warning)
    /// when the position is not strictly inside the current range or already taken.
    pub fn insertion_index(&self, position: f64) -> Option<usize> {
        let first = self.positions[0];
        let last = self.positions[self.positions.len() - 1];
        if !(position > first && position < last) {
            warn!(
                position = position,
                "New control point must be strictly inside the existing range"
            );
            return None;
        }
        let index = self.positions.partition_point(|&p| p < position);
        if self.positions[index] == position {
            warn!(
                position = position,
                index = index,
                "A control point already exists at this position"
            );
            return None;
        }
        Some(index)
    }

    /// Insert at an index returned by [`Self::insertion_index`].
    pub(crate) fn insert_at(&mut self, index: usize, position: f64, value: V) {
        self.positions.insert(index, position);
        self.values.insert(index, value);
    }

    /// Insert a knot with an explicit value. Returns its index when accepted.
    pub fn insert(&mut self, position: f64, value: V) -> Option<usize> {
        let index = self.insertion_index(position)?;
        self.insert_at(index, position, value);
        Some(index)
    }

    /// Remove an interior knot. Endpoints and out-of-range indices are refused.
    pub fn remove(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.positions.len() - 1 {
            warn!(
                index = index,
                len = self.positions.len(),
                "Cannot remove first or last control point"
            );
            return false;
        }
        self.positions.remove(index);
        self.values.remove(index);
        true
    }

    /// Overwrite the value of an existing knot.
    pub fn set_value(&mut self, index: usize, value: V) -> bool {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                warn!(
                    index = index,
                    len = self.values.len(),
                    "Control point index out of range"
                );
                false
            }
        }
    }

    /// Reverse the value order, keeping the positions.
    pub fn reverse_values(&mut self) {
        self.values.reverse();
    }

    /// Index of the knot closest to `position` within `tolerance`.
    pub fn find_nearest(&self, position: f64, tolerance: f64) -> Option<usize> {
        self.positions
            .iter()
            .enumerate()
            .map(|(index, &p)| (index, (p - position).abs()))
            .filter(|&(_, distance)| distance < tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

impl<V: Lerp> ControlPoints<V> {
    /// Piecewise-linear value at `value`, clamped to [0, 1].
    pub fn interpolate(&self, value: f64) -> V {
        let Bracket { left, right, ratio } = self.bracket(value);
        if left == right {
            return self.values[left];
        }
        self.values[left].lerp(self.values[right], ratio)
    }
}
