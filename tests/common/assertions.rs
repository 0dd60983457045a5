//! Assertion utilities for testing.
//!
//! Float comparisons for texture channels and byte-level comparisons for colours.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f32 = 1e-6;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f32, expected: f32, epsilon: Option<f32>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that two arrays of floating-point values are approximately element-wise equal.
///
/// # Panics
///
/// Panics if the arrays have different lengths or if any element-wise comparison fails.
pub fn assert_array_approx_eq(actual: &[f32], expected: &[f32], epsilon: Option<f32>) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Arrays have different lengths: actual = {}, expected = {}",
        actual.len(),
        expected.len()
    );

    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff <= eps,
            "Arrays differ at index {}: actual = {}, expected = {}, diff = {}, epsilon = {}",
            i,
            a,
            e,
            diff,
            eps
        );
    }
}

/// Assert that a texture channel is a valid normalized value.
pub fn assert_in_range(actual: f32, min: f32, max: f32) {
    assert!(
        actual >= min && actual <= max,
        "Value not in range: actual = {}, min = {}, max = {}",
        actual,
        min,
        max
    );
}

/// Assert that no channel of two colours differs by more than `max_diff`.
pub fn assert_rgb_close(actual: [u8; 3], expected: [u8; 3], max_diff: u8) {
    let worst = actual
        .iter()
        .zip(expected.iter())
        .map(|(a, e)| a.abs_diff(*e))
        .max()
        .unwrap_or(0);
    assert!(
        worst <= max_diff,
        "Colours differ: actual = {:?}, expected = {:?}, max diff = {}",
        actual,
        expected,
        worst
    );
}

/// The RGBA floats a texture should hold for a byte colour and an opacity.
pub fn texel(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
        alpha,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.0000001, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    fn test_assert_rgb_close() {
        assert_rgb_close([10, 20, 30], [11, 19, 30], 1);
    }

    #[test]
    #[should_panic(expected = "Colours differ")]
    fn test_assert_rgb_close_fails() {
        assert_rgb_close([10, 20, 30], [10, 20, 33], 2);
    }

    #[test]
    fn test_texel() {
        assert_array_approx_eq(&texel([255, 0, 51], 0.5), &[1.0, 0.0, 0.2, 0.5], None);
    }
}
